use crate::error::{ImageGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest dimension the form recommends. Not enforced.
pub const MIN_RECOMMENDED_DIMENSION: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both sides meet the recommended minimum.
    pub fn is_recommended(&self) -> bool {
        self.width >= MIN_RECOMMENDED_DIMENSION && self.height >= MIN_RECOMMENDED_DIMENSION
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Tiktok,
    Youtube,
    Instagram,
    Portrait,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Tiktok,
        Preset::Youtube,
        Preset::Instagram,
        Preset::Portrait,
    ];

    pub const fn size(&self) -> Size {
        match self {
            Preset::Tiktok => Size::new(1080, 1920),
            Preset::Youtube => Size::new(1280, 720),
            Preset::Instagram => Size::new(1080, 1080),
            Preset::Portrait => Size::new(720, 1280),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Tiktok => "tiktok",
            Preset::Youtube => "youtube",
            Preset::Instagram => "instagram",
            Preset::Portrait => "portrait",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Tiktok => "TikTok",
            Preset::Youtube => "YouTube",
            Preset::Instagram => "Instagram",
            Preset::Portrait => "Portrait",
        }
    }

    /// First preset whose dimensions equal `size`.
    pub fn matching(size: Size) -> Option<Preset> {
        Self::ALL.into_iter().find(|preset| preset.size() == size)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Tiktok
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiktok" => Ok(Preset::Tiktok),
            "youtube" => Ok(Preset::Youtube),
            "instagram" => Ok(Preset::Instagram),
            "portrait" => Ok(Preset::Portrait),
            _ => Err(ImageGenError::UnknownPreset(s.to_string())),
        }
    }
}

/// One entry of the size selector: a named preset or the custom editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeOption {
    Preset(Preset),
    Custom,
}

impl SizeOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeOption::Preset(preset) => preset.as_str(),
            SizeOption::Custom => "custom",
        }
    }

    /// Which option the selector shows as checked.
    ///
    /// Derived from the current dimensions every time instead of being
    /// stored next to them.
    pub fn derive(custom: bool, size: Size) -> SizeOption {
        if custom {
            return SizeOption::Custom;
        }
        Preset::matching(size)
            .map(SizeOption::Preset)
            .unwrap_or(SizeOption::Custom)
    }
}

impl fmt::Display for SizeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeOption {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("custom") {
            Ok(SizeOption::Custom)
        } else {
            s.parse().map(SizeOption::Preset)
        }
    }
}
