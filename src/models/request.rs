use crate::models::size::Size;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Seeds are drawn from `[0, SEED_RANGE)`.
pub const SEED_RANGE: u64 = 100_000_000;

/// Lifecycle of the current generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "image_url", rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(String),
    Failed,
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            RequestState::Succeeded(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: Size,
    pub seed: u64,
    pub nologo: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, size: Size) -> Self {
        Self::with_seed(prompt, size, random_seed())
    }

    pub fn with_seed(prompt: impl Into<String>, size: Size, seed: u64) -> Self {
        Self {
            prompt: prompt.into(),
            size,
            seed,
            nologo: true,
        }
    }
}

/// What the image service answered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedImage {
    /// Final URL after redirects. This is the displayable image URL.
    pub url: String,
    pub status: u16,
}

/// Ties a completion back to the submission that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub generation: u64,
    pub request: GenerationRequest,
}

pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..SEED_RANGE)
}
