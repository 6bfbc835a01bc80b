use crate::error::{ImageGenError, Result};
use crate::models::size::Size;
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Share-link parameters: `q` is the prompt, `h`/`w` the size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub q: Option<String>,
    pub h: Option<u32>,
    pub w: Option<u32>,
}

impl PageQuery {
    pub fn new(prompt: &str, size: Size) -> Self {
        Self {
            q: Some(prompt.to_string()),
            h: Some(size.height),
            w: Some(size.width),
        }
    }

    /// Renders `?q=..&h=..&w=..`. Zero dimensions are left out.
    pub fn to_query_string(&self) -> String {
        let mut query = String::from("?q=");
        if let Some(q) = &self.q {
            query.push_str(&urlencoding::encode(q));
        }
        if let Some(h) = self.h.filter(|h| *h > 0) {
            query.push_str(&format!("&h={}", h));
        }
        if let Some(w) = self.w.filter(|w| *w > 0) {
            query.push_str(&format!("&w={}", w));
        }
        query
    }

    /// Parses a raw query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let raw = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = PageQuery::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "q" => parsed.q = Some(value.into_owned()),
                "h" => parsed.h = value.trim().parse().ok(),
                "w" => parsed.w = value.trim().parse().ok(),
                _ => {}
            }
        }

        parsed
    }

    pub fn from_url(link: &str) -> Result<Self> {
        let url = Url::parse(link).map_err(|e| ImageGenError::InvalidUrl(e.to_string()))?;
        Ok(Self::parse(url.query().unwrap_or("")))
    }

    pub fn share_url(&self, base: &str) -> Result<String> {
        let mut url = Url::parse(base).map_err(|e| ImageGenError::InvalidUrl(e.to_string()))?;
        let query = self.to_query_string();
        url.set_query(Some(&query[1..]));
        Ok(url.to_string())
    }

    /// Restorable prompt: present and non-empty.
    pub fn prompt(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }

    /// Restorable size: both sides present and positive.
    pub fn size(&self) -> Option<Size> {
        match (self.w, self.h) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Size::new(w, h)),
            _ => None,
        }
    }
}
