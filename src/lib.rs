//! Prompt-to-image generation against the Pollinations image API.
//!
//! [`PromptToImageController`] holds the form state (prompt, size, request
//! lifecycle, result visibility) and drives an [`ImageFetcher`]. The default
//! fetcher is [`PollinationsClient`].

pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;

pub use config::{Config, ServiceConfig};
pub use controller::PromptToImageController;
pub use error::{ImageGenError, Result};
pub use models::*;
pub use service::{ImageFetcher, PollinationsClient};
