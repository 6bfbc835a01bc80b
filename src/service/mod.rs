pub mod image_client;

use crate::{
    error::Result,
    models::{FetchedImage, GenerationRequest},
};
use async_trait::async_trait;

pub use image_client::PollinationsClient;

/// The remote image service the controller talks to.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Issues one generation GET. A non-OK status is an error.
    async fn fetch(&self, request: &GenerationRequest) -> Result<FetchedImage>;

    /// Downloads the bytes behind an already generated image URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
