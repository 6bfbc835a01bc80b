use crate::{
    config::Config,
    error::{ImageGenError, Result},
    logger,
    models::{
        FetchedImage, GenerationRequest, GenerationTicket, PageQuery, Preset, RequestState, Size,
        SizeOption,
    },
    service::ImageFetcher,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Owns the prompt form: input, request lifecycle and result visibility.
pub struct PromptToImageController<F: ImageFetcher> {
    fetcher: F,
    prompt: String,
    size: Size,
    custom: bool,
    state: RequestState,
    modal_open: bool,
    location: PageQuery,
    generation: u64,
}

impl<F: ImageFetcher> PromptToImageController<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_default_preset(fetcher, Preset::default())
    }

    pub fn with_default_preset(fetcher: F, preset: Preset) -> Self {
        Self {
            fetcher,
            prompt: String::new(),
            size: preset.size(),
            custom: false,
            state: RequestState::Idle,
            modal_open: true,
            location: PageQuery::default(),
            generation: 0,
        }
    }

    pub fn from_config(fetcher: F, config: &Config) -> Self {
        Self::with_default_preset(fetcher, config.default_preset)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.state.image_url()
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_modal_visible(&self) -> bool {
        self.modal_open && self.image_url().is_some()
    }

    /// The query last reflected into the address bar.
    pub fn location(&self) -> &PageQuery {
        &self.location
    }

    pub fn share_url(&self, base: &str) -> Result<String> {
        self.location.share_url(base)
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn select_preset(&mut self, preset: Preset) {
        self.size = preset.size();
        self.custom = false;
    }

    pub fn select_custom(&mut self) {
        self.custom = true;
    }

    pub fn select_option(&mut self, option: SizeOption) {
        match option {
            SizeOption::Preset(preset) => self.select_preset(preset),
            SizeOption::Custom => self.select_custom(),
        }
    }

    pub fn active_option(&self) -> SizeOption {
        SizeOption::derive(self.custom, self.size)
    }

    pub fn set_custom_width(&mut self, width: u32) -> Result<()> {
        if !self.custom {
            return Err(ImageGenError::NotInCustomMode);
        }
        self.size.width = width;
        self.warn_if_small();
        Ok(())
    }

    pub fn set_custom_height(&mut self, height: u32) -> Result<()> {
        if !self.custom {
            return Err(ImageGenError::NotInCustomMode);
        }
        self.size.height = height;
        self.warn_if_small();
        Ok(())
    }

    fn warn_if_small(&self) {
        if !self.size.is_recommended() {
            log::warn!(
                "Size {} is below the recommended minimum of {}px",
                self.size,
                crate::models::MIN_RECOMMENDED_DIMENSION
            );
        }
    }

    pub fn toggle_modal(&mut self, visible: bool) {
        self.modal_open = visible;
    }

    /// Applies a share-link query as the initial form state.
    pub fn restore_from_query(&mut self, query: &PageQuery) {
        if let Some(prompt) = query.prompt() {
            self.prompt = prompt.to_string();
        }
        if let Some(size) = query.size() {
            match Preset::matching(size) {
                Some(preset) => self.select_preset(preset),
                None => {
                    self.custom = true;
                    self.size = size;
                }
            }
        }
        self.location = query.clone();
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.prompt.trim().is_empty()
    }

    /// Moves to `Loading` and hands out the request to run.
    pub fn begin_submit(&mut self) -> Result<GenerationTicket> {
        if self.prompt.trim().is_empty() {
            return Err(ImageGenError::EmptyPrompt);
        }
        if self.is_loading() {
            return Err(ImageGenError::RequestInFlight);
        }

        self.generation += 1;
        self.state = RequestState::Loading;
        self.location = PageQuery::new(&self.prompt, self.size);
        log::debug!("Location updated: {}", self.location.to_query_string());

        let request = GenerationRequest::new(self.prompt.clone(), self.size);
        log::info!(
            "🎨 Generating {} image (seed {})",
            request.size,
            request.seed
        );

        Ok(GenerationTicket {
            generation: self.generation,
            request,
        })
    }

    /// Records the outcome of `ticket`. Outcomes for superseded tickets are dropped.
    pub fn finish_submit(
        &mut self,
        ticket: &GenerationTicket,
        outcome: Result<FetchedImage>,
    ) -> &RequestState {
        if ticket.generation != self.generation || !self.is_loading() {
            log::debug!("Dropping stale result for generation {}", ticket.generation);
            return &self.state;
        }

        self.state = match outcome {
            Ok(image) => {
                log::info!("✅ Image ready (HTTP {}): {}", image.status, image.url);
                RequestState::Succeeded(image.url)
            }
            Err(ImageGenError::RequestFailed { status }) => {
                log::error!("Failed to fetch the image from the API (HTTP {})", status);
                RequestState::Failed
            }
            Err(e) if e.is_fetch_failure() => {
                log::error!("Error fetching the AI image: {}", e);
                RequestState::Failed
            }
            Err(e) => {
                log::error!("Image generation aborted: {}", e);
                RequestState::Failed
            }
        };
        &self.state
    }

    pub async fn submit(&mut self) -> Result<&RequestState> {
        let ticket = self.begin_submit()?;
        let outcome = {
            let _timer = logger::timer("image generation");
            self.fetcher.fetch(&ticket.request).await
        };
        Ok(self.finish_submit(&ticket, outcome))
    }

    /// Saves the current image into `dir` under a random file name.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        let url = self.image_url().ok_or(ImageGenError::NoImage)?;

        let result = match self.fetcher.fetch_bytes(url).await {
            Ok(bytes) => save_image(dir, &bytes),
            Err(e) => Err(e),
        };

        match &result {
            Ok(path) => log::info!("💾 Image saved to: {}", path.display()),
            Err(e) => log::error!("Download failed: {}", e),
        }
        result
    }
}

/// Writes into a temp file first so a failed write leaves nothing behind.
fn save_image(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let path = dir.join(Uuid::new_v4().to_string());
    staged.persist(&path).map_err(|e| ImageGenError::Io(e.error))?;
    Ok(path)
}
