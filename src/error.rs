use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Request failed with HTTP status {status}")]
    RequestFailed { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("A generation request is already in flight")]
    RequestInFlight,

    #[error("Custom size can only be edited in custom mode")]
    NotInCustomMode,

    #[error("No generated image available")]
    NoImage,

    #[error("Unknown size preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ImageGenError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ImageGenError::RequestFailed {
                status: status.as_u16(),
            },
            None => ImageGenError::Transport(e.to_string()),
        }
    }
}

impl ImageGenError {
    /// Whether the error came from the image service rather than a local guard.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ImageGenError::RequestFailed { .. } | ImageGenError::Transport(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
