use crate::{
    error::{ImageGenError, Result},
    logger::{LogLevel, LoggerConfig},
    models::Preset,
};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://image.pollinations.ai";

/// Responses are hinted as cacheable for a day.
pub const CACHE_MAX_AGE_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub cache_max_age_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub page_url: Option<String>,
    pub default_preset: Preset,
    pub download_dir: PathBuf,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_max_age_secs: CACHE_MAX_AGE_SECS,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service: ServiceConfig::default(),
            page_url: None,
            default_preset: Preset::default(),
            download_dir: PathBuf::from("."),
            log_level: LogLevel::Info,
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `PROMPTPIX_*` variables. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(endpoint) = env::var("PROMPTPIX_ENDPOINT") {
            config.service = config.service.with_endpoint(endpoint);
        }
        config.page_url = env::var("PROMPTPIX_PAGE_URL").ok();
        if let Ok(preset) = env::var("PROMPTPIX_DEFAULT_PRESET") {
            config.default_preset = preset.parse()?;
        }
        if let Ok(dir) = env::var("PROMPTPIX_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }
        if let Ok(level) = env::var("PROMPTPIX_LOG_LEVEL") {
            config.log_level = level
                .parse()
                .map_err(|_| ImageGenError::Config(format!("invalid log level: {}", level)))?;
        }
        config.log_json = env::var("PROMPTPIX_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");
        config.log_file = env::var("PROMPTPIX_LOG_FILE").ok().map(PathBuf::from);

        Ok(config)
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    pub fn with_default_preset(mut self, preset: Preset) -> Self {
        self.default_preset = preset;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Logger settings derived from this config.
    pub fn logger_config(&self) -> LoggerConfig {
        let config = LoggerConfig::new()
            .with_level(self.log_level)
            .with_json_output(self.log_json);
        match &self.log_file {
            Some(path) => config.with_file_output(&path.to_string_lossy()),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.service.cache_max_age_secs, 86_400);
        assert_eq!(config.default_preset, Preset::Tiktok);
        assert!(config.page_url.is_none());
        assert!(config.logger_config().log_file_path.is_none());
    }

    #[test]
    fn test_logger_config_carries_log_file() {
        let config = Config::new()
            .with_log_level(LogLevel::Warn)
            .with_log_file("/var/log/promptpix.log");
        let logger = config.logger_config();
        assert_eq!(logger.min_level, LogLevel::Warn);
        assert_eq!(logger.log_file_path.as_deref(), Some("/var/log/promptpix.log"));
        assert!(!logger.output_json);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_service(ServiceConfig::new().with_endpoint("http://localhost:9000/"))
            .with_default_preset(Preset::Youtube)
            .with_download_dir("/tmp/pix")
            .with_page_url("https://pix.example.com");

        assert_eq!(config.service.endpoint, "http://localhost:9000");
        assert_eq!(config.default_preset, Preset::Youtube);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/pix"));
        assert_eq!(config.page_url.as_deref(), Some("https://pix.example.com"));
    }
}
