use crate::core::modal::{DEFAULT_MAX_BODY_LENGTH, DEFAULT_MAX_USERNAME_LENGTH};
use crate::core::ConfigProvider;
use crate::utils::error::{ModalError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub gallery: GallerySection,
    #[serde(default)]
    pub comments: CommentLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GallerySection {
    pub image_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentLimits {
    pub max_username_length: Option<usize>,
    pub max_body_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            },
            gallery: GallerySection::default(),
            comments: CommentLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ModalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ModalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMMENTS_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ModalError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl ConfigProvider for GalleryConfig {
    fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.service
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn image_count(&self) -> Option<u32> {
        self.gallery.image_count
    }

    fn max_username_length(&self) -> usize {
        self.comments
            .max_username_length
            .unwrap_or(DEFAULT_MAX_USERNAME_LENGTH)
    }

    fn max_body_length(&self) -> usize {
        self.comments
            .max_body_length
            .unwrap_or(DEFAULT_MAX_BODY_LENGTH)
    }
}

impl Validate for GalleryConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validate_range("service.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        if let Some(count) = self.gallery.image_count {
            validate_positive_number("gallery.image_count", count.into(), 1)?;
        }
        validate_positive_number(
            "comments.max_username_length",
            self.max_username_length() as u64,
            1,
        )?;
        validate_positive_number("comments.max_body_length", self.max_body_length() as u64, 1)?;

        let level = self.log_level();
        if !LOG_LEVELS.contains(&level) {
            return Err(ModalError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: level.to_string(),
                reason: format!("Expected one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = GalleryConfig::from_toml_str(
            r#"
[service]
endpoint = "https://portfolio.example.com"
timeout_seconds = 3

[gallery]
image_count = 12

[comments]
max_username_length = 32
max_body_length = 500

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint(), "https://portfolio.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.image_count(), Some(12));
        assert_eq!(config.max_username_length(), 32);
        assert_eq!(config.max_body_length(), 500);
        assert_eq!(config.log_level(), "debug");
        assert!(config.json_logs());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = GalleryConfig::from_toml_str(
            r#"
[service]
endpoint = "http://localhost:9000"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)
        );
        assert_eq!(config.image_count(), None);
        assert_eq!(config.max_username_length(), DEFAULT_MAX_USERNAME_LENGTH);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("GALLERY_MODAL_TEST_ENDPOINT", "http://comments.internal:8080");
        let config = GalleryConfig::from_toml_str(
            r#"
[service]
endpoint = "${GALLERY_MODAL_TEST_ENDPOINT}"
"#,
        )
        .unwrap();

        assert_eq!(config.endpoint(), "http://comments.internal:8080");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = GalleryConfig::default();
        config.service.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.service.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
        config.service.timeout_seconds = Some(MAX_TIMEOUT_SECONDS + 1);
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.logging.level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_service_section_is_error() {
        let err = GalleryConfig::from_toml_str("[gallery]\nimage_count = 3\n").unwrap_err();
        assert!(matches!(err, ModalError::ConfigError { .. }));
    }
}
