use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModalError {
    #[error("Comment service request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Comment service unreachable: {message}")]
    NetworkError { message: String },

    #[error("Comment service returned HTTP {status}")]
    ServiceStatusError { status: u16 },

    #[error("Malformed comment payload: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Stale response for image {index} discarded")]
    StaleSession { index: u32 },

    #[error("Invalid {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Element '{id}' not found on the document surface")]
    MissingElement { id: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    MalformedResponse,
    StaleSession,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ModalError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        ModalError::ValidationError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ModalError::HttpError(_)
            | ModalError::NetworkError { .. }
            | ModalError::ServiceStatusError { .. } => ErrorCategory::Network,
            ModalError::MalformedResponse(_) => ErrorCategory::MalformedResponse,
            ModalError::StaleSession { .. } => ErrorCategory::StaleSession,
            ModalError::ValidationError { .. } => ErrorCategory::Validation,
            ModalError::ConfigError { .. }
            | ModalError::InvalidConfigValueError { .. }
            | ModalError::MissingElement { .. } => ErrorCategory::Configuration,
            ModalError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::StaleSession => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::MalformedResponse => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_network_failure(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    /// 顯示在留言區內的提示文字
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Comments could not be loaded right now.".to_string(),
            ErrorCategory::MalformedResponse => {
                "The comment service sent something we could not read.".to_string()
            }
            ErrorCategory::StaleSession => "This response is no longer current.".to_string(),
            ErrorCategory::Validation => self.to_string(),
            ErrorCategory::Configuration | ErrorCategory::System => {
                format!("Something went wrong: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the comment service is running and try again",
            ErrorCategory::MalformedResponse => {
                "Make sure the comment service returns a JSON array of comments"
            }
            ErrorCategory::StaleSession => "No action needed",
            ErrorCategory::Validation => "Fill in every field of the comment form",
            ErrorCategory::Configuration => "Check the configuration file and command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ModalError>;
