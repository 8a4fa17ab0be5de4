use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed snapshot: {message}")]
    SnapshotError { message: String },

    #[error("Rationale provider failed: {message}")]
    RationaleError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Data,
    Configuration,
    ExternalService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AllocError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AllocError::IoError(_) => ErrorCategory::Io,
            AllocError::HttpError(_) => ErrorCategory::Network,
            AllocError::SerializationError(_)
            | AllocError::SnapshotError { .. } => ErrorCategory::Data,
            AllocError::ConfigError { .. }
            | AllocError::ConfigValidationError { .. }
            | AllocError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AllocError::RationaleError { .. } => ErrorCategory::ExternalService,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 說明文字失敗不影響分配結果
            AllocError::RationaleError { .. } => ErrorSeverity::Low,
            AllocError::HttpError(_) => ErrorSeverity::Medium,
            AllocError::ConfigError { .. }
            | AllocError::ConfigValidationError { .. }
            | AllocError::InvalidConfigValueError { .. }
            | AllocError::SerializationError(_)
            | AllocError::SnapshotError { .. } => ErrorSeverity::High,
            AllocError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the snapshot path exists and is writable",
            ErrorCategory::Network => "Check network connectivity and the rationale endpoint",
            ErrorCategory::Data => {
                "Check that the snapshot JSON has 'resources' and 'zones' arrays with valid fields"
            }
            ErrorCategory::Configuration => "Fix the configuration file or CLI arguments",
            ErrorCategory::ExternalService => {
                "The plan is still valid; verify the rationale API key if a summary is needed"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AllocError::IoError(e) => format!("Could not read or write a file: {}", e),
            AllocError::SnapshotError { message } => {
                format!("The resource/zone snapshot could not be parsed: {}", message)
            }
            AllocError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Setting '{}' has an unusable value '{}': {}", field, value, reason),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AllocError>;
