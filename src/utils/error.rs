use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Invalid attempts {attempts}: must be at least 1")]
    InvalidAttempts { attempts: usize },

    #[error("Too many attempts {attempts}: at most {max} allowed")]
    TooManyAttempts { attempts: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ApiError(_) | AppError::ApiStatusError { .. } => ErrorCategory::Network,
            AppError::ConfigError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            AppError::InvalidDuration { .. }
            | AppError::InvalidAttempts { .. }
            | AppError::TooManyAttempts { .. } => ErrorCategory::Input,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// True for errors caused by the request itself rather than the system.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ApiError(_) => "Could not reach the video platform API".to_string(),
            AppError::ApiStatusError { status, .. } => {
                format!("The video platform API rejected the request (HTTP {})", status)
            }
            AppError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::ApiError(_) => "Check your network connection and try again",
            AppError::ApiStatusError { .. } => {
                "Check YOUTUBE_API_KEY and the daily quota of the API project"
            }
            AppError::ConfigError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::ConfigValidationError { .. } => {
                "Review the configuration file and environment variables"
            }
            AppError::InvalidDuration { .. } => {
                "Use minutes (e.g. 30) or HH:MM:SS / MM:SS (e.g. 1:30:00)"
            }
            AppError::InvalidAttempts { .. } => "Request at least one combination",
            AppError::TooManyAttempts { .. } => {
                "Request fewer combinations or raise selection.max_attempts"
            }
            AppError::IoError(_) | AppError::SerializationError(_) => {
                "Make sure the catalog file exists and contains valid JSON"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
