use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    System,
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
            AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::SerializationError(_) => ErrorCategory::Configuration,
            AppError::HttpClientError(_) => ErrorCategory::Network,
            AppError::IoError(_) | AppError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AppError::ConfigValidationError { field, .. } => {
                format!("Check the '{}' entry of the configuration file", field)
            }
            AppError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            AppError::MissingConfigError { field } => {
                format!("Set '{}' in the config file, ADDON_OPTIONS or on the command line", field)
            }
            AppError::SerializationError(_) => {
                "Make sure ADDON_OPTIONS contains valid JSON".to_string()
            }
            AppError::HttpClientError(_) => {
                "Check that the TLS backend is available and the Grocy URL is reachable".to_string()
            }
            AppError::IoError(_) => {
                "Check file permissions and that the port is not already in use".to_string()
            }
            AppError::ServerError { .. } => "Inspect the logs above for the root cause".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not set up the Grocy connection: {}", self),
            ErrorCategory::System => format!("The server could not start: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a single call to the inventory service.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("resource not found")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}
