use thiserror::Error;

/// 折線解碼錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Polyline ends in the middle of a coordinate")]
    Truncated,

    #[error("Invalid polyline byte at position {position}")]
    InvalidByte { position: usize },

    #[error("Polyline value overflows at position {position}")]
    Overflow { position: usize },

    #[error("Decoded point {index} is not a valid coordinate")]
    OutOfRange { index: usize },

    #[error("Unsupported polyline precision: {0}")]
    InvalidPrecision(u32),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectionsError {
    #[error("Invalid directions request: {message}")]
    InvalidRequest { message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("Directions API rejected the request with HTTP {0}")]
    ClientError(u16),

    #[error("Directions API failed with HTTP {0}")]
    ServerError(u16),

    #[error("Malformed directions response: {message}")]
    MalformedResponse { message: String },

    #[error("Route geometry could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    #[error("No route to display")]
    EmptyRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Server,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DirectionsError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// 只有伺服器錯誤和網路錯誤值得由呼叫端重試
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerError(_) | Self::TransportError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest { .. } | Self::ClientError(_) => ErrorCategory::Input,
            Self::TransportError { .. } => ErrorCategory::Network,
            Self::ServerError(_) => ErrorCategory::Server,
            Self::MalformedResponse { .. } | Self::Decode(_) | Self::EmptyRoute => {
                ErrorCategory::Data
            }
        }
    }

    /// Message shown to the user in place of the route.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidRequest { message } => {
                format!("Start or end point is not valid: {}", message)
            }
            Self::TransportError { .. } => {
                "Could not reach the directions service. Check your connection.".to_string()
            }
            Self::ClientError(status) => {
                format!("The directions service refused the request (HTTP {}).", status)
            }
            Self::ServerError(status) => format!(
                "The directions service is having trouble (HTTP {}). Try again later.",
                status
            ),
            Self::MalformedResponse { .. } | Self::Decode(_) | Self::EmptyRoute => {
                "Route unavailable.".to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Directions(#[from] DirectionsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Directions(e) => e.category(),
            AppError::IoError(_) => ErrorCategory::System,
            AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Directions(e) if e.is_retryable() => ErrorSeverity::Medium,
            AppError::Directions(_) => ErrorSeverity::High,
            AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorSeverity::High,
            AppError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AppError::Directions(e) => match e {
                DirectionsError::InvalidRequest { .. } => {
                    "Pass coordinates as \"lon,lat\", e.g. \"2.3522,48.8566\"".to_string()
                }
                DirectionsError::ClientError(401) | DirectionsError::ClientError(403) => {
                    "Check the access token (MAPBOX_ACCESS_TOKEN)".to_string()
                }
                DirectionsError::ClientError(_) => {
                    "Check the profile and coordinates sent to the API".to_string()
                }
                DirectionsError::ServerError(_) | DirectionsError::TransportError { .. } => {
                    "Retry later or raise --retry-attempts".to_string()
                }
                _ => "Try a different start or end point".to_string(),
            },
            AppError::ConfigValidationError { field, .. }
            | AppError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting", field)
            }
            AppError::MissingConfigError { field } => format!("Provide '{}'", field),
            AppError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Directions(e) => e.user_friendly_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
