use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Location services are disabled by policy")]
    LocationDisabled,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Reverse geocoding failed: {message}")]
    GeocodeError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Policy,
    Provider,
    Network,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl GeoError {
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        GeoError::ProviderUnavailable {
            message: message.into(),
        }
    }

    pub fn geocode(message: impl Into<String>) -> Self {
        GeoError::GeocodeError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GeoError::LocationDisabled | GeoError::PermissionDenied => ErrorCategory::Policy,
            GeoError::ProviderUnavailable { .. } => ErrorCategory::Provider,
            GeoError::ApiError(_) | GeoError::GeocodeError { .. } => ErrorCategory::Network,
            GeoError::IoError(_) | GeoError::SerializationError(_) => ErrorCategory::Io,
            GeoError::ConfigError { .. }
            | GeoError::ConfigValidationError { .. }
            | GeoError::InvalidConfigValueError { .. }
            | GeoError::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GeoError::ProviderUnavailable { .. } => ErrorSeverity::Critical,
            GeoError::LocationDisabled | GeoError::PermissionDenied => ErrorSeverity::High,
            GeoError::ApiError(_) | GeoError::GeocodeError { .. } => ErrorSeverity::Medium,
            GeoError::IoError(_) | GeoError::SerializationError(_) => ErrorSeverity::High,
            GeoError::ConfigError { .. }
            | GeoError::ConfigValidationError { .. }
            | GeoError::InvalidConfigValueError { .. }
            | GeoError::ValidationError { .. } => ErrorSeverity::High,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity().exit_code() != 0
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GeoError::LocationDisabled => {
                "Location services are turned off for this device by system policy.".to_string()
            }
            GeoError::PermissionDenied => {
                "Access to the location provider was denied.".to_string()
            }
            GeoError::ProviderUnavailable { message } => {
                format!("No location provider could be loaded: {}", message)
            }
            GeoError::ApiError(e) => format!("Could not reach the geocoding service: {}", e),
            GeoError::GeocodeError { message } => {
                format!("The geocoding service returned no address: {}", message)
            }
            GeoError::IoError(e) => format!("I/O failure: {}", e),
            GeoError::SerializationError(e) => format!("Could not encode the record: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GeoError::LocationDisabled => {
                "Enable location services or remove the policy that disables them."
            }
            GeoError::PermissionDenied => {
                "Grant this application location access in the system privacy settings."
            }
            GeoError::ProviderUnavailable { .. } => {
                "Install or start the platform location service (GeoClue2 on Linux), or pass --position lat,lon."
            }
            GeoError::ApiError(_) | GeoError::GeocodeError { .. } => {
                "Check network connectivity and try again later."
            }
            GeoError::IoError(_) | GeoError::SerializationError(_) => {
                "Check that standard output is writable."
            }
            GeoError::ConfigError { .. }
            | GeoError::ConfigValidationError { .. }
            | GeoError::InvalidConfigValueError { .. }
            | GeoError::ValidationError { .. } => "Review the command-line options and policy file.",
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
