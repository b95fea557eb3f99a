use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Source API unavailable: {message}")]
    SourceUnavailableError { message: String },

    #[error("Record field missing or malformed: {field}")]
    MalformedRecordError { field: String },

    #[error("Bulk write to destination failed: {message}")]
    DestinationWriteError { message: String },

    #[error("Index bootstrap failed: {message}")]
    IndexBootstrapError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Data,
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                ErrorCategory::Source
            }
            EtlError::MalformedRecordError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Data
            }
            EtlError::DestinationWriteError { .. } | EtlError::IndexBootstrapError { .. } => {
                ErrorCategory::Destination
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // A single bad record is dropped and the run keeps going.
            EtlError::MalformedRecordError { .. } => ErrorSeverity::Low,
            // One page's load is skipped; later pages still run.
            EtlError::DestinationWriteError { .. } | EtlError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            // The source layer is down; remaining pages are lost.
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => ErrorSeverity::High,
            // Nothing useful can happen without configuration or an index.
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::IndexBootstrapError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the endpoint URL".to_string(),
            EtlError::SerializationError(_) => {
                "Inspect the record payload that failed to encode".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Set the {} environment variable before running", field)
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value supplied for {} and retry", field)
            }
            EtlError::SourceUnavailableError { .. } => {
                "Verify the dataset id and app token, then re-run; use --init_offset to resume from the last completed page"
                    .to_string()
            }
            EtlError::MalformedRecordError { .. } => {
                "No action needed; the record is skipped".to_string()
            }
            EtlError::DestinationWriteError { .. } => {
                "Check the destination host and credentials; re-run the affected pages with --init_offset"
                    .to_string()
            }
            EtlError::IndexBootstrapError { .. } => {
                "Verify ES_HOST, ES_USERNAME and ES_PASSWORD, and that the cluster is reachable"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) => format!("Request to external service failed: {}", e),
            EtlError::SerializationError(e) => format!("Could not encode a record: {}", e),
            EtlError::MissingConfigError { field } => {
                format!("Required environment variable '{}' is not set", field)
            }
            EtlError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => {
                format!("'{}' is not a valid {}: {}", value, field, reason)
            }
            EtlError::SourceUnavailableError { message } => {
                format!("The source API could not be reached: {}", message)
            }
            EtlError::MalformedRecordError { field } => {
                format!(
                    "A record was skipped because '{}' was missing or malformed",
                    field
                )
            }
            EtlError::DestinationWriteError { message } => {
                format!("A page could not be written to the destination: {}", message)
            }
            EtlError::IndexBootstrapError { message } => {
                format!("Could not create the destination index: {}", message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
