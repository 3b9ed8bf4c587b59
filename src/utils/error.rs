use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Not found: {message}")]
    NotFoundError { message: String },

    #[error("List '{list_id}' has no rows in field '{field}'")]
    MissingListError { field: String, list_id: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration error in '{field}': {message}")]
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
    Source,
    Data,
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

impl EtlError {
    pub fn not_found(message: impl Into<String>) -> Self {
        EtlError::NotFoundError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::NotFoundError { .. } | EtlError::MissingListError { .. } => {
                ErrorCategory::Source
            }
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::RegexError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Source => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::NotFoundError { .. } => {
                "Check the source directory and that an export file matching the file pattern exists"
            }
            EtlError::MissingListError { .. } => {
                "Verify the list field and list id against the export header and rows"
            }
            EtlError::CsvError(_) => "Inspect the export for a broken header or delimiter",
            EtlError::IoError(_) => "Check file permissions and free disk space",
            EtlError::SerializationError(_) => "Report this, the output document could not be encoded",
            EtlError::RegexError(_) => "Fix the pattern in the configuration file",
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            EtlError::ValidationError { .. } => "Correct the offending rows in the source TSV",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::NotFoundError { message } => format!("找不到來源檔案: {}", message),
            EtlError::MissingListError { field, list_id } => {
                format!("No rows where {} = {}", field, list_id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
