use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

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

    #[error("Format error: {message}")]
    FormatError { message: String },

    #[error("Invalid timestamp format: {format:?}")]
    InvalidTimestampFormat { format: String },

    #[error("Unknown language: {language}")]
    UnknownLanguage { language: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },
}

pub type Result<T> = std::result::Result<T, PrintError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Formatting,
    Translation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrintError {
    pub fn format(message: impl Into<String>) -> Self {
        PrintError::FormatError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PrintError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PrintError::IoError(_) => ErrorCategory::Io,
            PrintError::SerializationError(_)
            | PrintError::FormatError { .. }
            | PrintError::InvalidTimestampFormat { .. } => ErrorCategory::Formatting,
            PrintError::UnknownLanguage { .. } => ErrorCategory::Translation,
            PrintError::PatternError(_)
            | PrintError::ConfigError { .. }
            | PrintError::ConfigValidationError { .. }
            | PrintError::InvalidConfigValueError { .. }
            | PrintError::MissingConfigError { .. }
            | PrintError::UnknownVariable { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 輸出管道被關閉（例如 `| head`）不算失敗
            PrintError::IoError(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                ErrorSeverity::Low
            }
            PrintError::IoError(_) => ErrorSeverity::Critical,
            PrintError::FormatError { .. } | PrintError::UnknownVariable { .. } => {
                ErrorSeverity::Medium
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrintError::IoError(e) => format!("Could not write output: {}", e),
            PrintError::ConfigValidationError { field, message } => {
                format!("The configuration field '{}' is invalid: {}", field, message)
            }
            PrintError::InvalidConfigValueError { field, reason, .. } => {
                format!("The value of '{}' is not usable: {}", field, reason)
            }
            PrintError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            PrintError::UnknownLanguage { language } => {
                format!("No short name is registered for language '{}'", language)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Io => {
                "Check that the output stream is open and the log directory is writable".to_string()
            }
            ErrorCategory::Configuration => {
                "Review the configuration file and command line flags".to_string()
            }
            ErrorCategory::Formatting => match self {
                PrintError::InvalidTimestampFormat { .. } => {
                    "Use chrono strftime specifiers plus {tzname} and {tzoffset}".to_string()
                }
                _ => "Check the placeholders and arguments of the message".to_string(),
            },
            ErrorCategory::Translation => {
                "Add the language to [translation.languages]".to_string()
            }
        }
    }
}
