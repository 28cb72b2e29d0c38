use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported style file format: {path}")]
    UnsupportedConfigFormat { path: String },

    #[error("Source file not found: {path}")]
    MissingSourceError { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Serialization,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LintError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LintError::IoError(_) | LintError::MissingSourceError { .. } => ErrorCategory::Io,
            LintError::JsonError(_) | LintError::CsvError(_) => ErrorCategory::Serialization,
            LintError::TomlError(_)
            | LintError::ConfigValidationError { .. }
            | LintError::InvalidConfigValueError { .. }
            | LintError::UnsupportedConfigFormat { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Process exit code used by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Serialization | ErrorCategory::Io => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LintError::IoError(e) => format!("Could not read or write a file: {}", e),
            LintError::MissingSourceError { path } => {
                format!("The source file '{}' does not exist", path)
            }
            LintError::JsonError(e) => format!("The style file is not valid JSON: {}", e),
            LintError::TomlError(e) => format!("The style file is not valid TOML: {}", e),
            LintError::CsvError(e) => format!("Could not write the CSV report: {}", e),
            LintError::ConfigValidationError { field, message } => {
                format!("Style setting '{}' is invalid: {}", field, message)
            }
            LintError::InvalidConfigValueError { field, value, reason } => {
                format!("Style setting '{}' has invalid value '{}': {}", field, value, reason)
            }
            LintError::UnsupportedConfigFormat { path } => {
                format!("Cannot tell the format of the style file '{}'", path)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LintError::IoError(_) => "Check that the path exists and is readable",
            LintError::MissingSourceError { .. } => "Pass an existing .cs file as a source",
            LintError::JsonError(_) | LintError::TomlError(_) => {
                "Fix the syntax of the style file"
            }
            LintError::CsvError(_) => "Choose another output path or the text format",
            LintError::ConfigValidationError { .. } | LintError::InvalidConfigValueError { .. } => {
                "Correct the setting value in the style file"
            }
            LintError::UnsupportedConfigFormat { .. } => {
                "Use a .style, .json or .toml style file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LintError>;
