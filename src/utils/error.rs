use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("Origin and destination must both be postal codes or both be region ids")]
    MixedLocationKinds,

    #[error("No {what} found for '{key}'")]
    LookupNotFound { what: String, key: String },

    #[error("{what} lookup unavailable: {message}")]
    LookupUnavailable { what: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    LookupNotFound,
    LookupUnavailable,
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

impl EstimateError {
    pub fn not_found(what: &str, key: impl ToString) -> Self {
        Self::LookupNotFound {
            what: what.to_string(),
            key: key.to_string(),
        }
    }

    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::MissingField { .. }
            | Self::InvalidCoordinate { .. }
            | Self::MixedLocationKinds => ErrorCategory::Input,
            Self::LookupNotFound { .. } => ErrorCategory::LookupNotFound,
            Self::LookupUnavailable { .. } | Self::HttpError(_) => ErrorCategory::LookupUnavailable,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::LookupNotFound => ErrorSeverity::High,
            // 暫時性錯誤，稍後重試即可
            ErrorCategory::LookupUnavailable => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::LookupUnavailable
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidInput { field, .. } => {
                format!("Check the value entered for '{}'", field)
            }
            Self::MissingField { field } => format!("Fill in '{}'", field),
            Self::InvalidCoordinate { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string()
            }
            Self::MixedLocationKinds => {
                "Use postal codes for both locations, or region ids for both".to_string()
            }
            Self::LookupNotFound { what, .. } => {
                format!("Make sure the rate table contains a matching {} entry", what)
            }
            Self::LookupUnavailable { .. } | Self::HttpError(_) => {
                "Check the network connection and try again later".to_string()
            }
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. }
            | Self::MissingConfigError { field } => {
                format!("Fix '{}' in the rate configuration file", field)
            }
            Self::CsvError(_) => "Check the distance table CSV format (from,to,km)".to_string(),
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::SerializationError(_) => "Check the JSON document format".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("輸入內容有誤: {}", self),
            ErrorCategory::LookupNotFound => format!("查無對應資料: {}", self),
            ErrorCategory::LookupUnavailable => format!("查詢服務暫時無法使用: {}", self),
            ErrorCategory::Configuration => format!("設定檔錯誤: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            EstimateError::not_found("truck tier", 999).category(),
            ErrorCategory::LookupNotFound
        );
        assert_eq!(
            EstimateError::MixedLocationKinds.category(),
            ErrorCategory::Input
        );
        let unavailable = EstimateError::LookupUnavailable {
            what: "postal code".to_string(),
            message: "timeout".to_string(),
        };
        assert_eq!(unavailable.category(), ErrorCategory::LookupUnavailable);
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_not_found_message() {
        let err = EstimateError::not_found("season coefficient", "2026-08-01");
        assert_eq!(
            err.to_string(),
            "No season coefficient found for '2026-08-01'"
        );
        assert!(!err.is_retryable());
    }
}
