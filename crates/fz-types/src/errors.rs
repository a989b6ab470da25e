use thiserror::Error;

use crate::names::ParamName;
use crate::value::ParamKind;

/// Main error type for the Furze system
#[derive(Error, Debug)]
pub enum FzError {
    #[error("Params error: {0}")]
    Params(#[from] ParamsError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by parameter sets and grids
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("Kind mismatch for {name}: expected {expected}, found {actual}")]
    KindMismatch {
        name: ParamName,
        expected: ParamKind,
        actual: ParamKind,
    },

    #[error("Parameter {name} is not representable as JSON: {reason}")]
    NotRepresentable { name: ParamName, reason: String },

    #[error("Parameter {name} has no candidate values")]
    EmptyCandidates { name: ParamName },
}

/// Search-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("No trials have been recorded")]
    NoTrials,

    #[error("Invalid search configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for Furze operations
pub type FzResult<T> = Result<T, FzError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::FzError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::FzError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParamsError::KindMismatch {
            name: ParamName::LR,
            expected: ParamKind::Float32,
            actual: ParamKind::Str,
        };

        let message = error.to_string();
        assert!(message.contains("Lr"));
        assert!(message.contains("float32"));
        assert!(message.contains("string"));
    }

    #[test]
    fn test_error_conversion() {
        let params_error = ParamsError::EmptyCandidates {
            name: ParamName::REG,
        };
        let fz_error: FzError = params_error.into();

        match fz_error {
            FzError::Params(ParamsError::EmptyCandidates { name }) => {
                assert_eq!(name, ParamName::REG)
            }
            _ => panic!("Expected Params error"),
        }

        let fz_error: FzError = SearchError::NoTrials.into();
        assert!(matches!(fz_error, FzError::Search(SearchError::NoTrials)));
    }

    #[test]
    fn test_macros() {
        let validation_err = validation_error!("Invalid value: {}", 42);
        assert_eq!(validation_err.to_string(), "Validation error: Invalid value: 42");

        let config_err = config_error!("Missing required field: {}", "strategy");
        assert!(matches!(config_err, FzError::Config(_)));
    }
}
