//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("client_id must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: client_id must not be empty"
        );

        let err = AppError::TokenExchange("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Token exchange error: connection refused"
        );
    }

    #[test]
    fn test_error_to_string_conversion() {
        let err = AppError::TokenExchange("timed out".to_string());
        let message: String = err.into();
        assert_eq!(message, "Token exchange error: timed out");
    }

    #[test]
    fn test_serialization_error_from() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
