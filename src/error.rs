use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("record not found")]
    NotFound,

    #[error("record conflict: {message}")]
    Conflict { message: String },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        details: Option<JsonValue>,
    },

    #[error("not enough data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("cannot fit a degree {degree} curve to {samples} distinct samples")]
    UnderdeterminedFit { degree: usize, samples: usize },

    #[error("malformed timestamp: {value}")]
    MalformedTimestamp { value: String },

    #[error("numerical failure: {message}")]
    NumericalFailure { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "liftcast::validation", %message, "validation error");
        AppError::Validation {
            message,
            source: None,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "liftcast::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        warn!(target: "liftcast::forecast", required, actual, "insufficient data");
        AppError::InsufficientData { required, actual }
    }

    pub fn underdetermined_fit(degree: usize, samples: usize) -> Self {
        warn!(target: "liftcast::forecast", degree, samples, "underdetermined fit");
        AppError::UnderdeterminedFit { degree, samples }
    }

    pub fn malformed_timestamp(value: impl Into<String>) -> Self {
        let value = value.into();
        warn!(target: "liftcast::timestamp", %value, "malformed timestamp");
        AppError::MalformedTimestamp { value }
    }

    pub fn numerical_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "liftcast::forecast", %message, "numerical failure");
        AppError::NumericalFailure { message }
    }

    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "liftcast::config", %message, "configuration error");
        AppError::Config { message }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "liftcast::conflict", %message, "conflict error");
        AppError::Conflict { message }
    }

    pub fn not_found() -> Self {
        warn!(target: "liftcast::database", "resource not found");
        AppError::NotFound
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "liftcast::database", %message, "database error");
        AppError::Database { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "liftcast::other", %message, "other error");
        AppError::Other(message)
    }

    /// Errors a caller can recover from by logging more workouts or asking for less.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::InsufficientData { .. }
                | AppError::UnderdeterminedFit { .. }
                | AppError::Validation { .. }
                | AppError::NotFound
        )
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::{QueryReturnedNoRows, SqliteFailure};
        use rusqlite::ErrorCode;

        match &error {
            QueryReturnedNoRows => AppError::not_found(),
            SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                AppError::conflict("unique or constraint violation")
            }
            _ => {
                error!(target: "liftcast::database", error = ?error, "sqlite error");
                AppError::database(error.to_string())
            }
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(error: serde_yaml::Error) -> Self {
        AppError::config(error.to_string())
    }
}
