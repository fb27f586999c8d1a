use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ConfigurationError(String),
    FileNotFound(String),
    AuthError(String),
    RemoteServiceError { status: u16, body: String },
    NetworkError(String),
    ValidationError(String),
    ParseError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::FileNotFound(path) => write!(f, "File not found: {}", path),
            AppError::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            AppError::RemoteServiceError { status, body } => {
                write!(f, "Remote service error ({}): {}", status, body)
            }
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
