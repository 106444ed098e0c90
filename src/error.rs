//! Error handling for the Hasad client

use std::fmt;
use thiserror::Error;

use hasad_functions::FunctionsError;
use hasad_postgrest::PostgrestError;
use hasad_storage::StorageError;

/// Unified error type for backend and session failures
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JWT decoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Database query errors
    #[error("Database error: {0}")]
    Database(#[from] PostgrestError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Edge Function errors
    #[error("Function error: {0}")]
    Function(#[from] FunctionsError),

    /// Missing or expired session
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
