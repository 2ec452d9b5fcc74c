//! Error Types for Tarot Assets

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssetError>;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Listing {path} failed: {message}")]
    Listing { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
