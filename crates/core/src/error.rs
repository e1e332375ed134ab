//! Error types for s3seed-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for s3seed-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for s3seed-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file exists but could not be read or parsed
    #[error("Invalid configuration in {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    /// The bucket name is already taken on the storage service
    #[error("Bucket '{0}' already exists. Please choose a different name.")]
    BucketAlreadyExists(String),

    /// Any other failure reported by the storage service
    #[error("{0}")]
    Service(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether this error means the bucket name is already taken
    pub fn is_bucket_already_exists(&self) -> bool {
        matches!(self, Error::BucketAlreadyExists(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_message() {
        let err = Error::BucketAlreadyExists("my-bucket".to_string());
        assert!(err.is_bucket_already_exists());
        assert_eq!(
            err.to_string(),
            "Bucket 'my-bucket' already exists. Please choose a different name."
        );
    }

    #[test]
    fn test_service_message_is_verbatim() {
        let err = Error::Service("Access Denied".to_string());
        assert!(!err.is_bucket_already_exists());
        assert_eq!(err.to_string(), "Access Denied");
    }
}
