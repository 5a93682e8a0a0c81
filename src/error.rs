//! Error types for the media gallery

use std::path::PathBuf;
use thiserror::Error;

/// Error kinds that can occur while scanning a media directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// I/O error during listing
    IoError,
    /// File name is not valid UTF-8 and cannot become a public URL
    InvalidName,
}

/// Represents an error that occurred during scanning
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct ScanError {
    /// The kind of error
    pub kind: ScanErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl ScanError {
    /// Create a new scan error
    pub fn new(kind: ScanErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: PathBuf) -> Self {
        Self::new(
            ScanErrorKind::NotFound,
            Some(path.clone()),
            format!("Not found: {:?}", path),
        )
    }

    /// Create an invalid name error
    pub fn invalid_name(path: PathBuf) -> Self {
        Self::new(
            ScanErrorKind::InvalidName,
            Some(path.clone()),
            format!("File name is not valid UTF-8: {:?}", path),
        )
    }

    /// Attach the path the error occurred at
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Whether this error is the ordinary "no content yet" state
    pub fn is_not_found(&self) -> bool {
        self.kind == ScanErrorKind::NotFound
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => ScanErrorKind::NotFound,
            _ => ScanErrorKind::IoError,
        };
        Self::new(kind, None, err.to_string())
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let kind = match err.io_error().map(|e| e.kind()) {
            Some(std::io::ErrorKind::PermissionDenied) => ScanErrorKind::PermissionDenied,
            Some(std::io::ErrorKind::NotFound) => ScanErrorKind::NotFound,
            _ => ScanErrorKind::IoError,
        };
        Self::new(kind, path, err.to_string())
    }
}

/// Client-side failure to obtain a listing or an asset
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (connection refused, reset, timeout)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),
    /// Response body did not match the expected schema
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure to load a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to start the HTTP server
#[derive(Debug, Error)]
#[error("cannot bind {addr}: {message}")]
pub struct ServeError {
    pub addr: std::net::SocketAddr,
    pub message: String,
}
