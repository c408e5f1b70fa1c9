//! # Error Types Module
//!
//! Centralized error handling for glucose-glance.
//! Each collaborator gets its own error type so callers can decide which
//! failures end a timeline cycle and which ones are only logged.
//!
//! ## Error Types
//! - `FetchError`: Remote glucose data source failures (transport, auth, parsing)
//! - `StoreError`: Looper account store read and parse failures
//! - `ConfigError`: Configuration file I/O and parsing errors
//! - `TimelineError`: Failures that abort a timeline cycle
//!
//! ## How They Flow
//! ```rust,ignore
//! // Data sources surface FetchError, the provider wraps it
//! async fn fetch_glucose_samples(&self, looper: &Looper) -> Result<Vec<GlucoseSample>, FetchError>;
//! pub async fn timeline(&self, config: &WidgetConfiguration) -> Result<Timeline, TimelineError>;
//!
//! // Store errors never leave the provider; they are logged and degraded
//! pub fn recommendations(&self) -> Vec<LooperRecommendation>;
//! ```

use std::fmt;

/// Errors reported by a glucose data source
#[derive(Debug)]
pub enum FetchError {
    /// Network or service level failure
    Transport(String),
    /// Credentials were rejected by the remote service
    Unauthorized(String),
    /// Response could not be decoded into samples
    Parse(String),
    /// Local I/O failure (replay files)
    Io(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => {
                write!(f, "Glucose data transport failed: {}", msg)
            }
            FetchError::Unauthorized(msg) => {
                write!(f, "Glucose data source rejected credentials: {}", msg)
            }
            FetchError::Parse(msg) => {
                write!(f, "Failed to parse glucose samples: {}", msg)
            }
            FetchError::Io(e) => {
                write!(f, "Failed to read glucose samples: {}", e)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors that can occur while reading the looper account store
#[derive(Debug)]
pub enum StoreError {
    /// Failed to read the store file
    Read(std::io::Error),
    /// Failed to parse the store file
    Parse(toml::de::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read(e) => write!(f, "Failed to read looper store: {}", e),
            StoreError::Parse(e) => write!(f, "Failed to parse looper store: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Read(e) => Some(e),
            StoreError::Parse(e) => Some(e),
        }
    }
}

/// Errors that can occur during configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read config file
    ReadFailed(std::io::Error),
    /// Failed to write config file
    WriteFailed(std::io::Error),
    /// Failed to parse config file
    ParseFailed(toml::de::Error),
    /// Failed to serialize config
    SerializeFailed(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed(e) => {
                write!(f, "Failed to read config file: {}", e)
            }
            ConfigError::WriteFailed(e) => {
                write!(f, "Failed to write config file: {}", e)
            }
            ConfigError::ParseFailed(e) => {
                write!(f, "Failed to parse config file: {}", e)
            }
            ConfigError::SerializeFailed(e) => {
                write!(f, "Failed to serialize config: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadFailed(e) => Some(e),
            ConfigError::WriteFailed(e) => Some(e),
            ConfigError::ParseFailed(e) => Some(e),
            ConfigError::SerializeFailed(e) => Some(e),
        }
    }
}

/// Errors that abort a timeline cycle.
///
/// A missing looper is not in here: it produces a placeholder entry instead.
#[derive(Debug)]
pub enum TimelineError {
    /// The data source could not deliver samples
    Fetch(FetchError),
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::Fetch(e) => write!(f, "Timeline refresh failed: {}", e),
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimelineError::Fetch(e) => Some(e),
        }
    }
}

impl From<FetchError> for TimelineError {
    fn from(e: FetchError) -> Self {
        TimelineError::Fetch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Unauthorized("bad api secret".to_string());
        assert!(err.to_string().contains("bad api secret"));
    }

    #[test]
    fn test_config_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::ReadFailed(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_timeline_error_wraps_fetch_error() {
        let err: TimelineError = FetchError::Transport("timed out".to_string()).into();
        assert!(err.to_string().contains("timed out"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_store_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::Read(io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("looper store"));
    }
}
