use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the kamba dictionary core
#[derive(Error, Debug)]
pub enum KambaError {
    #[error("IO error: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Unknown slang entry: {id}")]
    UnknownEntry { id: String },

    #[error("Provider error: {message}")]
    Provider { message: String },
}

impl KambaError {
    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Io {
            source: err,
            path: path.map(|p| p.into()),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog_error(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new unknown entry error
    pub fn unknown_entry(id: impl Into<String>) -> Self {
        Self::UnknownEntry { id: id.into() }
    }

    /// Create a new provider error
    pub fn provider_error(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for KambaError {
    fn from(error: std::io::Error) -> Self {
        KambaError::io_error(error, None::<PathBuf>)
    }
}

impl From<serde_json::Error> for KambaError {
    fn from(error: serde_json::Error) -> Self {
        KambaError::parse_error(error.to_string())
    }
}

impl From<toml::de::Error> for KambaError {
    fn from(error: toml::de::Error) -> Self {
        KambaError::parse_error(error.to_string())
    }
}

impl From<toml::ser::Error> for KambaError {
    fn from(error: toml::ser::Error) -> Self {
        KambaError::parse_error(error.to_string())
    }
}

/// Result type alias using KambaError
pub type KambaResult<T> = Result<T, KambaError>;

/// Contextual error mapping function
pub fn map_io_err<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> KambaError {
    let path = path.into();
    move |err| KambaError::io_error(err, Some(path))
}
