use std::fmt;

use crate::provider::memset::ErrorEnvelope;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    InvalidConfig(String),
    TransportError(String),
    ProviderError(ErrorEnvelope),
    DecodeError { reason: String, body: String },
    ZoneNotFound(String),
    UnknownRecord(String),
    PresentFailed(Box<Error>),
    CleanUpFailed(Box<Error>),
    ParseError(String),
    IoError(std::io::Error),
    LockError(String),
}

impl Error {
    /// Strips the Present/CleanUp context and returns the error that caused it.
    pub fn root(&self) -> &Error {
        match self {
            Error::PresentFailed(e) | Error::CleanUpFailed(e) => e.root(),
            e => e,
        }
    }

    /// Only transport failures are worth retrying as-is; everything else
    /// needs the config, the provider account or this crate fixed first.
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), Error::TransportError(_))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PresentFailed(e) | Error::CleanUpFailed(e) => Some(&**e),
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidConfig(e) => write!(f, "invalid config: {}", e),
            Error::TransportError(e) => write!(f, "transport error: {}", e),
            Error::ProviderError(e) => write!(
                f,
                "unexpected response from memset: {} - {}",
                e.error_type, e.error
            ),
            Error::DecodeError { reason, body } => {
                write!(f, "decode error: {} (body: {})", reason, body)
            }
            Error::ZoneNotFound(e) => write!(f, "zone not found: {}", e),
            Error::UnknownRecord(fqdn) => write!(f, "memset: unknown record ID for '{}'", fqdn),
            Error::PresentFailed(e) => write!(f, "memset: present failed: {}", e),
            Error::CleanUpFailed(e) => write!(f, "memset: cleanup failed: {}", e),
            Error::ParseError(e) => write!(f, "Parse error: {}", e),
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::LockError(e) => write!(f, "lock error: {}", e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::TransportError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::ParseError(err.to_string())
    }
}
