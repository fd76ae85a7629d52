//! Error types for secrets resolution.

use thiserror::Error;

/// Result type for secrets operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while resolving and reading a secrets source.
///
/// Every variant is fatal: resolution is a one-shot configuration load that
/// runs at process startup, so failures surface immediately and no partial
/// mapping is ever returned.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The secrets URI could not be parsed at all.
    #[error("Invalid secrets URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The URI scheme is neither `file` nor `resource`.
    #[error("Unsupported secrets URI scheme '{scheme}' in '{uri}' (only file:// and resource:// are supported)")]
    UnsupportedScheme { scheme: String, uri: String },

    /// The underlying file or packaged resource does not exist or cannot be opened.
    #[error("Secrets source '{uri}' could not be opened: {reason}")]
    SourceNotFound { uri: String, reason: String },

    /// The source bytes are not valid UTF-8 text.
    #[error("Secrets source '{uri}' is not valid UTF-8")]
    Decode {
        uri: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The source text does not parse as well-formed INI.
    #[error("Secrets source '{uri}' is not well-formed INI: {reason}")]
    MalformedSecretsFile { uri: String, reason: String },

    /// An interpolation directive referenced an environment variable that is
    /// not set, while resolving in strict mode.
    #[error("Secrets key '{key}' needs environment variable {variable} in file '{uri}' section [{section}]")]
    MissingEnvironmentVariable { key: String, variable: String, uri: String, section: String },
}

impl SecretsError {
    /// Create an invalid URI error.
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri { uri: uri.into(), reason: reason.into() }
    }

    /// Create an unsupported scheme error.
    pub fn unsupported_scheme(scheme: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::UnsupportedScheme { scheme: scheme.into(), uri: uri.into() }
    }

    /// Create a source not found error.
    pub fn source_not_found(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceNotFound { uri: uri.into(), reason: reason.into() }
    }

    /// Create a malformed secrets file error.
    pub fn malformed(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSecretsFile { uri: uri.into(), reason: reason.into() }
    }

    /// Create a missing environment variable error.
    pub fn missing_environment_variable(
        key: impl Into<String>,
        variable: impl Into<String>,
        uri: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self::MissingEnvironmentVariable {
            key: key.into(),
            variable: variable.into(),
            uri: uri.into(),
            section: section.into(),
        }
    }
}
