//! Secrets URI parsing.
//!
//! A secrets source is addressed by one of three URI forms:
//!
//! - `somefile.ini` — no scheme; resolved against the current working
//!   directory as `file://${CWD}/somefile.ini`
//! - `file:///abs/path.ini` — absolute filesystem path
//! - `resource://pkgname/rel/path.ini` — path inside installed package
//!   `pkgname`'s resource root (see [`crate::locator`])
//!
//! Any other scheme is rejected as a configuration error before any I/O.

use std::path::PathBuf;

use url::Url;

use crate::error::{Result, SecretsError};

/// The location a secrets URI points at, after scheme dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsSource {
    /// An absolute filesystem path.
    File(PathBuf),
    /// A path relative to an installed package's resource root.
    Resource { package: String, path: String },
}

/// A parsed secrets URI.
///
/// Keeps the original input string alongside the dispatched source so error
/// messages can name the URI exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsUri {
    raw: String,
    source: SecretsSource,
}

impl SecretsUri {
    /// Parse a secrets URI string.
    ///
    /// A string without a `://` separator is treated as a file path relative
    /// to the current working directory.
    pub fn parse(input: &str) -> Result<Self> {
        let url = if input.contains("://") {
            Url::parse(input).map_err(|e| SecretsError::invalid_uri(input, e.to_string()))?
        } else {
            let cwd = std::env::current_dir().map_err(|e| {
                SecretsError::invalid_uri(input, format!("cannot resolve working directory: {}", e))
            })?;
            Url::from_file_path(cwd.join(input)).map_err(|_| {
                SecretsError::invalid_uri(input, "relative path does not form a file URL")
            })?
        };

        let source = match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    SecretsError::invalid_uri(input, "file URI has no usable path")
                })?;
                SecretsSource::File(path)
            }
            "resource" => {
                let package = url.host_str().filter(|p| !p.is_empty()).ok_or_else(|| {
                    SecretsError::invalid_uri(input, "resource URI is missing a package name")
                })?;
                let path = url.path().trim_start_matches('/');
                if path.is_empty() {
                    return Err(SecretsError::invalid_uri(
                        input,
                        "resource URI is missing a path inside the package",
                    ));
                }
                SecretsSource::Resource { package: package.to_string(), path: path.to_string() }
            }
            other => return Err(SecretsError::unsupported_scheme(other, input)),
        };

        Ok(Self { raw: input.to_string(), source })
    }

    /// The URI string exactly as the caller supplied it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The dispatched source location.
    pub fn source(&self) -> &SecretsSource {
        &self.source
    }
}
