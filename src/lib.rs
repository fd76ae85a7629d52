//! # Secretsource
//!
//! Secretsource loads plaintext INI secrets files addressed by URI and
//! resolves them into a flat `section.key -> value` mapping, expanding
//! values with a leading `$` from process environment variables.
//!
//! Three URI forms are accepted:
//!
//! - `test-secrets.ini` — a path relative to the current working directory
//! - `file:///etc/myproject/mysecrets.ini` — an absolute filesystem path
//! - `resource://mypkg/conf/test-settings.ini` — a path inside installed
//!   package `mypkg`'s resource root
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use secretsource::{read_secrets, Result};
//!
//! fn main() -> Result<()> {
//!     let secrets = read_secrets("resource://mypkg/conf/test-settings.ini", true)?;
//!     if let Some(Some(secret)) = secrets.get("authentication.secret") {
//!         let _raw = secret.expose_secret();
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Resolution is a one-shot, synchronous operation intended to run at
//! process startup: it fails fast on the first configuration gap and never
//! returns a partial mapping. In non-strict mode a missing environment
//! variable degrades to a `None` entry instead of an error, which is useful
//! in test environments where not every secret is expected to be present.

pub mod cli;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod types;
pub mod uri;

// Re-export commonly used types
pub use error::{Result, SecretsError};
pub use locator::{FsResourceLocator, ResourceLocator, RESOURCE_PATH_VAR};
pub use resolver::{read_secrets, resolve_source, SecretsResolver};
pub use types::{SecretValue, SecretsMap};
pub use uri::{SecretsSource, SecretsUri};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
