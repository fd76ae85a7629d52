//! Package resource lookup for `resource://` secrets URIs.
//!
//! A `resource://pkgname/rel/path.ini` URI names a file shipped inside an
//! installed package. How "installed package" maps to a filesystem location
//! is deployment-specific, so the lookup is abstracted behind the
//! [`ResourceLocator`] trait with a single operation; the resolver is
//! agnostic to how the lookup works.
//!
//! The default [`FsResourceLocator`] searches an ordered list of root
//! directories. A dotted package name maps to a nested directory (`a.b` →
//! `a/b`), and the first root containing the resource wins. Roots come from
//! the `SECRETSOURCE_RESOURCE_PATH` environment variable (same syntax as
//! `PATH`), falling back to the current working directory.

use std::fs::File;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, SecretsError};

/// Environment variable holding the resource search path.
pub const RESOURCE_PATH_VAR: &str = "SECRETSOURCE_RESOURCE_PATH";

/// Locates a resource inside an installed package.
pub trait ResourceLocator: Send + Sync {
    /// Open the resource at `relative_path` inside `package`.
    ///
    /// Returns [`SecretsError::SourceNotFound`] if the package is not
    /// installed or the path does not exist inside it.
    fn locate(&self, package: &str, relative_path: &str) -> Result<File>;
}

/// Filesystem-backed resource locator.
#[derive(Debug, Clone)]
pub struct FsResourceLocator {
    roots: Vec<PathBuf>,
}

impl FsResourceLocator {
    /// Create a locator searching the given roots in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Create a locator from the `SECRETSOURCE_RESOURCE_PATH` environment
    /// variable, falling back to the current working directory.
    pub fn from_env() -> Self {
        let roots = match std::env::var_os(RESOURCE_PATH_VAR) {
            Some(value) => std::env::split_paths(&value).collect(),
            None => vec![PathBuf::from(".")],
        };
        Self { roots }
    }

    /// The search roots, in lookup order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn package_dir(package: &str) -> PathBuf {
        package.split('.').collect()
    }
}

impl ResourceLocator for FsResourceLocator {
    fn locate(&self, package: &str, relative_path: &str) -> Result<File> {
        let uri = format!("resource://{}/{}", package, relative_path);
        for root in &self.roots {
            let candidate = root.join(Self::package_dir(package)).join(relative_path);
            if candidate.is_file() {
                debug!(path = %candidate.display(), %uri, "located packaged secrets resource");
                return File::open(&candidate)
                    .map_err(|e| SecretsError::source_not_found(&uri, e.to_string()));
            }
        }
        Err(SecretsError::source_not_found(uri, "not found under any resource root"))
    }
}
