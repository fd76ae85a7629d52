//! Secrets resolution: URI to open stream, stream to resolved mapping.
//!
//! [`SecretsResolver`] is the single entry point of this crate. Given a
//! secrets URI it locates the underlying byte stream
//! ([`SecretsResolver::resolve_source`]), parses the bytes as UTF-8 INI text
//! and performs environment-variable interpolation
//! ([`SecretsResolver::read_secrets`]), producing a flat ordered
//! `section.key` mapping.
//!
//! The secrets file is plaintext INI. Values with a leading `$` are
//! indirections to environment variables, expanded once at load time:
//!
//! ```ini
//! [authentication]
//! secret = CHANGEME
//!
//! [facebook]
//! consumer_key = $FACEBOOK_CONSUMER_KEY
//! consumer_secret = $FACEBOOK_CONSUMER_SECRET
//! ```
//!
//! Resolution is a synchronous one-shot transform with no caching and no
//! shared mutable state; each call opens its own stream and builds its own
//! mapping, so concurrent calls never interfere.

use std::fs::File;
use std::io::Read;

use ini::Ini;
use tracing::{debug, warn};

use crate::error::{Result, SecretsError};
use crate::locator::{FsResourceLocator, ResourceLocator};
use crate::types::{SecretValue, SecretsMap};
use crate::uri::{SecretsSource, SecretsUri};

/// Resolves secrets URIs to byte streams and flat secret mappings.
///
/// Constructed once per process or per call; holds only the resource locator
/// used for `resource://` URIs.
pub struct SecretsResolver {
    locator: Box<dyn ResourceLocator>,
}

impl Default for SecretsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretsResolver {
    /// Create a resolver with the default filesystem resource locator.
    pub fn new() -> Self {
        Self { locator: Box::new(FsResourceLocator::from_env()) }
    }

    /// Create a resolver with a custom resource locator.
    pub fn with_locator(locator: Box<dyn ResourceLocator>) -> Self {
        Self { locator }
    }

    /// Resolve a secrets URI to an open binary stream positioned at offset 0.
    ///
    /// Ownership of the stream transfers to the caller; it is closed when
    /// dropped. See [`crate::uri`] for the accepted URI forms.
    pub fn resolve_source(&self, uri: &str) -> Result<File> {
        let parsed = SecretsUri::parse(uri)?;
        debug!(%uri, "resolving secrets source");
        match parsed.source() {
            SecretsSource::File(path) => File::open(path)
                .map_err(|e| SecretsError::source_not_found(uri, e.to_string())),
            SecretsSource::Resource { package, path } => self.locator.locate(package, path),
        }
    }

    /// Read a secrets file and resolve it to a flat `section.key` mapping.
    ///
    /// Section and key names are lower-cased. A value with a leading `$` is
    /// replaced by the named environment variable; when the variable is not
    /// set, strict mode fails with
    /// [`SecretsError::MissingEnvironmentVariable`] while non-strict mode
    /// records the entry as `None`. Duplicate `(section, key)` pairs are
    /// last-write-wins. Entries keep the declaration order of the source.
    pub fn read_secrets(&self, uri: &str, strict: bool) -> Result<SecretsMap> {
        let mut stream = self.resolve_source(uri)?;
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| SecretsError::source_not_found(uri, e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| SecretsError::Decode { uri: uri.to_string(), source: e })?;

        let ini = Ini::load_from_str(&text)
            .map_err(|e| SecretsError::malformed(uri, e.to_string()))?;

        let mut secrets = SecretsMap::new();
        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                // Keys before any [section] header have no composite key.
                if properties.iter().next().is_some() {
                    return Err(SecretsError::malformed(
                        uri,
                        "key/value pairs found before any [section] header",
                    ));
                }
                continue;
            };
            let section = section.to_lowercase();

            for (key, raw_value) in properties.iter() {
                let key = key.to_lowercase();
                let value = match raw_value.strip_prefix('$') {
                    Some(variable) => match std::env::var(variable) {
                        Ok(resolved) => Some(SecretValue::new(resolved)),
                        Err(_) if strict => {
                            return Err(SecretsError::missing_environment_variable(
                                key.as_str(),
                                variable,
                                uri,
                                section.as_str(),
                            ));
                        }
                        Err(_) => {
                            warn!(%key, %variable, %section, "environment variable for secrets key is not set");
                            None
                        }
                    },
                    None => Some(SecretValue::new(raw_value)),
                };
                secrets.insert(format!("{}.{}", section, key), value);
            }
        }

        debug!(%uri, entries = secrets.len(), "resolved secrets mapping");
        Ok(secrets)
    }
}

/// Resolve a secrets URI to an open stream using a default resolver.
pub fn resolve_source(uri: &str) -> Result<File> {
    SecretsResolver::new().resolve_source(uri)
}

/// Read a secrets file to a flat mapping using a default resolver.
pub fn read_secrets(uri: &str, strict: bool) -> Result<SecretsMap> {
    SecretsResolver::new().read_secrets(uri, strict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_secrets_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        format!("file://{}", path.display())
    }

    #[test]
    fn test_round_trip_literal_values() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[sec]\nkey = value\n");

        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets["sec.key"].as_ref().unwrap(), "value");
    }

    #[test]
    fn test_section_and_key_names_are_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[Authentication]\nSecret = CHANGEME\n");

        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        assert!(secrets.contains_key("authentication.secret"));
        assert_eq!(secrets["authentication.secret"].as_ref().unwrap(), "CHANGEME");
    }

    #[test]
    fn test_comments_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(
            &dir,
            "secrets.ini",
            "[authomatic]\n# This is a secret seed used in various OAuth related keys\nsecret = CHANGEME\n",
        );

        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        assert_eq!(secrets.len(), 1);
    }

    #[test]
    #[serial]
    fn test_interpolation_with_present_variable() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[s]\nk = $FOO_SECRET\n");

        std::env::set_var("FOO_SECRET", "bar");
        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        std::env::remove_var("FOO_SECRET");

        assert_eq!(secrets["s.k"].as_ref().unwrap(), "bar");
    }

    #[test]
    #[serial]
    fn test_interpolation_missing_variable_strict_fails() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[s]\nk = $FOO_SECRET_UNSET\n");

        std::env::remove_var("FOO_SECRET_UNSET");
        let err = SecretsResolver::new().read_secrets(&uri, true).unwrap_err();
        match err {
            SecretsError::MissingEnvironmentVariable { key, variable, section, .. } => {
                assert_eq!(key, "k");
                assert_eq!(variable, "FOO_SECRET_UNSET");
                assert_eq!(section, "s");
            }
            other => panic!("expected MissingEnvironmentVariable, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_interpolation_missing_variable_non_strict_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[s]\nk = $FOO_SECRET_UNSET\n");

        std::env::remove_var("FOO_SECRET_UNSET");
        let secrets = SecretsResolver::new().read_secrets(&uri, false).unwrap();

        // The entry is present, mapped to None, not omitted.
        assert_eq!(secrets.len(), 1);
        assert!(secrets["s.k"].is_none());
    }

    #[test]
    #[serial]
    fn test_empty_environment_variable_counts_as_present() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[s]\nk = $FOO_SECRET_EMPTY\n");

        std::env::set_var("FOO_SECRET_EMPTY", "");
        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        std::env::remove_var("FOO_SECRET_EMPTY");

        assert_eq!(secrets["s.k"].as_ref().unwrap(), "");
    }

    #[test]
    fn test_multiple_sections_preserve_all_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(
            &dir,
            "secrets.ini",
            "[a]\nk1 = 1\nk2 = 2\n[b]\nk1 = 3\nk2 = 4\n",
        );

        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        let keys: Vec<&String> = secrets.keys().collect();
        assert_eq!(keys, ["a.k1", "a.k2", "b.k1", "b.k2"]);
    }

    #[test]
    fn test_duplicate_key_is_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "[s]\nk = first\nk = second\n");

        let secrets = SecretsResolver::new().read_secrets(&uri, true).unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets["s.k"].as_ref().unwrap(), "second");
    }

    #[test]
    fn test_keys_without_section_header_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let uri = write_secrets_file(&dir, "secrets.ini", "k = v\n[s]\nother = 1\n");

        let err = SecretsResolver::new().read_secrets(&uri, true).unwrap_err();
        assert!(matches!(err, SecretsError::MalformedSecretsFile { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.ini");
        std::fs::write(&path, [0x5b, 0x73, 0x5d, 0x0a, 0xff, 0xfe]).unwrap();

        let uri = format!("file://{}", path.display());
        let err = SecretsResolver::new().read_secrets(&uri, true).unwrap_err();
        assert!(matches!(err, SecretsError::Decode { .. }));
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = SecretsResolver::new()
            .resolve_source("file:///definitely/not/here/secrets.ini")
            .unwrap_err();
        assert!(matches!(err, SecretsError::SourceNotFound { .. }));
    }

    #[test]
    fn test_resolver_uses_custom_locator_for_resource_uris() {
        let dir = tempfile::tempdir().unwrap();
        let pkg_dir = dir.path().join("mypkg/conf");
        std::fs::create_dir_all(&pkg_dir).unwrap();
        std::fs::write(pkg_dir.join("test-settings.ini"), "[auth]\nsecret = s3cr3t\n").unwrap();

        let locator = FsResourceLocator::new(vec![dir.path().to_path_buf()]);
        let resolver = SecretsResolver::with_locator(Box::new(locator));

        let secrets =
            resolver.read_secrets("resource://mypkg/conf/test-settings.ini", true).unwrap();
        assert_eq!(secrets["auth.secret"].as_ref().unwrap(), "s3cr3t");
    }
}
