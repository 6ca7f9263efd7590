//! DataForSEO credential resolution.
//!
//! A credential is a `login:password` pair, which DataForSEO also hands out
//! Base64-encoded. Sources are tried in a fixed order and the first one that
//! yields a non-empty value wins:
//!
//! 1. an explicit value (the `--api-key` flag)
//! 2. the `DATAFORSEO_API_KEY` environment variable
//! 3. the `api_key` field of the config file
//! 4. an interactive prompt, when the caller supplies one
//!
//! Nothing here fails: unreadable config files are logged and skipped, and
//! anything that does not decode as Base64 credentials is used verbatim.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::config::API_KEY_ENV;

/// An API credential in plain `login:password` form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(login, password)` at the first `:`.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once(':')
    }

    /// First ten characters followed by `...`, or `***` for short values.
    pub fn masked(&self) -> String {
        mask_key(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"***").finish()
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    Environment,
    ConfigFile,
    Prompt,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Explicit => "command line",
            Self::Environment => "environment variable (DATAFORSEO_API_KEY)",
            Self::ConfigFile => "config file",
            Self::Prompt => "interactive prompt",
        };
        f.write_str(label)
    }
}

/// A credential together with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub credential: Credential,
    pub source: CredentialSource,
}

/// Asks the user for a secret. Returning `None` means cancelled or empty.
pub trait SecretPrompt {
    fn prompt_secret(&self) -> Option<String>;
}

/// On-disk shape of the credential config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Normalizes a raw credential string.
///
/// Returns `None` for blank input. If the trimmed input is valid Base64 that
/// decodes to UTF-8 containing `:`, the decoded text is returned; otherwise the
/// trimmed input itself.
pub fn decode_credential(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match decode_base64_pair(trimmed) {
        Some(decoded) => Some(decoded),
        None => Some(trimmed.to_string()),
    }
}

/// Decodes `raw` when it is Base64 for a `login:password` pair.
pub fn decode_base64_pair(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw.trim().as_bytes()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    decoded.contains(':').then_some(decoded)
}

/// First ten characters followed by `...`, or `***` for ten or fewer.
pub fn mask_key(key: &str) -> String {
    if key.chars().count() > 10 {
        let head: String = key.chars().take(10).collect();
        format!("{}...", head)
    } else {
        "***".to_string()
    }
}

/// Resolves a credential from the configured sources.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    config_file: PathBuf,
    env_value: Option<String>,
}

impl CredentialResolver {
    /// A resolver that reads only the given config file; the environment
    /// source is empty until [`with_env_value`](Self::with_env_value).
    pub fn new<P: AsRef<Path>>(config_file: P) -> Self {
        Self { config_file: config_file.as_ref().to_path_buf(), env_value: None }
    }

    /// A resolver that also reads `DATAFORSEO_API_KEY` from the process environment.
    pub fn from_env<P: AsRef<Path>>(config_file: P) -> Self {
        Self::new(config_file).with_env_value(std::env::var(API_KEY_ENV).ok())
    }

    /// Sets the value used for the environment source.
    pub fn with_env_value(mut self, value: Option<String>) -> Self {
        self.env_value = value;
        self
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Tries every source in priority order. `prompt` is consulted last and
    /// only when given.
    pub fn resolve(&self, explicit: Option<&str>, prompt: Option<&dyn SecretPrompt>) -> Option<ResolvedCredential> {
        let found = explicit
            .and_then(decode_credential)
            .map(|value| (value, CredentialSource::Explicit))
            .or_else(|| {
                self.env_value
                    .as_deref()
                    .and_then(decode_credential)
                    .map(|value| (value, CredentialSource::Environment))
            })
            .or_else(|| {
                self.config_file_key()
                    .as_deref()
                    .and_then(decode_credential)
                    .map(|value| (value, CredentialSource::ConfigFile))
            })
            .or_else(|| {
                prompt
                    .and_then(|p| p.prompt_secret())
                    .as_deref()
                    .and_then(decode_credential)
                    .map(|value| (value, CredentialSource::Prompt))
            });

        let (value, source) = found?;
        tracing::debug!(%source, "resolved API credential");
        Some(ResolvedCredential { credential: Credential::new(value), source })
    }

    fn config_file_key(&self) -> Option<String> {
        if !self.config_file.exists() {
            return None;
        }

        match read_credential_config(&self.config_file) {
            Ok(config) => config.api_key,
            Err(e) => {
                tracing::warn!(path = %self.config_file.display(), "could not read config file: {}", e);
                None
            }
        }
    }
}

/// Reads and parses a credential config file.
pub fn read_credential_config(path: &Path) -> Result<CredentialConfig> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes the credential config file, creating parent directories. On unix
/// the file is readable and writable by the owner only.
pub fn write_credential_config(path: &Path, api_key: &str, created_by: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let config = CredentialConfig { api_key: Some(api_key.to_string()), created_by: Some(created_by.to_string()) };
    let body = serde_json::to_string_pretty(&config)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(body.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
