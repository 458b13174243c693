// saml-relay-config/src/config.rs
// ============================================================================
// Module: SAML Relay Configuration
// Description: Configuration loading and validation for relay deployments.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: saml-relay-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed; a relay never starts with a
//! destination it could not validate. Config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use saml_relay_core::Destination;
use saml_relay_core::MessageRole;
use saml_relay_core::OutputPolicy;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "saml-relay.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "SAML_RELAY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total config path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of relay entries per deployment.
pub(crate) const MAX_RELAY_ENTRIES: usize = 64;
/// Maximum length of a relay mount path.
pub(crate) const MAX_RELAY_PATH_LENGTH: usize = 256;
/// Default maximum request body size in bytes (1 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Upper bound for the configurable request body size (16 MiB).
const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// SAML relay deployment configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Server bind configuration.
    pub server: ServerConfig,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Configured relay instances, one per IdP/SP pair.
    #[serde(default)]
    pub relay: Vec<RelayEntry>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind: String,
}

/// One configured relay instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayEntry {
    /// Mount path for this relay, e.g. `/relay/acme-idp`.
    pub path: String,
    /// Absolute downstream URL the message is re-emitted to.
    pub destination: String,
    /// Outbound binding policy.
    pub policy: OutputPolicy,
    /// Protocol field this relay primarily carries; drives the fixed
    /// missing-parameter message.
    pub expects: MessageRole,
}

/// A validated relay instance ready for mounting.
#[derive(Debug, Clone)]
pub struct RelayInstance {
    /// Mount path for this relay.
    pub path: String,
    /// Immutable destination and output policy.
    pub destination: Destination,
    /// Primary protocol field for this relay.
    pub expects: MessageRole,
}

/// Default for [`RelayConfig::max_body_bytes`].
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl RelayConfig {
    /// Loads configuration from `path`, the `SAML_RELAY_CONFIG` environment
    /// variable, or `saml-relay.toml`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must be between 1 and {MAX_MAX_BODY_BYTES}"
            )));
        }
        if self.relay.is_empty() {
            return Err(ConfigError::Invalid("at least one [[relay]] entry required".to_string()));
        }
        if self.relay.len() > MAX_RELAY_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "too many relay entries (max {MAX_RELAY_ENTRIES})"
            )));
        }
        for entry in &self.relay {
            entry.validate()?;
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.relay.len());
        for entry in &self.relay {
            if seen.contains(&entry.path.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate relay path: {}",
                    entry.path
                )));
            }
            seen.push(entry.path.as_str());
        }
        Ok(())
    }

    /// Resolves the configured entries into immutable relay instances.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a destination URL is invalid.
    pub fn instances(&self) -> Result<Vec<RelayInstance>, ConfigError> {
        self.relay
            .iter()
            .map(|entry| {
                let destination = Destination::new(&entry.destination, entry.policy)
                    .map_err(|err| {
                        ConfigError::Invalid(format!(
                            "relay {}: {err}",
                            entry.path
                        ))
                    })?;
                Ok(RelayInstance {
                    path: entry.path.clone(),
                    destination,
                    expects: entry.expects,
                })
            })
            .collect()
    }

    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address does not parse; `load`
    /// has already rejected that case.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }
}

impl ServerConfig {
    /// Validates the server section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }
}

impl RelayEntry {
    /// Validates one relay entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "relay path must start with '/': {}",
                self.path
            )));
        }
        if self.path.len() > MAX_RELAY_PATH_LENGTH {
            return Err(ConfigError::Invalid("relay path too long".to_string()));
        }
        // Destination parsing is the authoritative check; done here so an
        // invalid URL is reported at load time, not at first request.
        Destination::new(&self.destination, self.policy).map_err(|err| {
            ConfigError::Invalid(format!("relay {}: {err}", self.path))
        })?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the effective config path from argument, env var, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
