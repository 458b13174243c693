// crates/saml-relay-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (size, encoding, content).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

//! Config load validation tests for saml-relay-config.

use std::io::Write;

use saml_relay_config::ConfigError;
use saml_relay_config::RelayConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<RelayConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_accepts_valid_file() -> TestResult {
    let file = write_config(
        br#"
[server]
bind = "127.0.0.1:8087"

[[relay]]
path = "/relay/acme"
destination = "https://idp.example.com/samlp/abc"
policy = "preserve_binding"
expects = "request"
"#,
    )?;
    let config = RelayConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let instances = config.instances().map_err(|err| err.to_string())?;
    if instances.len() == 1 && instances[0].path == "/relay/acme" {
        Ok(())
    } else {
        Err("unexpected relay instances".to_string())
    }
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let missing = std::path::Path::new("/nonexistent/saml-relay.toml");
    match RelayConfig::load(Some(missing)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected io error, got valid config".to_string()),
    }
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(RelayConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(RelayConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[server\nbind =")?;
    match RelayConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected parse error, got valid config".to_string()),
    }
}

#[test]
fn load_rejects_invalid_bind_address() -> TestResult {
    let file = write_config(
        br#"
[server]
bind = "not-an-address"

[[relay]]
path = "/relay/acme"
destination = "https://idp.example.com/samlp/abc"
policy = "preserve_binding"
expects = "request"
"#,
    )?;
    assert_invalid(RelayConfig::load(Some(file.path())), "invalid bind address")
}

#[test]
fn load_rejects_destination_with_fragment() -> TestResult {
    let file = write_config(
        br#"
[server]
bind = "127.0.0.1:8087"

[[relay]]
path = "/relay/acme"
destination = "https://idp.example.com/sso#fragment"
policy = "preserve_binding"
expects = "request"
"#,
    )?;
    assert_invalid(RelayConfig::load(Some(file.path())), "fragment")
}
