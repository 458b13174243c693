// saml-relay-core/src/destination.rs
// ============================================================================
// Module: Relay Destination
// Description: Immutable downstream endpoint and output policy.
// Purpose: Fix the relay target at construction so request data cannot
//          influence it.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! A [`Destination`] names the one absolute URL a relay instance forwards to
//! and the policy that selects the outbound binding. It is constructed once
//! from deployment configuration and is immutable for the process lifetime.
//! Accepting a destination from request data would be an open redirect; no
//! constructor here takes request input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Output Policy
// ============================================================================

/// Policy selecting the outbound binding for a relay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Mirror the inbound binding toward the destination. Used when relaying
    /// authentication requests, which fit in a URL.
    PreserveBinding,
    /// Always emit a form POST. Used when relaying responses, whose signed
    /// assertions routinely exceed practical URL length limits and whose
    /// receiving binding mandates POST.
    ForcePost,
}

impl OutputPolicy {
    /// Returns a stable label for audit output and CLI summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreserveBinding => "preserve_binding",
            Self::ForcePost => "force_post",
        }
    }
}

// ============================================================================
// SECTION: Destination
// ============================================================================

/// The statically configured downstream endpoint of one relay instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Absolute http(s) URL the relayed message is sent to.
    url: Url,
    /// Outbound binding policy.
    policy: OutputPolicy,
}

impl Destination {
    /// Builds a destination from a configured URL string.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError`] when the URL is not absolute http(s) or
    /// carries a fragment.
    pub fn new(url: &str, policy: OutputPolicy) -> Result<Self, DestinationError> {
        let parsed = Url::parse(url).map_err(|err| DestinationError::Parse(err.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(DestinationError::Scheme(parsed.scheme().to_string()));
        }
        if parsed.host_str().is_none() {
            return Err(DestinationError::MissingHost);
        }
        if parsed.fragment().is_some() {
            return Err(DestinationError::Fragment);
        }
        Ok(Self {
            url: parsed,
            policy,
        })
    }

    /// Returns the destination URL as configured.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the destination host for operator summaries.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Returns whether the configured URL already carries a query string.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.url.query().is_some()
    }

    /// Returns the outbound binding policy.
    #[must_use]
    pub const fn policy(&self) -> OutputPolicy {
        self.policy
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Destination construction failures.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// The configured value is not a parseable absolute URL.
    #[error("destination url is not absolute: {0}")]
    Parse(String),
    /// The URL scheme is not http or https.
    #[error("destination scheme must be http or https, got {0}")]
    Scheme(String),
    /// The URL has no host component.
    #[error("destination url has no host")]
    MissingHost,
    /// Fragments would be dropped by user agents mid-relay.
    #[error("destination url must not carry a fragment")]
    Fragment,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only destination fixtures.")]

    use super::Destination;
    use super::DestinationError;
    use super::OutputPolicy;

    #[test]
    fn accepts_https_destination() {
        let dest =
            Destination::new("https://idp.example.com/samlp/abc", OutputPolicy::PreserveBinding)
                .unwrap();
        assert_eq!(dest.url(), "https://idp.example.com/samlp/abc");
        assert_eq!(dest.host(), "idp.example.com");
        assert!(!dest.has_query());
    }

    #[test]
    fn detects_existing_query_string() {
        let dest = Destination::new(
            "https://sp.example.com/login/callback?connection=acme",
            OutputPolicy::ForcePost,
        )
        .unwrap();
        assert!(dest.has_query());
    }

    #[test]
    fn rejects_relative_url() {
        let err = Destination::new("/login/callback", OutputPolicy::ForcePost).unwrap_err();
        assert!(matches!(err, DestinationError::Parse(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err =
            Destination::new("ftp://idp.example.com/sso", OutputPolicy::PreserveBinding)
                .unwrap_err();
        assert!(matches!(err, DestinationError::Scheme(_)));
    }

    #[test]
    fn rejects_fragment() {
        let err =
            Destination::new("https://idp.example.com/sso#frag", OutputPolicy::PreserveBinding)
                .unwrap_err();
        assert!(matches!(err, DestinationError::Fragment));
    }
}
