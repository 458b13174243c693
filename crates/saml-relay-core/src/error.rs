// saml-relay-core/src/error.rs
// ============================================================================
// Module: Relay Errors
// Description: Transcoding failure taxonomy.
// Purpose: Name each way a relay request can fail before rendering begins.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Validation happens before any rendering; a failed request produces exactly
//! one of these errors and no partial response. Nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transcoding failures, one per request at most.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Neither `SAMLRequest` nor `SAMLResponse` was present. Carries the
    /// parameter name the deployment primarily relays, used verbatim in the
    /// client-visible message.
    #[error("{param} parameter is missing.")]
    MissingPayload {
        /// Parameter name for the fixed 400 message.
        param: &'static str,
    },
    /// Method outside GET/POST; no input binding is declared for it.
    #[error("Method not allowed")]
    UnsupportedMethod,
    /// The request descriptor claimed POST but carried no materialized body.
    #[error("form body missing from POST request")]
    MissingBody,
}

impl RelayError {
    /// Returns a stable kind label for audit output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingPayload {
                ..
            } => "missing_payload",
            Self::UnsupportedMethod => "unsupported_method",
            Self::MissingBody => "missing_body",
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::RelayError;

    #[test]
    fn missing_payload_message_names_parameter() {
        let err = RelayError::MissingPayload {
            param: "SAMLResponse",
        };
        assert_eq!(err.to_string(), "SAMLResponse parameter is missing.");
        assert_eq!(err.kind(), "missing_payload");
    }

    #[test]
    fn unsupported_method_message_is_fixed() {
        assert_eq!(RelayError::UnsupportedMethod.to_string(), "Method not allowed");
    }
}
