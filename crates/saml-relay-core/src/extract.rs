// saml-relay-core/src/extract.rs
// ============================================================================
// Module: Parameter Extractor
// Description: Pulls the SAML message and RelayState from query or form data.
// Purpose: Build one BindingMessage per request without double-decoding.
// Dependencies: url
// ============================================================================

//! ## Overview
//! GET requests carry the message in the URL query string; POST requests in
//! a form-encoded body. Both are parsed with [`form_urlencoded`], which
//! percent-decodes each value exactly once. The extractor never decodes a
//! value a second time and never inspects payload contents.
//!
//! [`form_urlencoded`]: url::form_urlencoded

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use url::form_urlencoded;

use crate::error::RelayError;
use crate::message::BindingMessage;
use crate::message::InboundBinding;
use crate::message::MessageRole;

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts a [`BindingMessage`] from a raw URL query string.
///
/// # Errors
///
/// Returns [`RelayError::MissingPayload`] when neither protocol field is
/// present; the error names `expects`' parameter.
pub fn extract_from_query(
    query: &str,
    expects: MessageRole,
) -> Result<BindingMessage, RelayError> {
    collect(form_urlencoded::parse(query.as_bytes()), InboundBinding::Redirect, expects)
}

/// Extracts a [`BindingMessage`] from a fully materialized form-encoded body.
///
/// # Errors
///
/// Returns [`RelayError::MissingPayload`] when neither protocol field is
/// present; the error names `expects`' parameter.
pub fn extract_from_form(
    body: &[u8],
    expects: MessageRole,
) -> Result<BindingMessage, RelayError> {
    collect(form_urlencoded::parse(body), InboundBinding::Post, expects)
}

/// Collects the protocol fields from decoded key/value pairs.
///
/// Probes `SAMLRequest` before `SAMLResponse`, matching the original relay
/// handlers. Empty-string values count as absent. Only the first occurrence
/// of each field is honored.
fn collect<'a>(
    pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    inbound_binding: InboundBinding,
    expects: MessageRole,
) -> Result<BindingMessage, RelayError> {
    let mut saml_request: Option<String> = None;
    let mut saml_response: Option<String> = None;
    let mut relay_state: Option<String> = None;
    for (name, value) in pairs {
        match name.as_ref() {
            "SAMLRequest" if saml_request.is_none() => {
                saml_request = Some(value.into_owned());
            }
            "SAMLResponse" if saml_response.is_none() => {
                saml_response = Some(value.into_owned());
            }
            "RelayState" if relay_state.is_none() => {
                relay_state = Some(value.into_owned());
            }
            _ => {}
        }
    }
    let (role, payload) = match (non_empty(saml_request), non_empty(saml_response)) {
        (Some(payload), _) => (MessageRole::Request, payload),
        (None, Some(payload)) => (MessageRole::Response, payload),
        (None, None) => {
            return Err(RelayError::MissingPayload {
                param: expects.param_name(),
            });
        }
    };
    Ok(BindingMessage {
        payload,
        relay_state,
        inbound_binding,
        role,
    })
}

/// Treats empty-string parameter values as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.is_empty())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only extraction fixtures.")]

    use super::extract_from_form;
    use super::extract_from_query;
    use crate::error::RelayError;
    use crate::message::InboundBinding;
    use crate::message::MessageRole;

    #[test]
    fn reads_request_from_query_string() {
        let message =
            extract_from_query("SAMLRequest=req1&RelayState=rs1", MessageRole::Request).unwrap();
        assert_eq!(message.payload, "req1");
        assert_eq!(message.relay_state.as_deref(), Some("rs1"));
        assert_eq!(message.inbound_binding, InboundBinding::Redirect);
        assert_eq!(message.role, MessageRole::Request);
    }

    #[test]
    fn reads_response_from_form_body() {
        let message =
            extract_from_form(b"SAMLResponse=abc123&RelayState=xyz", MessageRole::Response)
                .unwrap();
        assert_eq!(message.payload, "abc123");
        assert_eq!(message.relay_state.as_deref(), Some("xyz"));
        assert_eq!(message.inbound_binding, InboundBinding::Post);
        assert_eq!(message.role, MessageRole::Response);
    }

    #[test]
    fn percent_decodes_exactly_once() {
        // %2B decodes to a literal plus; a second decode would corrupt it.
        let message =
            extract_from_query("SAMLRequest=a%2Bb%3D&RelayState=r%26s", MessageRole::Request)
                .unwrap();
        assert_eq!(message.payload, "a+b=");
        assert_eq!(message.relay_state.as_deref(), Some("r&s"));
    }

    #[test]
    fn missing_both_fields_names_expected_parameter() {
        let err = extract_from_form(b"RelayState=xyz", MessageRole::Response).unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingPayload {
                param: "SAMLResponse",
            }
        );
    }

    #[test]
    fn empty_payload_value_counts_as_missing() {
        let err = extract_from_query("SAMLResponse=&RelayState=rs", MessageRole::Response)
            .unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingPayload {
                param: "SAMLResponse",
            }
        );
    }

    #[test]
    fn saml_request_wins_when_both_fields_present() {
        let message =
            extract_from_query("SAMLResponse=resp&SAMLRequest=req", MessageRole::Request).unwrap();
        assert_eq!(message.role, MessageRole::Request);
        assert_eq!(message.payload, "req");
    }

    #[test]
    fn missing_relay_state_stays_absent() {
        let message = extract_from_query("SAMLRequest=req1", MessageRole::Request).unwrap();
        assert!(message.relay_state.is_none());
    }
}
