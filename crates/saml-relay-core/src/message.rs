// saml-relay-core/src/message.rs
// ============================================================================
// Module: Binding Message Types
// Description: Transport-neutral request, message, and response descriptors.
// Purpose: Model one relayed SAML message independent of the HTTP runtime.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`BindingMessage`] is the unit of work per request: an opaque SAML
//! payload, an optional `RelayState` correlation token, the binding it
//! arrived on, and the protocol role its field name implies. It is built
//! from one inbound request and discarded once the outbound response is
//! rendered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Protocol Roles
// ============================================================================

/// Which SAML protocol field carried the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// `SAMLRequest` (an AuthnRequest headed toward an IdP).
    Request,
    /// `SAMLResponse` (an assertion-bearing response headed toward an SP).
    Response,
}

impl MessageRole {
    /// Returns the query/form parameter name for this role.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}

// ============================================================================
// SECTION: Bindings
// ============================================================================

/// The HTTP binding a message arrived on, derived from the request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundBinding {
    /// HTTP-Redirect binding: message in the URL query string (GET).
    Redirect,
    /// HTTP-POST binding: message in a form-encoded body (POST).
    Post,
}

impl InboundBinding {
    /// Returns a stable label for audit output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Redirect => "redirect",
            Self::Post => "post",
        }
    }
}

// ============================================================================
// SECTION: Binding Message
// ============================================================================

/// One SAML message in transit between bindings.
///
/// `payload` and `relay_state` are opaque: already percent-decoded exactly
/// once by query/form parsing, never re-interpreted, re-encoded exactly once
/// when the outbound response is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingMessage {
    /// The encoded SAML protocol blob, never parsed or mutated.
    pub payload: String,
    /// Correlation token passed through byte-for-byte when present.
    pub relay_state: Option<String>,
    /// Binding the message arrived on.
    pub inbound_binding: InboundBinding,
    /// Protocol field name the message arrived under.
    pub role: MessageRole,
}

// ============================================================================
// SECTION: Request Descriptor
// ============================================================================

/// HTTP method classification for the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// GET, carrying the message in the query string.
    Get,
    /// POST, carrying the message in a form-encoded body.
    Post,
    /// Any other method; has no declared input-binding meaning.
    Other,
}

/// Transport-neutral view of one inbound HTTP request.
///
/// The hosting adapter materializes the body before constructing this; the
/// transcoder never performs partial reads.
#[derive(Debug, Clone, Copy)]
pub struct RelayRequest<'a> {
    /// Classified request method.
    pub method: RequestMethod,
    /// Raw (still percent-encoded) query string, empty when absent.
    pub query: &'a str,
    /// Fully materialized form-encoded body for POST requests.
    pub form_body: Option<&'a [u8]>,
}

// ============================================================================
// SECTION: Response Descriptor
// ============================================================================

/// Transport-neutral outbound response.
///
/// The hosting adapter maps this onto its runtime's response type without
/// further transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value when a body is present.
    pub content_type: Option<&'static str>,
    /// `Location` header value for redirect responses.
    pub location: Option<String>,
    /// Response body, empty for redirects.
    pub body: String,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
