// saml-relay-core/src/lib.rs
// ============================================================================
// Module: SAML Relay Core Library
// Description: Pure SAML binding transcoding between Redirect and POST.
// Purpose: Expose transport-neutral message, transcoding, and rendering types.
// Dependencies: serde, thiserror, url, urlencoding
// ============================================================================

//! ## Overview
//! `saml-relay-core` relocates an opaque SAML protocol message between HTTP
//! bindings without parsing it. Given a transport-neutral request descriptor
//! and an immutable destination, [`transcode`] produces a transport-neutral
//! response descriptor that is either a 302 redirect or a self-submitting
//! HTML form. The crate performs no I/O and holds no state across calls.
//!
//! Security posture: request inputs are untrusted. Payload and `RelayState`
//! values are treated as opaque strings, decoded exactly once on extraction
//! and encoded exactly once on render. The destination is never derived from
//! request data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod destination;
pub mod error;
pub mod escape;
pub mod extract;
pub mod message;
pub mod respond;
pub mod transcode;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use destination::Destination;
pub use destination::DestinationError;
pub use destination::OutputPolicy;
pub use error::RelayError;
pub use escape::attribute_escape;
pub use extract::extract_from_form;
pub use extract::extract_from_query;
pub use message::BindingMessage;
pub use message::InboundBinding;
pub use message::MessageRole;
pub use message::RelayRequest;
pub use message::RequestMethod;
pub use message::ResponseDescriptor;
pub use respond::build_response;
pub use transcode::OutputAction;
pub use transcode::select_action;
pub use transcode::transcode;
