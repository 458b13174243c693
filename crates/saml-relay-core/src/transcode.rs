// saml-relay-core/src/transcode.rs
// ============================================================================
// Module: Binding Transcoder
// Description: Maps an inbound binding and output policy to an output action.
// Purpose: Decide redirect versus form post and drive the full transcoding
//          pipeline as one pure function.
// Dependencies: saml-relay-core internals
// ============================================================================

//! ## Overview
//! The transcoder has exactly two output states. Under
//! [`OutputPolicy::PreserveBinding`] the action mirrors the inbound binding;
//! under [`OutputPolicy::ForcePost`] every message leaves as a form post,
//! since SAML response payloads routinely exceed practical URL length limits
//! and the receiving binding mandates POST. [`transcode`] runs extraction,
//! action selection, and rendering with no retries and no side effects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::destination::Destination;
use crate::destination::OutputPolicy;
use crate::error::RelayError;
use crate::extract::extract_from_form;
use crate::extract::extract_from_query;
use crate::message::InboundBinding;
use crate::message::MessageRole;
use crate::message::RelayRequest;
use crate::message::RequestMethod;
use crate::message::ResponseDescriptor;
use crate::respond::build_response;

// ============================================================================
// SECTION: Output Action
// ============================================================================

/// The two possible outbound renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    /// 302 redirect with the message in the destination query string.
    Redirect302,
    /// 200 HTML document with one auto-submitting form.
    FormPost,
}

impl OutputAction {
    /// Returns a stable label for audit output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Redirect302 => "redirect_302",
            Self::FormPost => "form_post",
        }
    }
}

// ============================================================================
// SECTION: Transcoding
// ============================================================================

/// Selects the output action for an inbound binding under a policy.
#[must_use]
pub const fn select_action(inbound: InboundBinding, policy: OutputPolicy) -> OutputAction {
    match policy {
        OutputPolicy::PreserveBinding => match inbound {
            InboundBinding::Redirect => OutputAction::Redirect302,
            InboundBinding::Post => OutputAction::FormPost,
        },
        OutputPolicy::ForcePost => OutputAction::FormPost,
    }
}

/// Transcodes one inbound request into an outbound response descriptor.
///
/// The method is validated before the body is consulted, so unsupported
/// methods fail without the body ever being read.
///
/// # Errors
///
/// Returns [`RelayError::UnsupportedMethod`] for methods outside GET/POST,
/// [`RelayError::MissingPayload`] when neither protocol field is present,
/// and [`RelayError::MissingBody`] when a POST descriptor carries no body.
pub fn transcode(
    request: &RelayRequest<'_>,
    destination: &Destination,
    expects: MessageRole,
) -> Result<ResponseDescriptor, RelayError> {
    let message = match request.method {
        RequestMethod::Get => extract_from_query(request.query, expects)?,
        RequestMethod::Post => {
            let body = request.form_body.ok_or(RelayError::MissingBody)?;
            extract_from_form(body, expects)?
        }
        RequestMethod::Other => return Err(RelayError::UnsupportedMethod),
    };
    let action = select_action(message.inbound_binding, destination.policy());
    Ok(build_response(action, &message, destination))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
