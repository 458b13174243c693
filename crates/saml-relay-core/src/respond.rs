// saml-relay-core/src/respond.rs
// ============================================================================
// Module: Response Builder
// Description: Renders redirect and form-post responses for a relayed message.
// Purpose: Assemble the outbound status, headers, and body per output action.
// Dependencies: urlencoding
// ============================================================================

//! ## Overview
//! Two renderings exist: a 302 redirect carrying the message in the
//! destination's query string, and a 200 HTML document with a single
//! self-submitting form. Both are deterministic byte-for-byte for a given
//! message and destination. Every interpolated value is encoded for its
//! context exactly once: percent-encoding on the redirect path, attribute
//! escaping on the form path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::destination::Destination;
use crate::escape::attribute_escape;
use crate::message::BindingMessage;
use crate::message::ResponseDescriptor;
use crate::transcode::OutputAction;

// ============================================================================
// SECTION: Response Building
// ============================================================================

/// Builds the outbound response for the selected action.
#[must_use]
pub fn build_response(
    action: OutputAction,
    message: &BindingMessage,
    destination: &Destination,
) -> ResponseDescriptor {
    match action {
        OutputAction::Redirect302 => ResponseDescriptor {
            status: 302,
            content_type: None,
            location: Some(redirect_location(message, destination)),
            body: String::new(),
        },
        OutputAction::FormPost => ResponseDescriptor {
            status: 200,
            content_type: Some("text/html"),
            location: None,
            body: form_document(message, destination),
        },
    }
}

/// Renders the `Location` value for a redirect response.
///
/// The `RelayState` parameter is always appended, empty when absent on
/// input; the redirect codepath of the original relays never omits it. A
/// destination that already carries a query string is joined with `&`.
fn redirect_location(message: &BindingMessage, destination: &Destination) -> String {
    let separator = if destination.has_query() { '&' } else { '?' };
    let relay_state = message.relay_state.as_deref().unwrap_or_default();
    format!(
        "{}{}{}={}&RelayState={}",
        destination.url(),
        separator,
        message.role.param_name(),
        urlencoding::encode(&message.payload),
        urlencoding::encode(relay_state),
    )
}

/// Renders the auto-submitting form document for a form-post response.
///
/// The document contains exactly one form and no executable script beyond
/// the `onload` submit; a `noscript` button covers script-disabled agents.
/// The `RelayState` input is emitted only when the token is present.
fn form_document(message: &BindingMessage, destination: &Destination) -> String {
    let relay_state_input = message
        .relay_state
        .as_deref()
        .map(|state| {
            format!(
                "        <input type=\"hidden\" name=\"RelayState\" value=\"{}\">\n",
                attribute_escape(state)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Redirecting...</title>
</head>
<body onload="document.forms[0].submit()">
    <form method="POST" action="{action}">
        <input type="hidden" name="{param}" value="{payload}">
{relay_state}        <noscript>
            <input type="submit" value="Continue">
        </noscript>
    </form>
    <p>Redirecting...</p>
</body>
</html>
"#,
        action = attribute_escape(destination.url()),
        param = message.role.param_name(),
        payload = attribute_escape(&message.payload),
        relay_state = relay_state_input,
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
