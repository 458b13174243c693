// saml-relay-server/src/server.rs
// ============================================================================
// Module: Relay HTTP Server
// Description: axum server mounting one handler per configured relay.
// Purpose: Materialize requests, invoke the pure transcoder, render responses.
// Dependencies: axum, saml-relay-config, saml-relay-core, tokio
// ============================================================================

//! ## Overview
//! The server mounts each configured relay instance at its path and routes
//! every method there: the handler itself rejects methods outside GET/POST
//! with 405 before the body is touched. POST bodies are materialized fully
//! before transcoding begins; there is no partial processing, no retry, and
//! no state shared between requests. Security posture: request inputs are
//! untrusted; destinations come from config alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::any;
use bytes::Bytes;
use saml_relay_config::RelayConfig;
use saml_relay_core::Destination;
use saml_relay_core::InboundBinding;
use saml_relay_core::MessageRole;
use saml_relay_core::RelayError;
use saml_relay_core::RelayRequest;
use saml_relay_core::RequestMethod;
use saml_relay_core::ResponseDescriptor;
use saml_relay_core::select_action;
use saml_relay_core::transcode;

use crate::audit::RelayAuditEvent;
use crate::audit::RelayAuditEventParams;
use crate::audit::RelayAuditSink;
use crate::audit::StderrAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed body for 405 responses.
const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";
/// Fixed body for 500 responses; the cause is never exposed to the caller.
const INTERNAL_ERROR_BODY: &str = "Internal relay error";
/// Fixed body for 413 responses.
const BODY_TOO_LARGE_BODY: &str = "Request body too large";
/// `Content-Type` for plain-text error bodies.
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// ============================================================================
// SECTION: Relay Server
// ============================================================================

/// Relay server instance.
pub struct RelayServer {
    /// Validated deployment configuration.
    config: RelayConfig,
    /// Audit sink shared by all mounted relays.
    audit: Arc<dyn RelayAuditSink>,
}

impl RelayServer {
    /// Builds a new relay server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the configuration is invalid.
    pub fn from_config(config: RelayConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        Ok(Self {
            config,
            audit: Arc::new(StderrAuditSink),
        })
    }

    /// Replaces the audit sink; used by tests and embedding hosts.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn RelayAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let app = build_router(&self.config, self.audit)
            .map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Bind("listener bind failed".to_string()))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Per-relay handler state.
struct RelayMount {
    /// Mount path, used for audit output only.
    path: String,
    /// Immutable destination and output policy.
    destination: Destination,
    /// Primary protocol field for the fixed missing-parameter message.
    expects: MessageRole,
    /// Maximum accepted request body size.
    max_body_bytes: usize,
    /// Audit sink.
    audit: Arc<dyn RelayAuditSink>,
}

/// Builds the router mounting every configured relay instance.
///
/// # Errors
///
/// Returns [`ServerError`] when a configured destination fails to resolve.
pub fn build_router(
    config: &RelayConfig,
    audit: Arc<dyn RelayAuditSink>,
) -> Result<Router, ServerError> {
    let instances =
        config.instances().map_err(|err| ServerError::Config(err.to_string()))?;
    let mut app = Router::new();
    for instance in instances {
        let mount = Arc::new(RelayMount {
            path: instance.path.clone(),
            destination: instance.destination,
            expects: instance.expects,
            max_body_bytes: config.max_body_bytes,
            audit: audit.clone(),
        });
        app = app.route(&instance.path, any(handle_relay).with_state(mount));
    }
    Ok(app)
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

/// Handles one relay request end to end.
async fn handle_relay(
    State(mount): State<Arc<RelayMount>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let method = request.method().clone();
    let classified = classify_method(&method);
    let binding = declared_binding(classified);
    let query = request.uri().query().unwrap_or_default().to_string();

    // Unsupported methods fail here, before the body is ever read.
    let Some(binding) = binding else {
        let response = plain_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY);
        record(
            &mount,
            &method,
            peer,
            None,
            None,
            Some("unsupported_method"),
            &response,
            0,
            0,
        );
        return response;
    };

    let (request_bytes, body) = match binding {
        InboundBinding::Redirect => (query.len(), None),
        InboundBinding::Post => {
            if declared_length_exceeds(request.headers(), mount.max_body_bytes) {
                let response =
                    plain_response(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE_BODY);
                record(
                    &mount,
                    &method,
                    peer,
                    Some(binding),
                    None,
                    Some("body_too_large"),
                    &response,
                    0,
                    0,
                );
                return response;
            }
            match materialize_body(request, mount.max_body_bytes).await {
                Ok(bytes) => (bytes.len(), Some(bytes)),
                Err(()) => {
                    let response =
                        plain_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY);
                    record(
                        &mount,
                        &method,
                        peer,
                        Some(binding),
                        None,
                        Some("body_read_failed"),
                        &response,
                        0,
                        0,
                    );
                    return response;
                }
            }
        }
    };

    let relay_request = RelayRequest {
        method: classified,
        query: &query,
        form_body: body.as_deref(),
    };
    match transcode(&relay_request, &mount.destination, mount.expects) {
        Ok(descriptor) => {
            let action = select_action(binding, mount.destination.policy());
            let response_bytes = descriptor
                .location
                .as_ref()
                .map_or(descriptor.body.len(), String::len);
            let response = descriptor_response(descriptor);
            record(
                &mount,
                &method,
                peer,
                Some(binding),
                Some(action.label()),
                None,
                &response,
                request_bytes,
                response_bytes,
            );
            response
        }
        Err(error) => {
            let response = error_response(&error);
            record(
                &mount,
                &method,
                peer,
                Some(binding),
                None,
                Some(error.kind()),
                &response,
                request_bytes,
                0,
            );
            response
        }
    }
}

/// Classifies the HTTP method for the transcoder.
fn classify_method(method: &Method) -> RequestMethod {
    match *method {
        Method::GET => RequestMethod::Get,
        Method::POST => RequestMethod::Post,
        _ => RequestMethod::Other,
    }
}

/// Returns the inbound binding a method declares, when it declares one.
const fn declared_binding(method: RequestMethod) -> Option<InboundBinding> {
    match method {
        RequestMethod::Get => Some(InboundBinding::Redirect),
        RequestMethod::Post => Some(InboundBinding::Post),
        RequestMethod::Other => None,
    }
}

/// Returns whether a declared `Content-Length` exceeds the body limit.
fn declared_length_exceeds(headers: &HeaderMap, max_body_bytes: usize) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .is_some_and(|length| length > max_body_bytes as u64)
}

/// Reads the full request body up to the limit.
async fn materialize_body(request: Request, max_body_bytes: usize) -> Result<Bytes, ()> {
    axum::body::to_bytes(request.into_body(), max_body_bytes).await.map_err(|_| ())
}

// ============================================================================
// SECTION: Response Mapping
// ============================================================================

/// Maps a transport-neutral descriptor onto an axum response.
fn descriptor_response(descriptor: ResponseDescriptor) -> Response {
    let status = StatusCode::from_u16(descriptor.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if let Some(location) = &descriptor.location {
        builder = builder.header(header::LOCATION, location);
    }
    if let Some(content_type) = descriptor.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(descriptor.body))
        .unwrap_or_else(|_| plain_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY))
}

/// Maps a transcoding failure onto its fixed client-visible response.
fn error_response(error: &RelayError) -> Response {
    match error {
        RelayError::MissingPayload {
            ..
        } => plain_response(StatusCode::BAD_REQUEST, &error.to_string()),
        RelayError::UnsupportedMethod => {
            plain_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY)
        }
        RelayError::MissingBody => {
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
        }
    }
}

/// Builds a plain-text response with a fixed body.
fn plain_response(status: StatusCode, body: &str) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.to_string()).into_response()
}

/// Records one audit event for a completed request.
#[allow(clippy::too_many_arguments, reason = "One flat call per handler exit path.")]
fn record(
    mount: &RelayMount,
    method: &Method,
    peer: SocketAddr,
    binding: Option<InboundBinding>,
    action: Option<&'static str>,
    error_kind: Option<&'static str>,
    response: &Response,
    request_bytes: usize,
    response_bytes: usize,
) {
    mount.audit.record(&RelayAuditEvent::new(RelayAuditEventParams {
        relay_path: mount.path.clone(),
        method: method.as_str().to_string(),
        inbound_binding: binding.map(InboundBinding::label),
        action,
        error_kind,
        status: response.status().as_u16(),
        request_bytes,
        response_bytes,
        peer_ip: Some(peer.ip().to_string()),
    }));
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Relay server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Listener bind errors.
    #[error("bind error: {0}")]
    Bind(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
