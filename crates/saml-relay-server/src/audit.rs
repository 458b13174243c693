// saml-relay-server/src/audit.rs
// ============================================================================
// Module: Relay Audit Logging
// Description: Structured audit events for relay request handling.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit output is a side channel for operators and never alters the
//! response. Events carry sizes and labels only, never payload or
//! `RelayState` values; relayed messages are credentials-adjacent and must
//! not land in logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Relay audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RelayAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Relay mount path that handled the request.
    pub relay_path: String,
    /// HTTP method as received.
    pub method: String,
    /// Inbound binding label when the method declared one.
    pub inbound_binding: Option<&'static str>,
    /// Selected output action label on success.
    pub action: Option<&'static str>,
    /// Normalized error kind label on failure.
    pub error_kind: Option<&'static str>,
    /// Response status code.
    pub status: u16,
    /// Inbound message size in bytes (query string or form body).
    pub request_bytes: usize,
    /// Rendered relay output size in bytes; zero on failure.
    pub response_bytes: usize,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
}

/// Inputs required to construct an audit event.
pub struct RelayAuditEventParams {
    /// Relay mount path that handled the request.
    pub relay_path: String,
    /// HTTP method as received.
    pub method: String,
    /// Inbound binding label when the method declared one.
    pub inbound_binding: Option<&'static str>,
    /// Selected output action label on success.
    pub action: Option<&'static str>,
    /// Normalized error kind label on failure.
    pub error_kind: Option<&'static str>,
    /// Response status code.
    pub status: u16,
    /// Inbound message size in bytes.
    pub request_bytes: usize,
    /// Rendered relay output size in bytes; zero on failure.
    pub response_bytes: usize,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
}

impl RelayAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RelayAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "relay_request",
            timestamp_ms,
            relay_path: params.relay_path,
            method: params.method,
            inbound_binding: params.inbound_binding,
            action: params.action,
            error_kind: params.error_kind,
            status: params.status,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            peer_ip: params.peer_ip,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for relay request events.
pub trait RelayAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RelayAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RelayAuditSink for StderrAuditSink {
    fn record(&self, event: &RelayAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl RelayAuditSink for NoopAuditSink {
    fn record(&self, _event: &RelayAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
