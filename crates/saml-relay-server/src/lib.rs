// saml-relay-server/src/lib.rs
// ============================================================================
// Module: SAML Relay Server Library
// Description: axum HTTP adapter around the pure transcoding core.
// Purpose: Mount configured relay instances and map descriptors to responses.
// Dependencies: axum, saml-relay-config, saml-relay-core, tokio
// ============================================================================

//! ## Overview
//! `saml-relay-server` is the thin network adapter the core deliberately
//! excludes: it materializes each inbound request into a transport-neutral
//! descriptor, invokes [`saml_relay_core::transcode`], and maps the result
//! onto an axum response. Each request is handled independently with no
//! shared mutable state; cancellation is delegated to the transport.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::NoopAuditSink;
pub use audit::RelayAuditEvent;
pub use audit::RelayAuditSink;
pub use audit::StderrAuditSink;
pub use server::RelayServer;
pub use server::ServerError;
pub use server::build_router;
