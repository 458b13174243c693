// crates/saml-relay-server/tests/common/mod.rs
// ============================================================================
// Module: Relay Server Test Harness
// Description: Helpers for spawning relay servers on loopback listeners.
// Purpose: Provide deterministic server startup and teardown for tests.
// Dependencies: axum, saml-relay-config, saml-relay-server, tokio
// ============================================================================

//! ## Overview
//! Spawns a fully configured relay router on an ephemeral loopback port and
//! hands back a base URL plus a non-redirecting HTTP client, so tests can
//! observe 302 responses directly.

#![allow(dead_code, reason = "Shared test helpers may be unused in some suites.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use saml_relay_config::RelayConfig;
use saml_relay_server::RelayAuditEvent;
use saml_relay_server::RelayAuditSink;
use saml_relay_server::build_router;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that captures events for assertions.
#[derive(Default)]
pub struct CaptureAuditSink {
    /// Recorded events in arrival order.
    pub events: Mutex<Vec<RelayAuditEvent>>,
}

impl RelayAuditSink for CaptureAuditSink {
    fn record(&self, event: &RelayAuditEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Handle for a spawned relay server.
pub struct RelayServerHandle {
    /// Base URL of the spawned server.
    base_url: String,
    /// Serve task handle.
    join: JoinHandle<Result<(), std::io::Error>>,
}

impl RelayServerHandle {
    /// Returns the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a client that does not follow redirects.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client build")
    }

    /// Shuts down the server task.
    pub async fn shutdown(self) {
        self.join.abort();
        let _ = self.join.await;
    }
}

/// Spawns a relay server for the given TOML config document.
pub async fn spawn_relay(document: &str, audit: Arc<dyn RelayAuditSink>) -> RelayServerHandle {
    let config: RelayConfig = toml::from_str(document).expect("fixture config parses");
    config.validate().expect("fixture config valid");
    let app = build_router(&config, audit).expect("router builds");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("loopback bind");
    let addr = listener.local_addr().expect("listener address");
    let join = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
    });
    RelayServerHandle {
        base_url: format!("http://{addr}"),
        join,
    }
}
