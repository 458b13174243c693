// saml-relay-config/src/lib.rs
// ============================================================================
// Module: SAML Relay Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for saml-relay.toml semantics.
// Dependencies: saml-relay-core, serde, toml
// ============================================================================

//! ## Overview
//! `saml-relay-config` defines the canonical configuration model for the
//! relay. Loading is strict and fail-closed: size-capped files, UTF-8 only,
//! unknown keys rejected, and every relay entry validated before a server
//! can be built. The destination of each relay is fixed here at load time
//! and can never be influenced by request data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::RelayConfig;
pub use config::RelayEntry;
pub use config::RelayInstance;
pub use config::ServerConfig;
