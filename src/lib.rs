//! # tubewire
//!
//! A blocking client for the beanstalkd work-queue protocol with:
//! - Byte-exact request encoding and length-framed response bodies
//! - Per-command status dispatch into typed replies or a closed error set
//! - Local tracking of the used tube and watch list
//! - TCP and Unix domain socket transports
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Client (facade)                        │
//! │              one method per protocol command                 │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   Connection    │                │    TubeState    │
//!   │ (one in flight) │                │ (used, watched) │
//!   └────────┬────────┘                └─────────────────┘
//!            │
//!     ┌──────┴───────┐
//!     ▼              ▼
//! ┌────────┐   ┌──────────┐
//! │ Codec  │──▶│ Dispatch │
//! └────────┘   └──────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod body;
pub mod job;
pub mod state;
pub mod network;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use body::{Body, BodyCodec};
pub use client::Client;
pub use config::{Config, DEFAULT_PRIORITY, DEFAULT_TTR};
pub use error::{Result, TubeError};
pub use job::{Job, JobId};
pub use network::Address;
pub use protocol::{StatValue, Stats};
pub use state::DEFAULT_TUBE;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tubewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
