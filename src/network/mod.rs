//! Network Module
//!
//! Transport and framed connection handling.
//!
//! ## Architecture
//! - `transport`: TCP / Unix stream plus address parsing
//! - `connection`: buffered halves, one command in flight at a time

mod transport;
mod connection;

pub use transport::{Address, Stream, DEFAULT_PORT};
pub use connection::Connection;
