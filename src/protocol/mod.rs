//! Protocol Module
//!
//! Defines the beanstalkd text protocol as seen from a client.
//!
//! ## Flow
//! ```text
//! Command ──to_request──▶ Request ──encode──▶ bytes ──▶ server
//!                                                         │
//! Reply ◀──dispatch── Frame ◀──read_frame── bytes ◀───────┘
//! ```
//!
//! ### Layers
//! - `command`:  typed commands and the raw [`Request`]
//! - `codec`:    byte-exact request encoding and response framing
//! - `response`: the [`Frame`] read off the wire and dispatched [`Reply`]
//! - `dispatch`: per-command success table and the error vocabulary
//! - `yaml`:     stats mappings and tube lists

mod command;
mod response;
mod codec;
pub mod dispatch;
pub mod yaml;

pub use command::{Command, Request};
pub use response::{Frame, Reply};
pub use codec::{
    encode_command, encode_frame, encode_request, read_frame, write_request, CRLF,
    MAX_BODY_SIZE, MAX_LINE_LENGTH,
};
pub use dispatch::{dispatch, expect, Expect, Shape};
pub use yaml::{parse_list, parse_stats, StatValue, Stats};
