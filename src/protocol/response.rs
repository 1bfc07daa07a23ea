//! Response definitions
//!
//! One reply read off the wire, before status dispatch.

use bytes::Bytes;

/// A parsed response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// First token of the reply line
    pub status: String,

    /// Remaining whitespace-separated tokens of the reply line
    pub fields: Vec<String>,

    /// Raw payload for body-bearing replies (CRLF stripped)
    pub body: Option<Bytes>,
}

impl Frame {
    /// Create a frame without a body
    pub fn line(status: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            status: status.into(),
            fields,
            body: None,
        }
    }

    /// Parse field `index` as an unsigned integer
    pub fn field_u64(&self, index: usize) -> Option<u64> {
        self.fields.get(index).and_then(|f| f.parse().ok())
    }
}

/// The successful shape a command's reply takes once dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Bare status word (`DELETED`, `TOUCHED`, ...)
    Empty,

    /// A single integer field (`INSERTED <id>`, `WATCHING <count>`, ...)
    Count(u64),

    /// A single name field (`USING <tube>`)
    Name(String),

    /// A job id plus body (`RESERVED`, `FOUND`)
    Job { id: u64, body: Bytes },

    /// A YAML payload (`OK <bytes>`)
    Data(Bytes),
}
