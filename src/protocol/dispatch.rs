//! Status dispatch
//!
//! Maps `(command, frame)` to either a [`Reply`] or a [`TubeError`].
//!
//! ## Per-command Success Table
//! ```text
//! put                   INSERTED <id>
//! use, list-tube-used   USING <tube>
//! reserve*              RESERVED <id> <bytes> + body
//! delete                DELETED
//! release               RELEASED
//! bury                  BURIED
//! touch                 TOUCHED
//! watch, ignore         WATCHING <count>
//! peek*                 FOUND <id> <bytes> + body
//! kick                  KICKED <count>
//! kick-job              KICKED
//! stats*, list-tubes*   OK <bytes> + body
//! pause-tube            PAUSED
//! ```

use tracing::{trace, warn};

use super::{Command, Frame, Reply};
use crate::error::{Result, TubeError};

/// The shape of a successful reply's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Empty,
    Count,
    Name,
    Job,
    Data,
}

impl Shape {
    /// Whether this reply is followed by a length-prefixed body
    pub fn has_body(self) -> bool {
        matches!(self, Shape::Job | Shape::Data)
    }
}

/// The success status word a command expects, and its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expect {
    pub status: &'static str,
    pub shape: Shape,
}

impl Expect {
    const fn new(status: &'static str, shape: Shape) -> Self {
        Self { status, shape }
    }

    /// Whether the codec must read a body after this status line
    pub fn bears_body(&self, status: &str) -> bool {
        self.shape.has_body() && self.status == status
    }
}

/// Look up the success expectation for a command
pub fn expect(command: &Command) -> Expect {
    match command {
        Command::Put { .. } => Expect::new("INSERTED", Shape::Count),
        Command::Use { .. } | Command::ListTubeUsed => Expect::new("USING", Shape::Name),
        Command::Reserve | Command::ReserveWithTimeout { .. } | Command::ReserveJob { .. } => {
            Expect::new("RESERVED", Shape::Job)
        }
        Command::Delete { .. } => Expect::new("DELETED", Shape::Empty),
        Command::Release { .. } => Expect::new("RELEASED", Shape::Empty),
        Command::Bury { .. } => Expect::new("BURIED", Shape::Empty),
        Command::Touch { .. } => Expect::new("TOUCHED", Shape::Empty),
        Command::Watch { .. } | Command::Ignore { .. } => Expect::new("WATCHING", Shape::Count),
        Command::Peek { .. } | Command::PeekReady | Command::PeekDelayed | Command::PeekBuried => {
            Expect::new("FOUND", Shape::Job)
        }
        Command::Kick { .. } => Expect::new("KICKED", Shape::Count),
        Command::KickJob { .. } => Expect::new("KICKED", Shape::Empty),
        Command::StatsJob { .. }
        | Command::StatsTube { .. }
        | Command::Stats
        | Command::ListTubes
        | Command::ListTubesWatched => Expect::new("OK", Shape::Data),
        Command::PauseTube { .. } => Expect::new("PAUSED", Shape::Empty),
    }
}

/// Classify a frame read in reply to `command`
pub fn dispatch(command: &Command, frame: Frame) -> Result<Reply> {
    let expected = expect(command);
    trace!(command = command.name(), status = %frame.status, "dispatching reply");

    if frame.status == expected.status {
        return shape_reply(expected.shape, frame);
    }

    if let Some(err) = TubeError::from_status(&frame.status, &frame.fields) {
        return Err(err);
    }

    warn!(
        command = command.name(),
        status = %frame.status,
        "unknown response status"
    );
    Err(TubeError::UnknownResponse {
        status: frame.status,
        values: frame.fields,
    })
}

fn shape_reply(shape: Shape, frame: Frame) -> Result<Reply> {
    match shape {
        Shape::Empty => Ok(Reply::Empty),
        Shape::Count => frame
            .field_u64(0)
            .map(Reply::Count)
            .ok_or_else(|| bad_field(&frame, "integer")),
        Shape::Name => frame
            .fields
            .first()
            .cloned()
            .map(Reply::Name)
            .ok_or_else(|| bad_field(&frame, "tube name")),
        Shape::Job => {
            let id = frame
                .field_u64(0)
                .ok_or_else(|| bad_field(&frame, "job id"))?;
            let body = frame
                .body
                .ok_or_else(|| TubeError::Framing(format!("{} reply without a body", frame.status)))?;
            Ok(Reply::Job { id, body })
        }
        Shape::Data => frame
            .body
            .map(Reply::Data)
            .ok_or_else(|| TubeError::Framing("OK reply without a body".to_string())),
    }
}

fn bad_field(frame: &Frame, what: &str) -> TubeError {
    TubeError::Framing(format!(
        "{} reply: missing or invalid {} in {:?}",
        frame.status, what, frame.fields
    ))
}
