//! Command definitions
//!
//! Typed protocol commands and their transient wire-level [`Request`] form.

use bytes::Bytes;

/// A typed protocol command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put {
        priority: u32,
        delay: u64,
        ttr: u64,
        body: Bytes,
    },
    Use { tube: String },
    Reserve,
    ReserveWithTimeout { timeout: u64 },
    ReserveJob { id: u64 },
    Delete { id: u64 },
    Release { id: u64, priority: u32, delay: u64 },
    Bury { id: u64, priority: u32 },
    Touch { id: u64 },
    Watch { tube: String },
    Ignore { tube: String },
    Peek { id: u64 },
    PeekReady,
    PeekDelayed,
    PeekBuried,
    Kick { bound: u64 },
    KickJob { id: u64 },
    StatsJob { id: u64 },
    StatsTube { tube: String },
    Stats,
    ListTubes,
    ListTubeUsed,
    ListTubesWatched,
    PauseTube { tube: String, delay: u64 },
}

impl Command {
    /// The command's name token on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::Put { .. } => "put",
            Command::Use { .. } => "use",
            Command::Reserve => "reserve",
            Command::ReserveWithTimeout { .. } => "reserve-with-timeout",
            Command::ReserveJob { .. } => "reserve-job",
            Command::Delete { .. } => "delete",
            Command::Release { .. } => "release",
            Command::Bury { .. } => "bury",
            Command::Touch { .. } => "touch",
            Command::Watch { .. } => "watch",
            Command::Ignore { .. } => "ignore",
            Command::Peek { .. } => "peek",
            Command::PeekReady => "peek-ready",
            Command::PeekDelayed => "peek-delayed",
            Command::PeekBuried => "peek-buried",
            Command::Kick { .. } => "kick",
            Command::KickJob { .. } => "kick-job",
            Command::StatsJob { .. } => "stats-job",
            Command::StatsTube { .. } => "stats-tube",
            Command::Stats => "stats",
            Command::ListTubes => "list-tubes",
            Command::ListTubeUsed => "list-tube-used",
            Command::ListTubesWatched => "list-tubes-watched",
            Command::PauseTube { .. } => "pause-tube",
        }
    }

    /// Build the wire-level request for this command
    pub fn to_request(&self) -> Request {
        let request = Request::new(self.name());
        match self {
            Command::Put {
                priority,
                delay,
                ttr,
                body,
            } => request
                .arg(priority)
                .arg(delay)
                .arg(ttr)
                .arg(body.len())
                .body(body.clone()),
            Command::Use { tube }
            | Command::Watch { tube }
            | Command::Ignore { tube }
            | Command::StatsTube { tube } => request.arg(tube),
            Command::ReserveWithTimeout { timeout } => request.arg(timeout),
            Command::ReserveJob { id }
            | Command::Delete { id }
            | Command::Touch { id }
            | Command::Peek { id }
            | Command::KickJob { id }
            | Command::StatsJob { id } => request.arg(id),
            Command::Release {
                id,
                priority,
                delay,
            } => request.arg(id).arg(priority).arg(delay),
            Command::Bury { id, priority } => request.arg(id).arg(priority),
            Command::Kick { bound } => request.arg(bound),
            Command::PauseTube { tube, delay } => request.arg(tube).arg(delay),
            Command::Reserve
            | Command::PeekReady
            | Command::PeekDelayed
            | Command::PeekBuried
            | Command::Stats
            | Command::ListTubes
            | Command::ListTubeUsed
            | Command::ListTubesWatched => request,
        }
    }
}

/// A single outbound request: name, arguments, and an optional body.
///
/// When a body is present the last argument is its declared byte count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub name: String,
    pub args: Vec<String>,
    pub body: Option<Bytes>,
}

impl Request {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            body: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Attach a body payload
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}
