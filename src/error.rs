//! Error types for tubewire
//!
//! One variant per server status word in the error vocabulary, plus the
//! client-local faults (framing, I/O, body codec, configuration).

use thiserror::Error;

/// Result type alias using TubeError
pub type Result<T> = std::result::Result<T, TubeError>;

/// Unified error type for tubewire operations
#[derive(Debug, Error)]
pub enum TubeError {
    // -------------------------------------------------------------------------
    // Server-reported Errors
    // -------------------------------------------------------------------------
    /// The job or tube does not exist, or the job is not reserved by this
    /// connection. For peek commands: no job in the requested state.
    #[error("job not found")]
    NotFound,

    /// `reserve-with-timeout` elapsed without a job becoming ready.
    #[error("timed out waiting for a job")]
    TimedOut,

    /// A job reserved by this connection is about to exceed its TTR.
    #[error("deadline soon for a reserved job")]
    DeadlineSoon,

    /// Ignoring the tube would leave the watch list empty.
    #[error("cannot ignore the only watched tube")]
    NotIgnored,

    /// The job was (or already is) buried.
    #[error("job buried")]
    Buried,

    /// The server created the job but had to bury it.
    #[error("job {0} was created but buried")]
    BuriedWithJobId(u64),

    #[error("server is draining and refuses new jobs")]
    Draining,

    #[error("job body exceeds the server's max-job-size")]
    JobTooBig,

    #[error("server out of memory")]
    OutOfMemory,

    #[error("server internal error")]
    Internal,

    #[error("server rejected a malformed command")]
    BadFormat,

    #[error("server expected CRLF after the job body")]
    ExpectedCrlf,

    #[error("server does not recognize the command")]
    UnknownCommand,

    /// A status word that is neither the expected reply nor a known error.
    #[error("unknown response: {status} {values:?}")]
    UnknownResponse { status: String, values: Vec<String> },

    // -------------------------------------------------------------------------
    // Local Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed mid-frame or a frame was malformed.
    #[error("framing error: {0}")]
    Framing(String),

    #[error("connection is closed")]
    Closed,

    #[error("body encoding error: {0}")]
    Encoding(String),

    #[error("body decoding error: {0}")]
    Decoding(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TubeError {
    /// Map a status word from the protocol-wide error vocabulary.
    ///
    /// Returns `None` for words outside the vocabulary. A `BURIED` reply with
    /// an id field maps to [`TubeError::BuriedWithJobId`]; an id field that is
    /// not a job id is a framing error.
    pub fn from_status(status: &str, values: &[String]) -> Option<Self> {
        let err = match status {
            "BAD_FORMAT" => TubeError::BadFormat,
            "BURIED" => match values.first() {
                None => TubeError::Buried,
                Some(v) => match v.parse() {
                    Ok(id) => TubeError::BuriedWithJobId(id),
                    Err(_) => TubeError::Framing(format!("BURIED with invalid job id {:?}", v)),
                },
            },
            "DEADLINE_SOON" => TubeError::DeadlineSoon,
            "DRAINING" => TubeError::Draining,
            "EXPECTED_CRLF" => TubeError::ExpectedCrlf,
            "INTERNAL_ERROR" => TubeError::Internal,
            "JOB_TOO_BIG" => TubeError::JobTooBig,
            "NOT_FOUND" => TubeError::NotFound,
            "NOT_IGNORED" => TubeError::NotIgnored,
            "OUT_OF_MEMORY" => TubeError::OutOfMemory,
            "TIMED_OUT" => TubeError::TimedOut,
            "UNKNOWN_COMMAND" => TubeError::UnknownCommand,
            _ => return None,
        };
        Some(err)
    }

    /// True for the expected "no job yet" outcome of a timed reserve.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, TubeError::TimedOut)
    }

    /// True when the stream can no longer be trusted and the client should
    /// be closed and reconnected.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TubeError::Io(_)
                | TubeError::Framing(_)
                | TubeError::UnknownResponse { .. }
                | TubeError::Closed
        )
    }
}
