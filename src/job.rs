//! Job values returned by the server.

use serde::Serialize;

use crate::body::Body;

/// Server-assigned job identifier
pub type JobId = u64;

/// A job returned by `reserve*` or `peek*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Unique for the lifetime of the job
    pub id: JobId,

    /// Payload, decoded through the client's body codec
    pub body: Body,
}

impl Job {
    pub fn new(id: JobId, body: Body) -> Self {
        Self { id, body }
    }
}
