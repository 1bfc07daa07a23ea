//! Connection
//!
//! One framed request/response exchange at a time over a [`Stream`].

use std::io::{BufReader, BufWriter};
use std::time::Duration;

use super::transport::{Address, Stream};
use crate::error::Result;
use crate::protocol::{dispatch, expect, read_frame, write_request, Command, Reply};

/// A connected, framed protocol stream
pub struct Connection {
    /// Read half (buffered for line reads)
    reader: BufReader<Stream>,

    /// Write half (buffered so header and body go out together)
    writer: BufWriter<Stream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `address`
    pub fn open(address: &Address) -> Result<Self> {
        let stream = Stream::connect(address)?;
        let conn = Self::from_stream(stream, address.to_string())?;
        tracing::debug!("Connected to {}", conn.peer_addr);
        Ok(conn)
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: Stream, peer_addr: String) -> Result<Self> {
        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    /// Set the deadline for subsequent reads and writes
    pub fn set_deadline(&mut self, deadline: Option<Duration>) -> Result<()> {
        self.writer.get_ref().set_deadline(deadline)?;
        Ok(())
    }

    /// Send one command and dispatch its reply
    pub fn execute(&mut self, command: &Command) -> Result<Reply> {
        tracing::trace!("-> {} {}", self.peer_addr, command.name());
        write_request(&mut self.writer, &command.to_request())?;

        let frame = read_frame(&mut self.reader, &expect(command))?;
        tracing::trace!("<- {} {} {:?}", self.peer_addr, frame.status, frame.fields);

        dispatch(command, frame)
    }

    /// Shut down the stream
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        let stream = self
            .writer
            .into_inner()
            .map_err(|e| e.into_error())?;
        match stream.shutdown() {
            Ok(()) => Ok(()),
            // The peer may already have gone away
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
