//! Protocol codec
//!
//! Encoding of requests and framing of responses for the text protocol.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! name[ arg]*\r\n
//! [<body bytes>\r\n]          (put only; last arg is the byte count)
//! ```
//!
//! ### Response
//! ```text
//! STATUS[ field]*\r\n
//! [<body bytes>\r\n]          (RESERVED / FOUND / OK; last field is the byte count)
//! ```
//!
//! Body bytes are read by length and never scanned for line terminators.

use std::io::{BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::dispatch::Expect;
use super::{Command, Frame, Request};
use crate::error::{Result, TubeError};

/// Line terminator for every request and response line
pub const CRLF: &[u8] = b"\r\n";

/// Maximum length of a single response line, terminator included
pub const MAX_LINE_LENGTH: usize = 1024;

/// Maximum job body size accepted from a server (1 GiB, the server's own hard cap)
pub const MAX_BODY_SIZE: usize = 1024 * 1024 * 1024;

/// Body bytes reserved up front; larger bodies grow as data arrives
const BODY_PREALLOC: usize = 64 * 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to bytes
///
/// Fails with a framing error if an argument would break the line format or
/// the declared byte count does not match the body length.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    if request.name.is_empty() || !is_token(&request.name) {
        return Err(TubeError::Framing(format!(
            "invalid command name {:?}",
            request.name
        )));
    }
    if let Some(arg) = request.args.iter().find(|a| a.is_empty() || !is_token(a)) {
        return Err(TubeError::Framing(format!(
            "{}: invalid argument {:?}",
            request.name, arg
        )));
    }

    let body_len = request.body.as_ref().map_or(0, |b| b.len() + CRLF.len());
    let header_len: usize =
        request.name.len() + request.args.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut buf = BytesMut::with_capacity(header_len + CRLF.len() + body_len);

    buf.put_slice(request.name.as_bytes());
    for arg in &request.args {
        buf.put_u8(b' ');
        buf.put_slice(arg.as_bytes());
    }
    buf.put_slice(CRLF);

    if let Some(body) = &request.body {
        let declared = request
            .args
            .last()
            .and_then(|a| a.parse::<usize>().ok());
        if declared != Some(body.len()) {
            return Err(TubeError::Framing(format!(
                "{}: declared byte count {:?} does not match body length {}",
                request.name,
                request.args.last(),
                body.len()
            )));
        }
        buf.put_slice(body);
        buf.put_slice(CRLF);
    }

    Ok(buf.to_vec())
}

/// Encode a typed command to bytes
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    encode_request(&command.to_request())
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn is_token(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_graphic() || b >= 0x80)
}

// =============================================================================
// Response Framing
// =============================================================================

/// Read one response frame from a buffered stream
///
/// A body is read only when the status word is the body-bearing success
/// status in `expect`.
pub fn read_frame<R: BufRead>(reader: &mut R, expect: &Expect) -> Result<Frame> {
    let line = read_line(reader)?;

    let mut tokens = line.split_ascii_whitespace().map(str::to_string);
    let status = tokens
        .next()
        .ok_or_else(|| TubeError::Framing("empty response line".to_string()))?;
    let fields: Vec<String> = tokens.collect();

    let mut frame = Frame::line(status, fields);
    if expect.bears_body(&frame.status) {
        let size = frame
            .fields
            .last()
            .and_then(|f| f.parse::<usize>().ok())
            .ok_or_else(|| {
                TubeError::Framing(format!(
                    "{} reply without a valid byte count: {:?}",
                    frame.status, frame.fields
                ))
            })?;
        if size > MAX_BODY_SIZE {
            return Err(TubeError::Framing(format!(
                "{} body too large: {} bytes (max {})",
                frame.status, size, MAX_BODY_SIZE
            )));
        }
        frame.body = Some(read_chunk(reader, size)?);
    }

    Ok(frame)
}

/// Read a `\r\n`-terminated line, returning it without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut raw = Vec::with_capacity(64);
    reader
        .by_ref()
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', &mut raw)?;

    if raw.is_empty() {
        return Err(TubeError::Framing("unexpected EOF".to_string()));
    }
    if !raw.ends_with(CRLF) {
        let reason = if raw.len() >= MAX_LINE_LENGTH {
            "response line too long"
        } else if raw.ends_with(b"\n") {
            "response line missing CRLF"
        } else {
            "unexpected EOF reading response line"
        };
        return Err(TubeError::Framing(reason.to_string()));
    }
    raw.truncate(raw.len() - CRLF.len());

    String::from_utf8(raw)
        .map_err(|_| TubeError::Framing("response line is not valid UTF-8".to_string()))
}

/// Read exactly `size` body bytes plus the trailing `\r\n`
///
/// `size` must not exceed `MAX_BODY_SIZE`.
fn read_chunk<R: Read>(reader: &mut R, size: usize) -> Result<Bytes> {
    let wanted = size + CRLF.len();
    let mut chunk = Vec::with_capacity(wanted.min(BODY_PREALLOC));
    reader.by_ref().take(wanted as u64).read_to_end(&mut chunk)?;

    if chunk.len() < wanted {
        return Err(TubeError::Framing(format!(
            "unexpected EOF reading {} byte body",
            size
        )));
    }
    if !chunk.ends_with(CRLF) {
        return Err(TubeError::Framing(
            "body not terminated by CRLF".to_string(),
        ));
    }
    chunk.truncate(size);
    Ok(Bytes::from(chunk))
}

/// Encode a frame as a server would send it
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(64);
    buf.put_slice(frame.status.as_bytes());
    for field in &frame.fields {
        buf.put_u8(b' ');
        buf.put_slice(field.as_bytes());
    }
    buf.put_slice(CRLF);
    if let Some(body) = &frame.body {
        buf.put_slice(body);
        buf.put_slice(CRLF);
    }
    buf.to_vec()
}
