//! Job bodies and the text codec applied to them at the client boundary.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{Result, TubeError};

/// How job bodies are converted between text and bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyCodec {
    /// UTF-8 text
    #[default]
    Utf8,

    /// 7-bit ASCII text
    Ascii,

    /// No text codec; bodies stay raw bytes
    Raw,
}

impl BodyCodec {
    /// Turn a body into the bytes sent on the wire
    pub fn encode(self, body: Body) -> Result<Bytes> {
        match (self, body) {
            (_, Body::Raw(bytes)) => Ok(bytes),
            (BodyCodec::Utf8, Body::Text(text)) => Ok(Bytes::from(text)),
            (BodyCodec::Ascii, Body::Text(text)) => {
                if text.is_ascii() {
                    Ok(Bytes::from(text))
                } else {
                    Err(TubeError::Encoding(
                        "body contains non-ASCII characters".to_string(),
                    ))
                }
            }
            (BodyCodec::Raw, Body::Text(_)) => Err(TubeError::Encoding(
                "unable to encode text with the raw codec".to_string(),
            )),
        }
    }

    /// Turn received bytes into a body
    pub fn decode(self, bytes: Bytes) -> Result<Body> {
        match self {
            BodyCodec::Raw => Ok(Body::Raw(bytes)),
            BodyCodec::Utf8 => String::from_utf8(bytes.to_vec())
                .map(Body::Text)
                .map_err(|e| TubeError::Decoding(e.to_string())),
            BodyCodec::Ascii => {
                if bytes.is_ascii() {
                    // ASCII is a subset of UTF-8
                    String::from_utf8(bytes.to_vec())
                        .map(Body::Text)
                        .map_err(|e| TubeError::Decoding(e.to_string()))
                } else {
                    Err(TubeError::Decoding(
                        "body contains non-ASCII bytes".to_string(),
                    ))
                }
            }
        }
    }
}

impl std::str::FromStr for BodyCodec {
    type Err = TubeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(BodyCodec::Utf8),
            "ascii" => Ok(BodyCodec::Ascii),
            "raw" | "none" => Ok(BodyCodec::Raw),
            other => Err(TubeError::Config(format!("unknown body codec {:?}", other))),
        }
    }
}

/// A job body, either decoded text or raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Text(String),
    Raw(Bytes),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Raw(bytes) => bytes,
        }
    }

    /// The body as text, if it was decoded by a text codec
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Raw(_) => None,
        }
    }

    /// Byte length on the wire
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.write_str(text),
            Body::Raw(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Raw(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Raw(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Raw(Bytes::copy_from_slice(bytes))
    }
}

impl<const N: usize> From<&[u8; N]> for Body {
    fn from(bytes: &[u8; N]) -> Self {
        Body::Raw(Bytes::copy_from_slice(bytes))
    }
}
