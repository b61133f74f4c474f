//! One-shot transport to the property service socket.
//!
//! Every exchange opens a fresh unix-domain stream connection, writes exactly
//! one record, then drains reply records until the peer closes. The protocol
//! has no multiplexing and no timeout of its own; callers that need a latency
//! bound layer one around the call.
//!
//! Whether the peer replied at all is reported explicitly as an [`Ack`]: a
//! confirming service sends at least one record back before closing, a stock
//! one applies the request silently. What each outcome means per command is
//! the caller's decision, not the transport's.

use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use zerocopy::{AsBytes, FromZeroes};

use crate::msg::{PropMsg, PROP_MSG_SIZE};


/// How the peer ended an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// At least one reply record arrived before the close.
    Confirmed,
    /// The peer closed the connection without sending anything.
    Silent,
}


/// A socket-level failure, or a reply that was not an exact record.
#[derive(Debug)]
pub enum TransportError {
    /// Could not create or connect the socket.
    Connect(std::io::Error),
    /// The request record could not be written in full.
    Send(std::io::Error),
    /// A read failed while draining replies.
    Recv(std::io::Error),
    /// The peer closed mid-record. Fatal for the call; the partial bytes are
    /// not reinterpreted.
    ShortFrame { got: usize },
}


impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(e) => {
                write!(f, "cannot connect to property service: {}", e)
            }
            TransportError::Send(e) => write!(f, "cannot send request: {}", e),
            TransportError::Recv(e) => write!(f, "cannot read reply: {}", e),
            TransportError::ShortFrame { got } => {
                write!(f, "reply truncated: {} of {} bytes", got, PROP_MSG_SIZE)
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Connect(e)
            | TransportError::Send(e)
            | TransportError::Recv(e) => Some(e),
            TransportError::ShortFrame { .. } => None,
        }
    }
}


/// Connection factory for the property service endpoint.
pub struct Transport {
    socket_path: PathBuf,
}


impl Transport {
    /// A transport talking to the given socket path.
    pub fn new(socket_path: impl Into<PathBuf>) -> Transport {
        Transport {
            socket_path: socket_path.into(),
        }
    }

    /// The endpoint this transport connects to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one record, then deliver every complete reply record to
    /// `on_reply` in arrival order until the peer closes.
    ///
    /// A short write is a send failure; a close mid-record is a
    /// [`TransportError::ShortFrame`]. Interrupted calls are retried, nothing
    /// else is. The connection is released on every exit path.
    pub fn exchange<F>(&self, msg: &PropMsg, mut on_reply: F) -> Result<Ack, TransportError>
    where
        F: FnMut(&PropMsg),
    {
        let mut stream = loop {
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => break stream,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Connect(e)),
            }
        };

        stream.write_all(msg.as_bytes()).map_err(TransportError::Send)?;

        let mut replied = false;
        let mut reply = PropMsg::new_zeroed();
        while read_record(&mut stream, reply.as_bytes_mut())? {
            replied = true;
            on_reply(&reply);
        }

        Ok(if replied { Ack::Confirmed } else { Ack::Silent })
    }
}


/// Fill `buf` with exactly one record's worth of bytes.
///
/// `Ok(false)` means the peer closed cleanly between records; a close after a
/// partial record is a `ShortFrame`.
fn read_record(stream: &mut UnixStream, buf: &mut [u8]) -> Result<bool, TransportError> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(TransportError::ShortFrame { got: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransportError::Recv(e)),
        }
    }
    Ok(true)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
