//! Property client with ordered read fallback.
//!
//! `get` consults sources in a fixed, total order and short-circuits on the
//! first success: the live service, then the static property file, then the
//! kernel command line, then the caller's default. `set` and `list` have no
//! fallback; there is no local store the client is authorized to mutate, and
//! the static sources are too partial to stand in for a live enumeration.
//!
//! All operations are blocking and one connection per call. Validation
//! failures are the only errors `get` can return; for `set` and `list`
//! transport failures propagate to the caller.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cmdline;
use crate::msg::{MsgError, PropCmd, PropMsg};
use crate::propfile;
use crate::transport::{Ack, Transport, TransportError};


/// Paths the client talks to. `Default` carries the well-known system
/// locations; tests and sandboxed environments substitute their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Unix socket the property service listens on.
    pub socket_path: PathBuf,
    /// Static `key=value` file consulted when the service is down.
    pub prop_file: PathBuf,
    /// Kernel command line pseudo-file.
    pub cmdline_path: PathBuf,
}


impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            socket_path: PathBuf::from("/dev/socket/property_service"),
            prop_file: PathBuf::from("/system/build.prop"),
            cmdline_path: PathBuf::from("/proc/cmdline"),
        }
    }
}


/// Errors surfaced to callers of [`PropertyClient`].
#[derive(Debug)]
pub enum ClientError {
    /// Key length is at or over the name bound. No I/O was performed.
    NameTooLong(usize),
    /// Value length is at or over the value bound. No I/O was performed.
    ValueTooLong(usize),
    /// The exchange with the service failed. Only `set` and `list` return
    /// this; `get` recovers by advancing the fallback chain.
    Transport(TransportError),
    /// The service closed the `list` connection without emitting a single
    /// entry, so it does not support enumeration.
    ListUnsupported,
}


impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::NameTooLong(len) => write!(f, "{}", MsgError::NameTooLong(*len)),
            ClientError::ValueTooLong(len) => write!(f, "{}", MsgError::ValueTooLong(*len)),
            ClientError::Transport(e) => write!(f, "{}", e),
            ClientError::ListUnsupported => {
                write!(f, "property service closed without replying; enumeration not supported")
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MsgError> for ClientError {
    fn from(e: MsgError) -> Self {
        match e {
            MsgError::NameTooLong(len) => ClientError::NameTooLong(len),
            MsgError::ValueTooLong(len) => ClientError::ValueTooLong(len),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::Transport(e)
    }
}


/// Client for the system property store.
///
/// Stateless apart from its configured paths: every call opens its own
/// connection and buffer, so calls from multiple threads do not interfere.
/// The store itself is not transactional; a concurrent `set` and `get` on
/// the same key may interleave arbitrarily at the service.
pub struct PropertyClient {
    transport: Transport,
    prop_file: PathBuf,
    cmdline_path: PathBuf,
}


impl PropertyClient {
    /// Client for the system endpoints ([`ClientConfig::default`]).
    pub fn new() -> PropertyClient {
        PropertyClient::with_config(ClientConfig::default())
    }

    /// Client for explicitly configured endpoints.
    pub fn with_config(config: ClientConfig) -> PropertyClient {
        PropertyClient {
            transport: Transport::new(config.socket_path),
            prop_file: config.prop_file,
            cmdline_path: config.cmdline_path,
        }
    }

    /// Resolve `key`, falling back through the static sources to `default`.
    ///
    /// Absence is not an error: when no source has the key the result is
    /// `default`, or the empty string without one. The only error is a key
    /// at or over the name bound, returned before any I/O.
    pub fn get(&self, key: &str, default: Option<&str>) -> Result<String, ClientError> {
        let request = PropMsg::new(PropCmd::Get, key, "")?;

        // Live service first. Only a confirming service counts: each reply
        // overwrites the last, and the final one carries the value.
        let mut live: Option<String> = None;
        let outcome = self.transport.exchange(&request, |reply| {
            live = Some(reply.value().into_owned());
        });
        if let Ok(Ack::Confirmed) = outcome {
            let value = live.unwrap_or_default();
            if value.is_empty() {
                if let Some(default) = default {
                    return Ok(default.to_string());
                }
            }
            return Ok(value);
        }

        // Service absent or silent: static sources, then the default.
        if let Some(value) = propfile::find_key(&self.prop_file, key) {
            return Ok(value);
        }
        if let Some(value) = cmdline::find_key(&self.cmdline_path, key) {
            return Ok(value);
        }
        Ok(default.unwrap_or("").to_string())
    }

    /// Write `key` to the service.
    ///
    /// Success is the connection closing cleanly after the send, with or
    /// without a reply record. There is no fallback sink: if the service is
    /// unreachable the error propagates rather than silently succeeding
    /// against a file.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let request = PropMsg::new(PropCmd::Set, key, value)?;
        self.transport.exchange(&request, |_| {})?;
        Ok(())
    }

    /// Enumerate the service's live properties.
    ///
    /// Every reply record becomes one `visit(name, value)` call, in server
    /// emission order. One-shot snapshot; no pagination and no fallback to
    /// the static sources.
    pub fn list<F>(&self, mut visit: F) -> Result<(), ClientError>
    where
        F: FnMut(&str, &str),
    {
        let request = PropMsg::new(PropCmd::List, "", "")?;
        let outcome = self.transport.exchange(&request, |reply| {
            visit(&reply.name(), &reply.value());
        })?;
        match outcome {
            Ack::Confirmed => Ok(()),
            Ack::Silent => Err(ClientError::ListUnsupported),
        }
    }
}


impl Default for PropertyClient {
    fn default() -> Self {
        PropertyClient::new()
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
