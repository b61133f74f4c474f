//! Client for the system property service.
//!
//! System properties are bounded key/value configuration entries owned by a
//! privileged service process and reachable over a unix-domain socket. This
//! crate speaks the service's fixed-record protocol and, for reads, falls
//! back to two read-only static sources when the service is unreachable:
//! a `key=value` property file, then the kernel command line (where
//! `androidboot.X=V` boot parameters surface as `ro.X`).
//!
//! The fallback order is fixed and total: service, file, command line, then
//! the caller's default. Writes and enumeration have no fallback; they
//! require the live service.
//!
//! ```no_run
//! use sysprop_client::PropertyClient;
//!
//! let props = PropertyClient::new();
//! let hardware = props.get("ro.hardware", Some("unknown"))?;
//! props.set("persist.example.mode", "fast")?;
//! # Ok::<(), sysprop_client::ClientError>(())
//! ```
//!
//! Everything is blocking and stateless: one fresh connection per call, no
//! caching, no change notification. The wire record is a fixed 128 bytes
//! with no length prefix or version tag, so both ends must be built with
//! identical field widths (see [`msg`]).

pub mod client;
pub mod cmdline;
pub mod msg;
pub mod propfile;
pub mod transport;

pub use client::{ClientConfig, ClientError, PropertyClient};
pub use msg::{MsgError, PropCmd, PropMsg, PROP_MSG_SIZE, PROP_NAME_MAX, PROP_VALUE_MAX};
pub use transport::{Ack, Transport, TransportError};
