//! Wire record for the property service protocol.
//!
//! Every request and every reply is one fixed-size record: a 4-byte command
//! discriminant followed by a zero-padded name buffer and a zero-padded value
//! buffer. There is no length prefix and no version tag; both ends must be
//! built with identical field widths, and a size mismatch produces silent
//! corruption rather than a negotiated error. The record size is the
//! protocol contract.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use zerocopy::{AsBytes, FromBytes, FromZeroes};


/// Name buffer width. A property name must be strictly shorter, so an
/// in-bounds name always keeps at least one trailing NUL byte.
pub const PROP_NAME_MAX: usize = 32;

/// Value buffer width. Same strictly-shorter rule as [`PROP_NAME_MAX`].
pub const PROP_VALUE_MAX: usize = 92;


/// Command discriminant carried in the first four bytes of a record.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropCmd {
    /// Read one property. The service replies with a record holding the value.
    Get = 1,
    /// Write one property. The service may apply it and close without replying.
    Set = 2,
    /// Enumerate all properties, one reply record each.
    List = 3,
}


/// One wire record.
///
/// Field order matches the counterpart service: u32 command first, then the
/// two byte buffers, `repr(C)` with no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes)]
pub struct PropMsg {
    cmd: u32,
    name: [u8; PROP_NAME_MAX],
    value: [u8; PROP_VALUE_MAX],
}


/// Total size of one record on the wire.
pub const PROP_MSG_SIZE: usize = std::mem::size_of::<PropMsg>();


/// A string did not fit its record field. Detected at the copy site, before
/// any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgError {
    /// Name length in bytes; the bound requires strictly fewer than
    /// [`PROP_NAME_MAX`].
    NameTooLong(usize),
    /// Value length in bytes; the bound requires strictly fewer than
    /// [`PROP_VALUE_MAX`].
    ValueTooLong(usize),
}


impl fmt::Display for MsgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgError::NameTooLong(len) => {
                write!(f, "property name too long: {} bytes, bound {}", len, PROP_NAME_MAX)
            }
            MsgError::ValueTooLong(len) => {
                write!(f, "property value too long: {} bytes, bound {}", len, PROP_VALUE_MAX)
            }
        }
    }
}

impl std::error::Error for MsgError {}


impl PropMsg {
    /// Build a record from a command and two strings.
    ///
    /// Rejects a name or value at or over its field width. Accepted fields
    /// are copied and zero-padded, so the terminating NUL is guaranteed, not
    /// incidental.
    pub fn new(cmd: PropCmd, name: &str, value: &str) -> Result<PropMsg, MsgError> {
        let mut msg = PropMsg::new_zeroed();
        msg.cmd = cmd as u32;
        copy_bounded(name.as_bytes(), &mut msg.name).map_err(MsgError::NameTooLong)?;
        copy_bounded(value.as_bytes(), &mut msg.value).map_err(MsgError::ValueTooLong)?;
        Ok(msg)
    }

    /// The command discriminant, if it is one this build knows.
    pub fn command(&self) -> Option<PropCmd> {
        match self.cmd {
            1 => Some(PropCmd::Get),
            2 => Some(PropCmd::Set),
            3 => Some(PropCmd::List),
            _ => None,
        }
    }

    /// Decoded name field: bytes up to the first NUL, never past the bound.
    pub fn name(&self) -> Cow<'_, str> {
        decode_field(&self.name)
    }

    /// Decoded value field: bytes up to the first NUL, never past the bound.
    pub fn value(&self) -> Cow<'_, str> {
        decode_field(&self.value)
    }
}


/// Copy `src` into `dst`, leaving room for at least one trailing NUL.
/// Returns the offending length when `src` does not fit.
fn copy_bounded(src: &[u8], dst: &mut [u8]) -> Result<(), usize> {
    if src.len() >= dst.len() {
        return Err(src.len());
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(())
}


/// Decode a zero-padded field. A peer that filled the whole buffer without a
/// NUL still decodes, clamped to the field width. Non-UTF-8 bytes decode
/// lossily.
fn decode_field(field: &[u8]) -> Cow<'_, str> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end])
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
