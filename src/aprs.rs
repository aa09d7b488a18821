//! APRS information fields.
//!
//! An information field starts with a Data Type Identifier (DTI) followed by
//! free text. Telemetry arrives as text lines on a serial link; use
//! [`LineAssembler`] to cut the byte stream into lines and
//! [`format_info`] / [`status_report`] to wrap each line for transmission.
//!
//! ```rust
//! use afsk1200::aprs::{DataType, format_info};
//!
//! let info = format_info(DataType::Status, "BATT 7.4V", Some("73")).unwrap();
//! assert_eq!(info.as_str(), ">BATT 7.4V | 73");
//! ```

use core::fmt::Write;

use heapless::{String, Vec};

use crate::consts::MAX_INFO_LEN;
use crate::error::Ax25Error;

/// A formatted information field.
pub type InfoField = String<MAX_INFO_LEN>;

/// Text placed between the payload line and the trailing comment.
pub const COMMENT_SEPARATOR: &str = " | ";

/// Leading character of an information field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum DataType {
    /// `>` status report; the usual choice for free-form telemetry text.
    Status = b'>',
    /// `!` position without timestamp.
    PositionNoTimestamp = b'!',
    /// `:` message.
    Message = b':',
    /// `T` telemetry data.
    Telemetry = b'T',
}

impl DataType {
    /// The DTI byte.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// The DTI as a character.
    pub const fn as_char(self) -> char {
        self as u8 as char
    }

    /// Looks up a DTI byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Self::Status),
            b'!' => Some(Self::PositionNoTimestamp),
            b':' => Some(Self::Message),
            b'T' => Some(Self::Telemetry),
            _ => None,
        }
    }
}

/// Builds `"<dti><line>"`, or `"<dti><line> | <comment>"` when a non-empty
/// comment is given.
///
/// # Errors
/// [`Ax25Error::PayloadTooLong`] if the result exceeds [`MAX_INFO_LEN`] bytes.
pub fn format_info(
    dti: DataType,
    line: &str,
    comment: Option<&str>,
) -> Result<InfoField, Ax25Error> {
    let mut info = InfoField::new();
    let written = match comment {
        Some(comment) if !comment.is_empty() => write!(
            info,
            "{}{}{}{}",
            dti.as_char(),
            line,
            COMMENT_SEPARATOR,
            comment
        ),
        _ => write!(info, "{}{}", dti.as_char(), line),
    };
    written.map_err(|_| Ax25Error::PayloadTooLong(MAX_INFO_LEN))?;
    Ok(info)
}

/// A `>` status report carrying `line` and a fixed station comment.
pub fn status_report(line: &str, comment: &str) -> Result<InfoField, Ax25Error> {
    format_info(DataType::Status, line, Some(comment))
}

/// Splits a serial byte stream into text lines.
///
/// `\r` is dropped, `\n` ends a line, and a line that fills all `N` bytes
/// ends early. Empty lines are skipped.
///
/// ```rust
/// use afsk1200::aprs::LineAssembler;
///
/// let mut lines = LineAssembler::<64>::new();
/// let mut done = false;
/// for &b in b"T+21C\r\n" {
///     done = lines.push(b);
/// }
/// assert!(done);
/// assert_eq!(lines.line(), "T+21C");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineAssembler<const N: usize> {
    buf: Vec<u8, N>,
    complete: bool,
}

impl<const N: usize> LineAssembler<N> {
    /// An empty assembler.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            complete: false,
        }
    }

    /// Feeds one received byte.
    ///
    /// Returns `true` when a line is complete; it stays readable through
    /// [`line()`](Self::line) until the next call.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.complete {
            self.clear();
        }
        match byte {
            b'\r' => {}
            b'\n' => self.complete = !self.buf.is_empty(),
            _ => {
                let _ = self.buf.push(byte);
                self.complete = self.buf.is_full();
            }
        }
        self.complete
    }

    /// `true` while a completed line is held.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The bytes collected so far, up to the last whole UTF-8 character.
    pub fn line(&self) -> &str {
        match core::str::from_utf8(&self.buf) {
            Ok(line) => line,
            Err(e) => core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Discards the current line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.complete = false;
    }
}
