//! AX.25 Unnumbered-Information frame assembly.
//!
//! Builds the byte sequence an APRS packet travels in:
//!
//! ```text
//! | dest (7) | src (7) | digi 0..8 (7 each) | ctrl 0x03 | PID 0xF0 | info ... | FCS lo | FCS hi |
//! ```
//!
//! Each address is the call sign padded with spaces to 6 bytes, every byte
//! shifted left by one, followed by `0x60 | ssid << 1 | last`. Only the final
//! address carries the extension bit. The FCS is CRC-16/X-25 over everything
//! before it.
//!
//! Frames are written into a caller-owned buffer; nothing here allocates.
//!
//! ## Limitations
//!
//! - Only UI frames are produced; there is no decoder for received traffic.
//! - The command/response and has-been-repeated bits are always clear.

use core::fmt;
use core::str::FromStr;

use crate::consts::{
    ADDRESS_EXTENSION_BIT, ADDRESS_LEN, AX25_CONTROL_UI, AX25_PID_NO_LAYER3, CALLSIGN_LEN,
    FCS_LEN, MAX_DIGIPEATERS, MAX_SSID, SSID_RESERVED_BITS,
};
use crate::crc::crc16_x25;
use crate::error::Ax25Error;

/// A validated station address: call sign plus SSID.
///
/// The call sign is stored uppercased and space padded, exactly as it goes
/// on air before the one-bit shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    call: [u8; CALLSIGN_LEN],
    len: u8,
    ssid: u8,
}

impl Address {
    /// Validates `call` (1-6 ASCII letters or digits, any case) and `ssid` (0-15).
    ///
    /// Usable in `const` context so fixed station configuration can be
    /// checked at compile time.
    pub const fn new(call: &str, ssid: u8) -> Result<Self, Ax25Error> {
        let bytes = call.as_bytes();
        if bytes.is_empty() {
            return Err(Ax25Error::EmptyCallsign);
        }
        if bytes.len() > CALLSIGN_LEN {
            return Err(Ax25Error::CallsignTooLong(bytes.len()));
        }
        if ssid > MAX_SSID {
            return Err(Ax25Error::InvalidSsid(ssid));
        }

        let mut padded = [b' '; CALLSIGN_LEN];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if !b.is_ascii_alphanumeric() {
                return Err(Ax25Error::InvalidCallsign(b));
            }
            padded[i] = b.to_ascii_uppercase();
            i += 1;
        }

        Ok(Self {
            call: padded,
            len: bytes.len() as u8,
            ssid,
        })
    }

    /// The call sign without padding.
    pub fn callsign(&self) -> &str {
        // Only ASCII alphanumerics are ever stored.
        core::str::from_utf8(&self.call[..usize::from(self.len)]).unwrap_or_default()
    }

    /// The secondary station identifier.
    pub const fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Encodes this address as the 7 on-air bytes.
    ///
    /// `last` sets the extension bit marking the end of the address field.
    pub const fn encode(&self, last: bool) -> [u8; ADDRESS_LEN] {
        let mut out = [0u8; ADDRESS_LEN];
        let mut i = 0;
        while i < CALLSIGN_LEN {
            out[i] = self.call[i] << 1;
            i += 1;
        }
        out[CALLSIGN_LEN] = SSID_RESERVED_BITS
            | (self.ssid << 1)
            | if last { ADDRESS_EXTENSION_BIT } else { 0 };
        out
    }
}

impl FromStr for Address {
    type Err = Ax25Error;

    /// Parses `CALL` or `CALL-SSID`, e.g. `WIDE2-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((call, ssid)) => {
                let ssid = ssid.parse::<u8>().map_err(|_| Ax25Error::MalformedSsid)?;
                Self::new(call, ssid)
            }
            None => Self::new(s, 0),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid == 0 {
            f.write_str(self.callsign())
        } else {
            write!(f, "{}-{}", self.callsign(), self.ssid)
        }
    }
}

/// Number of bytes a UI frame with `digipeaters` path entries and an
/// `info_len`-byte information field occupies.
pub const fn frame_len(digipeaters: usize, info_len: usize) -> usize {
    (2 + digipeaters) * ADDRESS_LEN + 2 + info_len + FCS_LEN
}

/// Assembles an AX.25 UI frame into `out` and returns its length.
///
/// Addresses go out in the order destination, source, then `path`.
/// `info` is copied verbatim; APRS callers prefix it with a Data Type
/// Identifier (see [`crate::aprs`]).
///
/// # Errors
/// - [`Ax25Error::PathTooLong`] for more than 8 digipeaters
/// - [`Ax25Error::FrameTooLong`] if the frame does not fit `out`
///
/// On error `out` is left untouched.
///
/// # Example
/// ```rust
/// use afsk1200::ax25::{Address, encode_ui_frame};
///
/// let dst = Address::new("APRS", 0).unwrap();
/// let src = Address::new("N0CALL", 7).unwrap();
/// let mut buf = [0u8; 64];
/// let len = encode_ui_frame(&dst, &src, &[], b">hi", &mut buf).unwrap();
/// assert_eq!(len, 14 + 2 + 3 + 2);
/// ```
pub fn encode_ui_frame(
    destination: &Address,
    source: &Address,
    path: &[Address],
    info: &[u8],
    out: &mut [u8],
) -> Result<usize, Ax25Error> {
    if path.len() > MAX_DIGIPEATERS {
        return Err(Ax25Error::PathTooLong(path.len()));
    }
    let needed = frame_len(path.len(), info.len());
    if needed > out.len() {
        return Err(Ax25Error::FrameTooLong {
            needed,
            capacity: out.len(),
        });
    }

    let last = 1 + path.len();
    let mut pos = 0;
    for (i, address) in [destination, source].into_iter().chain(path).enumerate() {
        out[pos..pos + ADDRESS_LEN].copy_from_slice(&address.encode(i == last));
        pos += ADDRESS_LEN;
    }

    out[pos] = AX25_CONTROL_UI;
    out[pos + 1] = AX25_PID_NO_LAYER3;
    pos += 2;

    out[pos..pos + info.len()].copy_from_slice(info);
    pos += info.len();

    // FCS goes out low byte first
    let fcs = crc16_x25(&out[..pos]);
    out[pos..pos + FCS_LEN].copy_from_slice(&fcs.to_le_bytes());
    pos += FCS_LEN;

    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::fcs_valid;

    /// Minimal decoder for one address entry: (call, ssid, last).
    fn decode_address(bytes: &[u8]) -> (String, u8, bool) {
        let call: String = bytes[..CALLSIGN_LEN]
            .iter()
            .map(|&b| (b >> 1) as char)
            .collect::<String>()
            .trim_end()
            .into();
        let ssid = (bytes[CALLSIGN_LEN] >> 1) & 0x0f;
        let last = bytes[CALLSIGN_LEN] & 0x01 != 0;
        (call, ssid, last)
    }

    fn station() -> (Address, Address, [Address; 2]) {
        (
            Address::new("VU2CWN", 0).unwrap(),
            Address::new("VU3LTQ", 5).unwrap(),
            [
                Address::new("WIDE1", 1).unwrap(),
                Address::new("WIDE2", 1).unwrap(),
            ],
        )
    }

    #[test]
    fn test_end_to_end_frame_layout() {
        let (dst, src, path) = station();
        let mut buf = [0u8; 128];
        let len = encode_ui_frame(&dst, &src, &path, b">HELLO", &mut buf).unwrap();

        assert_eq!(len, 7 * 4 + 1 + 1 + 6 + 2);
        assert_eq!(buf[0], b'V' << 1);
        assert_eq!(buf[0], 0xac);
        assert_eq!(&buf[28..30], &[0x03, 0xf0]);
        assert_eq!(&buf[30..36], b">HELLO");
        assert!(fcs_valid(&buf[..len]));
    }

    #[test]
    fn test_addresses_decode_back_in_order() {
        let (dst, src, path) = station();
        let mut buf = [0u8; 128];
        let _ = encode_ui_frame(&dst, &src, &path, b">", &mut buf).unwrap();

        let expected = [("VU2CWN", 0), ("VU3LTQ", 5), ("WIDE1", 1), ("WIDE2", 1)];
        for (i, (call, ssid)) in expected.iter().enumerate() {
            let (c, s, last) = decode_address(&buf[i * 7..i * 7 + 7]);
            assert_eq!(c, *call);
            assert_eq!(s, *ssid);
            assert_eq!(last, i == expected.len() - 1);
            assert_eq!(buf[i * 7 + 6] & 0x60, 0x60);
        }
    }

    #[test]
    fn test_extension_bit_without_path() {
        let (dst, src, _) = station();
        let mut buf = [0u8; 32];
        let len = encode_ui_frame(&dst, &src, &[], b"", &mut buf).unwrap();
        assert_eq!(len, 18);
        assert_eq!(buf[6] & 0x01, 0);
        assert_eq!(buf[13] & 0x01, 1);
    }

    #[test]
    fn test_ssid_byte_encoding() {
        let a = Address::new("AB1", 15).unwrap();
        let bytes = a.encode(true);
        assert_eq!(&bytes[..6], &[b'A' << 1, b'B' << 1, b'1' << 1, 0x40, 0x40, 0x40]);
        assert_eq!(bytes[6], 0x60 | (15 << 1) | 1);
    }

    #[test]
    fn test_callsign_validation() {
        assert_eq!(
            Address::new("VU3LTQX", 0),
            Err(Ax25Error::CallsignTooLong(7))
        );
        assert_eq!(Address::new("", 0), Err(Ax25Error::EmptyCallsign));
        assert_eq!(Address::new("VU-3", 0), Err(Ax25Error::InvalidCallsign(b'-')));
        assert_eq!(Address::new("VU3LTQ", 16), Err(Ax25Error::InvalidSsid(16)));
        assert_eq!(Address::new("vu3ltq", 5).unwrap().callsign(), "VU3LTQ");
    }

    #[test]
    fn test_parse_and_display() {
        let a: Address = "wide2-1".parse().unwrap();
        assert_eq!(a.callsign(), "WIDE2");
        assert_eq!(a.ssid(), 1);
        assert_eq!(format!("{a}"), "WIDE2-1");

        let b: Address = "APRS".parse().unwrap();
        assert_eq!(format!("{b}"), "APRS");
        assert_eq!("APRS-x".parse::<Address>(), Err(Ax25Error::MalformedSsid));
    }

    #[test]
    fn test_buffer_too_small_leaves_output_untouched() {
        let (dst, src, path) = station();
        let mut buf = [0xaau8; 37];
        let result = encode_ui_frame(&dst, &src, &path, b">HELLO", &mut buf);
        assert_eq!(
            result,
            Err(Ax25Error::FrameTooLong {
                needed: 38,
                capacity: 37
            })
        );
        assert!(buf.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn test_path_limit() {
        let (dst, src, _) = station();
        let digis = [Address::new("WIDE1", 1).unwrap(); 9];
        let mut buf = [0u8; 256];
        assert_eq!(
            encode_ui_frame(&dst, &src, &digis, b"", &mut buf),
            Err(Ax25Error::PathTooLong(9))
        );
    }

    #[test]
    fn test_fcs_matches_known_vector() {
        // CQ-0 <- N0CALL-0, info "TEST"
        let dst = Address::new("CQ", 0).unwrap();
        let src = Address::new("N0CALL", 0).unwrap();
        let mut buf = [0u8; 32];
        let len = encode_ui_frame(&dst, &src, &[], b"TEST", &mut buf).unwrap();
        assert_eq!(len, 22);
        assert_eq!(
            &buf[..14],
            &[
                0x86, 0xa2, 0x40, 0x40, 0x40, 0x40, 0x60, 0x9c, 0x60, 0x86, 0x82, 0x98, 0x98, 0x61
            ]
        );
        assert_eq!(&buf[16..20], b"TEST");
        assert_eq!(&buf[20..22], &[0x6a, 0xba]);
        assert!(fcs_valid(&buf[..len]));
    }
}
