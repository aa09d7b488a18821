//! CRC-16/X-25 frame check sequence.
//!
//! AX.25 protects every frame with the HDLC FCS: the reflected CCITT
//! polynomial (`0x8408`), register preset to `0xFFFF`, final register
//! complemented and sent low byte first.

/// Register preset for CRC-16/X-25.
pub const X25_INIT: u16 = 0xffff;

/// Register value left after running a frame *including* its FCS through
/// [`crc16_x25_update`] without the final complement.
pub const X25_RESIDUE: u16 = 0xf0b8;

/// Folds one byte into the (uncomplemented) CRC register.
pub fn crc16_x25_update(crc: u16, byte: u8) -> u16 {
    let mut d = u16::from(byte) ^ lo8(crc);
    d ^= d << 4;
    d = u16::from(d as u8);

    ((d << 8) | hi8(crc)) ^ u16::from((d >> 4) as u8) ^ (d << 3)
}

/// Computes the complemented CRC-16/X-25 of `bytes`, ready to append.
pub fn crc16_x25(bytes: &[u8]) -> u16 {
    !bytes.iter().fold(X25_INIT, |crc, &b| crc16_x25_update(crc, b))
}

/// Returns `true` if `frame` ends in a valid FCS for the bytes before it.
pub fn fcs_valid(frame: &[u8]) -> bool {
    frame.len() > 2
        && frame
            .iter()
            .fold(X25_INIT, |crc, &b| crc16_x25_update(crc, b))
            == X25_RESIDUE
}

fn lo8(x: u16) -> u16 {
    x & 0xff
}

fn hi8(x: u16) -> u16 {
    x >> 8
}
