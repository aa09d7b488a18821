//! HDLC line-bit sequencing: flags, frame bits and zero-bit insertion.
//!
//! A transmission is `preamble flags ‖ frame ‖ postamble flags`, every byte
//! least-significant bit first. Inside the frame region a `0` is inserted
//! after any five consecutive `1`s (the run counter then restarts). Flag
//! bytes are sent literally and clear the run counter.
//!
//! [`BitCursor`] produces the sequence lazily, one bit per call, with a
//! bounded amount of work, so it can be driven from the sample interrupt.
//! It holds only positions; the frame bytes are passed in on each call so
//! the owner keeps the buffer.

use crate::consts::HDLC_FLAG;

/// Consecutive `1` bits after which a `0` is stuffed.
const MAX_ONES_RUN: u8 = 5;

/// Region of the transmission plan currently being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxPhase {
    /// A plan may be loaded but nothing has been sent.
    #[default]
    Idle,
    /// Sending leading flags.
    Preamble,
    /// Sending the stuffed frame bits.
    Frame,
    /// Sending trailing flags.
    Postamble,
    /// Plan exhausted or stopped.
    Done,
}

/// Position within a `preamble ‖ frame ‖ postamble` bit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    phase: TxPhase,
    preamble_flags: u16,
    postamble_flags: u16,
    byte_pos: usize,
    bit_pos: u8,
    ones_run: u8,
}

impl BitCursor {
    /// A cursor in [`TxPhase::Idle`] for the given flag counts.
    pub const fn new(preamble_flags: u16, postamble_flags: u16) -> Self {
        Self {
            phase: TxPhase::Idle,
            preamble_flags,
            postamble_flags,
            byte_pos: 0,
            bit_pos: 0,
            ones_run: 0,
        }
    }

    /// Current region.
    pub const fn phase(&self) -> TxPhase {
        self.phase
    }

    /// Rewinds to the first preamble bit.
    pub fn begin(&mut self) {
        self.enter(TxPhase::Preamble);
    }

    /// Jumps to [`TxPhase::Done`]; later calls yield nothing.
    pub fn halt(&mut self) {
        self.enter(TxPhase::Done);
    }

    /// Returns the next line bit, or `None` once the plan is exhausted.
    ///
    /// `frame` must be the same slice for the whole transmission.
    pub fn next_bit(&mut self, frame: &[u8]) -> Option<bool> {
        loop {
            match self.phase {
                TxPhase::Idle | TxPhase::Done => return None,
                TxPhase::Preamble => {
                    if self.byte_pos < usize::from(self.preamble_flags) {
                        return Some(self.flag_bit());
                    }
                    self.enter(TxPhase::Frame);
                }
                TxPhase::Frame => {
                    // Checked before the end-of-frame test so a trailing run of
                    // five ones is still stuffed ahead of the closing flag.
                    if self.ones_run == MAX_ONES_RUN {
                        self.ones_run = 0;
                        return Some(false);
                    }
                    if let Some(&byte) = frame.get(self.byte_pos) {
                        let bit = (byte >> self.bit_pos) & 1 != 0;
                        self.step();
                        self.ones_run = if bit { self.ones_run + 1 } else { 0 };
                        return Some(bit);
                    }
                    self.enter(TxPhase::Postamble);
                }
                TxPhase::Postamble => {
                    if self.byte_pos < usize::from(self.postamble_flags) {
                        return Some(self.flag_bit());
                    }
                    self.enter(TxPhase::Done);
                }
            }
        }
    }

    fn flag_bit(&mut self) -> bool {
        let bit = (HDLC_FLAG >> self.bit_pos) & 1 != 0;
        self.step();
        self.ones_run = 0;
        bit
    }

    fn step(&mut self) {
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }

    fn enter(&mut self, phase: TxPhase) {
        self.phase = phase;
        self.byte_pos = 0;
        self.bit_pos = 0;
        self.ones_run = 0;
    }
}

/// Iterator over every line bit of a framed transmission.
#[derive(Debug, Clone)]
pub struct HdlcBits<'a> {
    cursor: BitCursor,
    frame: &'a [u8],
}

impl<'a> HdlcBits<'a> {
    /// Bits for `frame` wrapped in the given number of flags.
    pub fn new(frame: &'a [u8], preamble_flags: u16, postamble_flags: u16) -> Self {
        let mut cursor = BitCursor::new(preamble_flags, postamble_flags);
        cursor.begin();
        Self { cursor, frame }
    }
}

impl Iterator for HdlcBits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.cursor.next_bit(self.frame)
    }
}

/// Total number of line bits, including stuffed zeros, for a transmission.
pub fn line_bit_count(frame: &[u8], preamble_flags: u16, postamble_flags: u16) -> usize {
    HdlcBits::new(frame, preamble_flags, postamble_flags).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(frame: &[u8], pre: u16, post: u16) -> Vec<u8> {
        HdlcBits::new(frame, pre, post).map(u8::from).collect()
    }

    const FLAG_BITS: [u8; 8] = [0, 1, 1, 1, 1, 1, 1, 0];

    #[test]
    fn test_flags_are_lsb_first_and_unstuffed() {
        let out = bits(&[], 2, 1);
        assert_eq!(out.len(), 24);
        for chunk in out.chunks(8) {
            assert_eq!(chunk, FLAG_BITS);
        }
    }

    #[test]
    fn test_frame_bits_lsb_first() {
        // 0x0B -> 1 1 0 1 0 0 0 0
        assert_eq!(bits(&[0x0b], 0, 0), [1, 1, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_six_ones_get_one_stuffed_zero() {
        // 0x3F -> 1 1 1 1 1 1 0 0
        let out = bits(&[0x3f], 0, 0);
        assert_eq!(out, [1, 1, 1, 1, 1, 0, 1, 0, 0]);
    }

    #[test]
    fn test_run_spans_bytes() {
        // 0xF0 0x01 -> 0000 1111 | 1000 0000: ones run of five across the boundary
        let out = bits(&[0xf0, 0x01], 0, 0);
        assert_eq!(out, [0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_all_ones_byte() {
        let out = bits(&[0xff, 0xff], 0, 0);
        // 16 ones -> stuffed after the 5th, 10th and 15th
        assert_eq!(out.len(), 19);
        assert_eq!(out.iter().filter(|&&b| b == 0).count(), 3);
        assert_eq!(out[5], 0);
        assert_eq!(out[11], 0);
        assert_eq!(out[17], 0);
    }

    #[test]
    fn test_trailing_run_is_stuffed_before_postamble() {
        // 0xF8 -> 0 0 0 1 1 1 1 1
        let out = bits(&[0xf8], 0, 1);
        assert_eq!(&out[..9], &[0, 0, 0, 1, 1, 1, 1, 1, 0]);
        assert_eq!(&out[9..], FLAG_BITS);
    }

    #[test]
    fn test_flag_resets_run() {
        // The preamble ends in a zero anyway; a frame that starts with five
        // ones must only be stuffed after those five.
        let out = bits(&[0x1f], 1, 0);
        assert_eq!(&out[8..], &[1, 1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_flag_pattern_inside_frame_is_broken() {
        let out = bits(&[HDLC_FLAG], 0, 0);
        assert_eq!(out, [0, 1, 1, 1, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_line_bit_count_and_halt() {
        assert_eq!(line_bit_count(&[0xff], 1, 1), 8 + 9 + 8);

        let frame = [0x00u8; 4];
        let mut cursor = BitCursor::new(1, 1);
        assert_eq!(cursor.next_bit(&frame), None);
        cursor.begin();
        assert_eq!(cursor.phase(), TxPhase::Preamble);
        for _ in 0..8 {
            assert!(cursor.next_bit(&frame).is_some());
        }
        assert_eq!(cursor.next_bit(&frame), Some(false));
        assert_eq!(cursor.phase(), TxPhase::Frame);
        cursor.halt();
        assert_eq!(cursor.phase(), TxPhase::Done);
        assert_eq!(cursor.next_bit(&frame), None);
    }
}
