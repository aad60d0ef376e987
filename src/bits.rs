//! MSB-first packing and unpacking of fixed-width values.
//!
//! The writer and reader keep a cursor in bits, not bytes, so the code layer
//! never has to reason about byte boundaries. Both hold pending bits in a
//! `u64` aligned to its most significant end.
use crate::LzwError;

const MAX_WIDTH: u8 = 32;

/// Packs fixed-width values into an owned byte buffer, MSB-first.
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Pending bits, aligned to the most significant end of the word.
    buffer: u64,
    /// Number of valid bits in `buffer`, 0..=7 between calls.
    bits: u8,
}

/// Unpacks fixed-width values from a byte slice, MSB-first.
pub struct BitReader<'a> {
    inp: &'a [u8],
    buffer: u64,
    bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            bytes: Vec::new(),
            buffer: 0,
            bits: 0,
        }
    }

    /// Append the `width` least significant bits of `value`, most significant
    /// bit first.
    ///
    /// `width` must lie in `1..=32` and `value` must be representable in
    /// `width` bits, otherwise nothing is written and an error is returned.
    pub fn write_bits(&mut self, value: u32, width: u8) -> Result<(), LzwError> {
        if width < 1 || width > MAX_WIDTH {
            return Err(LzwError::InvalidWidth(width));
        }
        if width < MAX_WIDTH && value >> width != 0 {
            return Err(LzwError::ValueTooWide { value, width });
        }

        let shift = 64 - self.bits - width;
        self.buffer |= u64::from(value) << shift;
        self.bits += width;

        while self.bits >= 8 {
            self.bytes.push((self.buffer >> 56) as u8);
            self.buffer <<= 8;
            self.bits -= 8;
        }

        Ok(())
    }

    /// Pad a trailing partial byte with zero bits on the low side and return
    /// the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            // The bits below the valid ones are zero already.
            self.bytes.push((self.buffer >> 56) as u8);
        }
        self.bytes
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        BitWriter::new()
    }
}

impl<'a> BitReader<'a> {
    pub fn new(inp: &'a [u8]) -> Self {
        BitReader {
            inp,
            buffer: 0,
            bits: 0,
        }
    }

    /// Read the next `width` bits as an unsigned value, MSB-first.
    ///
    /// Returns `Ok(None)` when fewer than `width` bits remain in the source.
    /// There is no declared stream length; trailing bits shorter than one
    /// value, including any zero padding the writer appended, read as a clean
    /// end.
    pub fn read_bits(&mut self, width: u8) -> Result<Option<u32>, LzwError> {
        if width < 1 || width > MAX_WIDTH {
            return Err(LzwError::InvalidWidth(width));
        }

        if self.bits < width {
            self.refill();
        }
        if self.bits < width {
            return Ok(None);
        }

        let mask = (1u64 << width) - 1;
        let rotbuf = self.buffer.rotate_left(width.into());
        self.buffer = rotbuf & !mask;
        self.bits -= width;
        Ok(Some((rotbuf & mask) as u32))
    }

    fn refill(&mut self) {
        let wish = usize::from((64 - self.bits) / 8);
        let take = wish.min(self.inp.len());

        let mut chunk = [0u8; 8];
        chunk[..take].copy_from_slice(&self.inp[..take]);
        self.inp = &self.inp[take..];

        self.buffer |= u64::from_be_bytes(chunk) >> self.bits;
        self.bits += (take * 8) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::{BitReader, BitWriter};
    use crate::LzwError;

    #[test]
    fn packs_msb_first_across_byte_boundaries() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xabc, 12).unwrap();
        writer.write_bits(0xdef, 12).unwrap();
        assert_eq!(writer.finish(), vec![0xab, 0xcd, 0xef]);
    }

    #[test]
    fn pads_partial_byte_with_low_zeros() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xabc, 12).unwrap();
        assert_eq!(writer.finish(), vec![0xab, 0xc0]);
    }

    #[test]
    fn empty_writer_produces_no_bytes() {
        assert_eq!(BitWriter::new().finish(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_bad_widths() {
        let mut writer = BitWriter::new();
        assert_eq!(writer.write_bits(0, 0), Err(LzwError::InvalidWidth(0)));
        assert_eq!(writer.write_bits(0, 33), Err(LzwError::InvalidWidth(33)));

        let mut reader = BitReader::new(&[0xff]);
        assert_eq!(reader.read_bits(0), Err(LzwError::InvalidWidth(0)));
        assert_eq!(reader.read_bits(33), Err(LzwError::InvalidWidth(33)));
    }

    #[test]
    fn rejects_values_wider_than_requested() {
        let mut writer = BitWriter::new();
        assert_eq!(
            writer.write_bits(2, 1),
            Err(LzwError::ValueTooWide { value: 2, width: 1 })
        );
        assert_eq!(
            writer.write_bits(0x1000, 12),
            Err(LzwError::ValueTooWide {
                value: 0x1000,
                width: 12
            })
        );
        // A failed write leaves the stream untouched.
        writer.write_bits(1, 1).unwrap();
        assert_eq!(writer.finish(), vec![0x80]);
    }

    #[test]
    fn full_width_values_round_trip() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xdead_beef, 32).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xdead_beef));
        assert_eq!(reader.read_bits(1).unwrap(), None);
    }

    #[test]
    fn mixed_widths_round_trip() {
        let mut writer = BitWriter::new();
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(0x55, 7).unwrap();
        writer.write_bits(0x3ff, 10).unwrap();
        writer.write_bits(0, 3).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(1).unwrap(), Some(1));
        assert_eq!(reader.read_bits(7).unwrap(), Some(0x55));
        assert_eq!(reader.read_bits(10).unwrap(), Some(0x3ff));
        assert_eq!(reader.read_bits(3).unwrap(), Some(0));
    }

    #[test]
    fn trailing_padding_reads_as_end() {
        // 12 valid bits, then 4 bits of padding.
        let mut reader = BitReader::new(&[0xab, 0xc0]);
        assert_eq!(reader.read_bits(12).unwrap(), Some(0xabc));
        assert_eq!(reader.read_bits(12).unwrap(), None);
    }

    #[test]
    fn empty_source_reads_as_end() {
        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read_bits(1).unwrap(), None);
    }

    #[test]
    fn end_leaves_remaining_bits_available() {
        // A failed wide read must not consume the narrower tail.
        let mut reader = BitReader::new(&[0xf0]);
        assert_eq!(reader.read_bits(12).unwrap(), None);
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xf0));
    }
}
