//! A module for all decoding needs.
use crate::bits::BitReader;
use crate::{Code, LzwError, CODE_WIDTH, MAX_ENTRIES};

/// Decompress a 12-bit LZW code stream back into the original bytes.
///
/// Fails with [`LzwError::InvalidCode`] when a code references neither an
/// existing dictionary entry nor the one entry the encoder just created.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, LzwError> {
    Decoder::new().decode(data)
}

/// An LZW decoder with a fresh dictionary.
///
/// Like the encoder, a decoder is consumed by one [`decode`] call.
///
/// [`decode`]: #method.decode
pub struct Decoder {
    table: Table,
}

/// One entry of the decode-side dictionary: the sequence of `prev` extended
/// by `byte`. Entries below 256 are the single-byte roots.
#[derive(Clone)]
struct Link {
    prev: Code,
    byte: u8,
}

/// The table of decoded codes, mirroring the encoder's insertion order.
struct Table {
    inner: Vec<Link>,
    depths: Vec<u16>,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            table: Table::new(),
        }
    }

    /// Decode the whole of `data`.
    ///
    /// The stream declares no length. Trailing bits shorter than one code,
    /// which includes the writer's zero padding, read as a clean end; a
    /// truncated stream that lost whole codes is indistinguishable from
    /// that and decodes to a shorter buffer without error.
    pub fn decode(mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut reader = BitReader::new(data);
        let mut out = Vec::new();

        let first = match reader.read_bits(CODE_WIDTH)? {
            None => return Ok(out),
            Some(code) => code as Code,
        };
        // The first code cannot reference a learned entry, there is none yet.
        if usize::from(first) >= self.table.len() {
            return Err(LzwError::InvalidCode(first));
        }

        let mut prev = first;
        let mut prev_first = self.table.reconstruct(first, &mut out);

        while let Some(code) = reader.read_bits(CODE_WIDTH)? {
            let code = code as Code;

            let first_byte = if usize::from(code) < self.table.len() {
                let first_byte = self.table.reconstruct(code, &mut out);
                if !self.table.is_full() {
                    self.table.derive(prev, first_byte);
                }
                first_byte
            } else if usize::from(code) == self.table.len() && !self.table.is_full() {
                // The entry the encoder created from `prev` and immediately
                // referenced again. Its contents are `prev` plus the first
                // byte of `prev`, so it can be materialized before lookup.
                self.table.derive(prev, prev_first);
                self.table.reconstruct(code, &mut out)
            } else {
                return Err(LzwError::InvalidCode(code));
            };

            prev = code;
            prev_first = first_byte;
        }

        Ok(out)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl Table {
    fn new() -> Self {
        let mut table = Table {
            inner: Vec::with_capacity(MAX_ENTRIES),
            depths: Vec::with_capacity(MAX_ENTRIES),
        };
        for byte in 0..=255u8 {
            table.inner.push(Link { prev: 0, byte });
            table.depths.push(1);
        }
        table
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_full(&self) -> bool {
        self.inner.len() >= MAX_ENTRIES
    }

    /// Record the sequence of `prev` extended by `byte` under the next code.
    fn derive(&mut self, prev: Code, byte: u8) {
        let depth = self.depths[usize::from(prev)] + 1;
        self.inner.push(Link { prev, byte });
        self.depths.push(depth);
    }

    /// Append the sequence of `code` to `out` and return its first byte.
    ///
    /// Links run back to front, so the reserved region is filled in reverse.
    fn reconstruct(&self, code: Code, out: &mut Vec<u8>) -> u8 {
        let depth = usize::from(self.depths[usize::from(code)]);
        let start = out.len();
        out.resize(start + depth, 0);

        let mut walk = code;
        for slot in out[start..].iter_mut().rev() {
            let entry = &self.inner[usize::from(walk)];
            *slot = entry.byte;
            walk = entry.prev;
        }
        out[start]
    }
}
