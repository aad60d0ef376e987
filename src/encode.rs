//! A module for all encoding needs.
use crate::bits::BitWriter;
use crate::{Code, LzwError, CODE_WIDTH, MAX_ENTRIES};

use std::collections::HashMap;

/// Compress a byte buffer into a 12-bit LZW code stream.
///
/// Succeeds for every input; empty input yields an empty output.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, LzwError> {
    Encoder::new().encode(data)
}

/// An LZW encoder with a fresh dictionary.
///
/// The dictionary is scoped to one [`encode`] call, so an encoder is
/// consumed by use. Create a new one per buffer.
///
/// [`encode`]: #method.encode
pub struct Encoder {
    table: Table,
}

/// The encode-side dictionary.
///
/// Conceptually this maps byte sequences to codes, seeded with the 256
/// single-byte entries. Since every inserted sequence extends a known one by
/// a single byte, it is keyed by `(code of prefix, next byte)` instead; the
/// singleton entries are implicit in the code space `0..=255`.
struct Table {
    map: HashMap<(Code, u8), Code>,
    next_code: Code,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            table: Table::new(),
        }
    }

    /// Encode the whole of `data`, returning the packed code stream.
    ///
    /// Emits one code per longest dictionary match and keeps encoding after
    /// the dictionary saturates; saturation only stops insertions.
    pub fn encode(mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut writer = BitWriter::new();
        // Code of the longest sequence matched so far, `None` while empty.
        let mut current: Option<Code> = None;

        for &byte in data {
            current = Some(match current {
                None => Code::from(byte),
                Some(code) => match self.table.extend(code, byte) {
                    Some(longer) => longer,
                    None => {
                        writer.write_bits(code.into(), CODE_WIDTH)?;
                        Code::from(byte)
                    }
                },
            });
        }

        if let Some(code) = current {
            writer.write_bits(code.into(), CODE_WIDTH)?;
        }

        Ok(writer.finish())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl Table {
    fn new() -> Self {
        Table {
            map: HashMap::new(),
            next_code: 256,
        }
    }

    /// Look up the sequence of `code` extended by `byte`.
    ///
    /// On a miss the extended sequence is recorded under the next free code,
    /// unless the table is saturated, and `None` is returned. The decoder
    /// derives the identical entry from the emitted code alone.
    fn extend(&mut self, code: Code, byte: u8) -> Option<Code> {
        if let Some(&longer) = self.map.get(&(code, byte)) {
            return Some(longer);
        }
        if usize::from(self.next_code) < MAX_ENTRIES {
            self.map.insert((code, byte), self.next_code);
            self.next_code += 1;
        }
        None
    }
}
