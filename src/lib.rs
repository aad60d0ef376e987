//! # Fixed-width LZW encoder and decoder
//!
//! This crate compresses and decompresses byte streams with LZW coding at a
//! fixed code width of 12 bits. Codes are packed into the output most
//! significant bit first and the dictionary is never reset: both sides seed
//! it with the 256 single-byte entries and grow it in lockstep until it holds
//! 4096 entries, after which existing entries keep being used.
//!
//! The compressed stream carries no header. A decoder has to assume 12-bit
//! codes and the non-resetting 256-entry-seeded dictionary a priori.
//!
//! Exemplary use:
//!
//! ```
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = zwoelf::compress(data).unwrap();
//! let restored = zwoelf::decompress(&compressed).unwrap();
//! assert_eq!(&restored, data);
//! ```
//!
//! The [`container`] module packs a directory tree into a single byte blob
//! suitable for compression and unpacks it again; the codec itself treats
//! every input as an undifferentiated byte sequence.
use std::fmt;

/// The fixed width of every code on the wire, in bits.
pub(crate) const CODE_WIDTH: u8 = 12;
/// The dictionary size at which both sides stop inserting.
pub(crate) const MAX_ENTRIES: usize = 1 << CODE_WIDTH as usize;

/// Alias for a LZW code point.
pub(crate) type Code = u16;

pub mod bits;
pub mod container;
pub mod decode;
pub mod encode;

pub use crate::decode::{decompress, Decoder};
pub use crate::encode::{compress, Encoder};

/// Failure modes of the codec.
///
/// Width violations are caller bugs on the bit layer; an invalid code means
/// the compressed stream is corrupt. Either one aborts the whole operation,
/// nothing is recovered locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwError {
    /// A bit width outside the supported range `1..=32` was requested.
    InvalidWidth(u8),
    /// A value does not fit into the requested bit width.
    ValueTooWide { value: u32, width: u8 },
    /// The decoder encountered a code with no dictionary entry.
    InvalidCode(u16),
}

impl fmt::Display for LzwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LzwError::InvalidWidth(width) => {
                write!(f, "bit width {} outside the supported range 1..=32", width)
            }
            LzwError::ValueTooWide { value, width } => {
                write!(f, "value {} does not fit into {} bits", value, width)
            }
            LzwError::InvalidCode(code) => {
                write!(f, "invalid code {} in compressed stream", code)
            }
        }
    }
}

impl std::error::Error for LzwError {}
