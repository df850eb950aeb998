//! inkpack Core - ISF-compatible bit-level stream codec
//!
//! Packs and unpacks sub-byte-width integers with the bit layout used by the
//! Ink Serialized Format (ISF):
//! - Most significant bit first within each byte
//! - Partial bytes left-justified, unused bits on the low-order side
//! - Variable widths replayed by the reader in the order they were written
//!
//! # Architecture
//!
//! - **Bit stream**: [`BitStreamReader`] and [`BitStreamWriter`], the
//!   width-parameterized cursors everything else is built on
//! - **Codecs**: multi-byte integers, the delta-delta predictor and the
//!   fixed-width gorilla packet codec

pub mod bitstream;
pub mod codec;

mod error;

pub use bitstream::{BitStreamReader, BitStreamWriter};
pub use error::{InkError, Result};

/// inkpack version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width constants shared by the codecs
pub mod config {
    /// Bits in a byte
    pub const BITS_PER_BYTE: u32 = 8;

    /// Bits in a 16-bit word
    pub const BITS_PER_SHORT: u32 = 16;

    /// Bits in a 32-bit word
    pub const BITS_PER_INT: u32 = 32;

    /// Bits in a 64-bit word
    pub const BITS_PER_LONG: u32 = 64;
}
