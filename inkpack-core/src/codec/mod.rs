//! Packet codecs built on the bit stream
//!
//! ISF stores stroke packet data (x, y, pressure, ...) as arrays of signed
//! integers. The codecs here cover the non-Huffman path:
//! - [`multibyte`]: 7-bit variable-length integers for counts and tags
//! - [`DeltaDelta`]: second-order predictor that shrinks smooth sequences
//! - [`GorillaEncoder`] / [`GorillaDecoder`]: fixed-width bit packing with a
//!   one-byte algorithm header

pub mod multibyte;

mod delta;
mod gorilla;

pub use delta::DeltaDelta;
pub use gorilla::{bits_required, select_algorithm, GorillaDecoder, GorillaEncoder};

use crate::config::BITS_PER_INT;
use crate::{InkError, Result};
use serde::{Deserialize, Serialize};

/// Algorithm byte flag: packet data is Huffman coded
pub const HUFFMAN_FLAG: u8 = 0x80;
/// Algorithm byte flag: reserved, never produced
pub const RESERVED_FLAG: u8 = 0x40;
/// Algorithm byte flag: delta-delta transform applied before packing
pub const DELTA_DELTA_FLAG: u8 = 0x20;
/// Algorithm byte mask for the bit width (0 encodes 32)
pub const BIT_COUNT_MASK: u8 = 0x1F;

/// Decoded algorithm byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgoByte {
    /// Width of every packed value, 1 to 32
    pub bit_count: u8,
    /// Whether values were run through [`DeltaDelta`] first
    pub delta_delta: bool,
}

impl AlgoByte {
    /// Create an algorithm byte, validating the width
    pub fn new(bit_count: u8, delta_delta: bool) -> Result<Self> {
        if bit_count == 0 || u32::from(bit_count) > BITS_PER_INT {
            return Err(InkError::out_of_range(
                "bit_count",
                bit_count,
                1,
                u64::from(BITS_PER_INT),
            ));
        }
        Ok(Self {
            bit_count,
            delta_delta,
        })
    }

    /// Encode to the on-disk byte
    pub fn to_byte(self) -> u8 {
        let flag = if self.delta_delta { DELTA_DELTA_FLAG } else { 0 };
        flag | (self.bit_count & BIT_COUNT_MASK)
    }

    /// Decode from the on-disk byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & (HUFFMAN_FLAG | RESERVED_FLAG) != 0 {
            return Err(InkError::UnsupportedAlgorithm(byte));
        }

        let bit_count = match byte & BIT_COUNT_MASK {
            0 => BITS_PER_INT as u8,
            n => n,
        };
        Ok(Self {
            bit_count,
            delta_delta: byte & DELTA_DELTA_FLAG != 0,
        })
    }
}

/// Codec configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Try the delta-delta transform and keep it when it packs tighter
    pub delta_delta: bool,
    /// Upper bound on the packed width; wider data is rejected
    pub max_bit_count: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            delta_delta: true,
            max_bit_count: BITS_PER_INT as u8,
        }
    }
}

/// Packed packet data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedBlock {
    /// Algorithm byte followed by the packed bits
    pub data: Vec<u8>,
    /// Number of values
    pub count: usize,
    /// Algorithm used
    pub algorithm: AlgoByte,
}

impl PackedBlock {
    /// Get bytes per value
    pub fn bytes_per_value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.count as f64
    }
}
