//! Fixed-width packet packing
//!
//! Every value in a packet array is stored with the same two's complement
//! width, chosen as the smallest width that holds the widest value. The
//! width and the delta-delta flag travel in a leading algorithm byte.

use super::{AlgoByte, CodecConfig, DeltaDelta, PackedBlock};
use crate::bitstream::{BitStreamReader, BitStreamWriter};
use crate::config::{BITS_PER_INT, BITS_PER_LONG};
use crate::{InkError, Result};
use tracing::{debug, warn};

/// Smallest two's complement width that holds `value`
pub fn bits_required(value: i64) -> u32 {
    let magnitude = if value < 0 { !value } else { value };
    BITS_PER_LONG - magnitude.leading_zeros() + 1
}

fn max_bits_required(values: impl IntoIterator<Item = i64>) -> u32 {
    values.into_iter().map(bits_required).max().unwrap_or(1)
}

/// Pick the packing width, optionally with the delta-delta transform
pub fn select_algorithm(values: &[i32], config: &CodecConfig) -> Result<AlgoByte> {
    let raw_bits = max_bits_required(values.iter().map(|&v| i64::from(v)));
    let mut bit_count = raw_bits;
    let mut delta_delta = false;

    if config.delta_delta {
        let transformed_bits = max_bits_required(DeltaDelta::transform_all(values));
        if transformed_bits > BITS_PER_INT {
            warn!(
                "Delta-delta residuals need {} bits, packing {} values raw",
                transformed_bits,
                values.len()
            );
        } else if transformed_bits < raw_bits {
            bit_count = transformed_bits;
            delta_delta = true;
        }
    }

    debug!(
        "Selected {} bits per value (raw {}, delta-delta {}) for {} values",
        bit_count,
        raw_bits,
        delta_delta,
        values.len()
    );
    AlgoByte::new(bit_count as u8, delta_delta)
}

/// Packs signed packet data behind an algorithm byte
#[derive(Debug, Clone, Default)]
pub struct GorillaEncoder {
    config: CodecConfig,
}

impl GorillaEncoder {
    /// Create an encoder
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Compress with an automatically selected algorithm
    pub fn compress(&self, values: &[i32]) -> Result<PackedBlock> {
        let algorithm = select_algorithm(values, &self.config)?;
        self.compress_with(values, algorithm)
    }

    /// Compress with an explicit algorithm
    pub fn compress_with(&self, values: &[i32], algorithm: AlgoByte) -> Result<PackedBlock> {
        let bit_count = u32::from(algorithm.bit_count);
        if algorithm.bit_count > self.config.max_bit_count {
            return Err(InkError::out_of_range(
                "bit_count",
                bit_count,
                1,
                u64::from(self.config.max_bit_count),
            ));
        }
        let bytes = (values.len() * bit_count as usize).div_ceil(8);

        let mut data = Vec::with_capacity(1 + bytes);
        data.push(algorithm.to_byte());

        let mut writer = BitStreamWriter::new(&mut data);
        let mut predictor = DeltaDelta::new();
        for &value in values {
            let packed = if algorithm.delta_delta {
                let residual = predictor.transform(value);
                if bits_required(residual) > bit_count {
                    return Err(InkError::Overflow(format!(
                        "residual {} does not fit in {} bits",
                        residual, bit_count
                    )));
                }
                residual as u32
            } else {
                if bits_required(i64::from(value)) > bit_count {
                    return Err(InkError::Overflow(format!(
                        "value {} does not fit in {} bits",
                        value, bit_count
                    )));
                }
                value as u32
            };
            writer.write_u32(packed, bit_count)?;
        }

        debug!(
            "Packed {} values into {} bytes (algorithm {:#04x})",
            values.len(),
            data.len(),
            algorithm.to_byte()
        );

        Ok(PackedBlock {
            data,
            count: values.len(),
            algorithm,
        })
    }
}

/// Unpacks data produced by [`GorillaEncoder`]
pub struct GorillaDecoder<'a> {
    reader: BitStreamReader<'a>,
    algorithm: AlgoByte,
    count: usize,
    decoded: usize,
    predictor: DeltaDelta,
}

impl<'a> GorillaDecoder<'a> {
    /// Create a decoder for `count` values; `data` starts with the
    /// algorithm byte
    pub fn new(data: &'a [u8], count: usize) -> Result<Self> {
        let (&algo, packed) = data
            .split_first()
            .ok_or_else(|| InkError::InvalidFormat("Missing algorithm byte".into()))?;

        Ok(Self {
            reader: BitStreamReader::new(packed),
            algorithm: AlgoByte::from_byte(algo)?,
            count,
            decoded: 0,
            predictor: DeltaDelta::new(),
        })
    }

    /// Algorithm read from the header
    pub fn algorithm(&self) -> AlgoByte {
        self.algorithm
    }

    /// Decode all remaining values
    pub fn decode_all(&mut self) -> Result<Vec<i32>> {
        // The count comes from untrusted headers; size by what the bits can hold
        let bit_count = u64::from(self.algorithm.bit_count);
        let available = self.reader.remaining_bits() / bit_count;
        let pending = (self.count - self.decoded) as u64;
        let mut values = Vec::with_capacity(pending.min(available) as usize);

        while let Some(value) = self.decode_next()? {
            values.push(value);
        }

        Ok(values)
    }

    /// Decode the next value
    pub fn decode_next(&mut self) -> Result<Option<i32>> {
        if self.decoded >= self.count {
            return Ok(None);
        }

        let bit_count = u32::from(self.algorithm.bit_count);
        let raw = self.reader.read_u32(bit_count)?;
        let shift = BITS_PER_INT - bit_count;
        let signed = ((raw << shift) as i32) >> shift;

        let value = if self.algorithm.delta_delta {
            self.predictor.inverse(i64::from(signed))?
        } else {
            signed
        };
        self.decoded += 1;

        Ok(Some(value))
    }

    /// Bytes consumed so far, including the algorithm byte
    pub fn bytes_consumed(&self) -> usize {
        1 + self.reader.current_index().map_or(0, |i| i + 1)
    }
}
