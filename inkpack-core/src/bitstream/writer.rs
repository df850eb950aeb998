//! Bit stream writer

use super::{check_width, chunk_count};
use crate::config::{BITS_PER_BYTE, BITS_PER_INT};
use crate::Result;

/// Appends variable-width unsigned integers to a caller-owned buffer,
/// MSB-first.
///
/// The writer only ever appends bytes or fills the free low-order bits of
/// the buffer's last byte. It starts with no free bits, so existing buffer
/// content is never touched.
#[derive(Debug)]
pub struct BitStreamWriter<'a> {
    buffer: &'a mut Vec<u8>,
    /// Free low-order bits in the last byte of `buffer`
    remaining: u32,
}

impl<'a> BitStreamWriter<'a> {
    /// Create a writer appending to `buffer`
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self {
            buffer,
            remaining: 0,
        }
    }

    /// Write the low `count_of_bits` (1 to 32) of `bits`, most significant
    /// chunk first
    pub fn write_u32(&mut self, bits: u32, count_of_bits: u32) -> Result<()> {
        check_width(count_of_bits, BITS_PER_INT)?;

        // Leading chunk carries the bits past the last byte boundary
        let mut chunk_bits = match count_of_bits % BITS_PER_BYTE {
            0 => BITS_PER_BYTE,
            partial => partial,
        };
        for chunk in (0..chunk_count(count_of_bits)).rev() {
            let byte = (bits >> (chunk * BITS_PER_BYTE)) as u8;
            self.write(byte, chunk_bits)?;
            chunk_bits = BITS_PER_BYTE;
        }
        Ok(())
    }

    /// Write the low `count_of_bits` (1 to 32) of `bits`, least significant
    /// byte first.
    ///
    /// Every chunk is written as a full byte, so a width that is not a
    /// multiple of 8 is padded up to the next byte.
    pub fn write_u32_reverse(&mut self, bits: u32, count_of_bits: u32) -> Result<()> {
        check_width(count_of_bits, BITS_PER_INT)?;

        for chunk in 0..chunk_count(count_of_bits) {
            let byte = (bits >> (chunk * BITS_PER_BYTE)) as u8;
            self.write(byte, BITS_PER_BYTE)?;
        }
        Ok(())
    }

    /// Write the low `count_of_bits` (1 to 8) of `bits`
    pub fn write(&mut self, bits: u8, count_of_bits: u32) -> Result<()> {
        check_width(count_of_bits, BITS_PER_BYTE)?;

        let masked = bits & (0xFF >> (BITS_PER_BYTE - count_of_bits));

        if self.remaining > 0 {
            if let Some(last) = self.buffer.last_mut() {
                if count_of_bits > self.remaining {
                    *last |= masked >> (count_of_bits - self.remaining);
                } else {
                    *last |= masked << (self.remaining - count_of_bits);
                }
            }
        }

        if count_of_bits > self.remaining {
            // Overflow seeds a new byte, left-justified
            self.remaining = BITS_PER_BYTE - (count_of_bits - self.remaining);
            self.buffer.push(masked.checked_shl(self.remaining).unwrap_or(0));
        } else {
            self.remaining -= count_of_bits;
        }
        Ok(())
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write(u8::from(bit), 1)
    }

    /// Free bits left in the last byte
    pub fn remaining_bits(&self) -> u32 {
        self.remaining
    }

    /// Bytes in the underlying buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
