//! Bit stream reader

use super::check_width;
use crate::config::{BITS_PER_BYTE, BITS_PER_INT, BITS_PER_LONG, BITS_PER_SHORT};
use crate::{InkError, Result};

/// Reads variable-width unsigned integers from an MSB-first bit stream.
///
/// Bits left over from the most recently consumed byte are cached
/// left-justified in `partial_byte`; the remaining bit budget is tracked
/// separately so a stream can end in the middle of its last byte.
#[derive(Debug, Clone)]
pub struct BitStreamReader<'a> {
    data: &'a [u8],
    /// Next unread byte
    byte_index: usize,
    partial_byte: u8,
    bits_in_partial_byte: u32,
    remaining_bits: u64,
}

impl<'a> BitStreamReader<'a> {
    /// Create a reader over the whole buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_index: 0,
            partial_byte: 0,
            bits_in_partial_byte: 0,
            remaining_bits: data.len() as u64 * u64::from(BITS_PER_BYTE),
        }
    }

    /// Create a reader starting at `start_index`
    pub fn with_start_index(data: &'a [u8], start_index: usize) -> Result<Self> {
        if start_index >= data.len() {
            return Err(InkError::out_of_range(
                "start_index",
                start_index as u64,
                0,
                (data.len() as u64).saturating_sub(1),
            ));
        }

        let mut reader = Self::new(data);
        reader.byte_index = start_index;
        reader.remaining_bits = (data.len() - start_index) as u64 * u64::from(BITS_PER_BYTE);
        Ok(reader)
    }

    /// Create a reader limited to the first `length_in_bits` bits
    pub fn with_bit_length(data: &'a [u8], length_in_bits: u64) -> Result<Self> {
        let available = data.len() as u64 * u64::from(BITS_PER_BYTE);
        if length_in_bits > available {
            return Err(InkError::out_of_range(
                "length_in_bits",
                length_in_bits,
                0,
                available,
            ));
        }

        let mut reader = Self::new(data);
        reader.remaining_bits = length_in_bits;
        Ok(reader)
    }

    /// Read up to 64 bits, most significant chunk first
    pub fn read_u64(&mut self, count_of_bits: u32) -> Result<u64> {
        check_width(count_of_bits, BITS_PER_LONG)?;

        let mut value = 0u64;
        let mut remaining = count_of_bits;
        while remaining > 0 {
            let bits = remaining.min(BITS_PER_BYTE);
            value <<= bits;
            value |= u64::from(self.read_byte(bits)?);
            remaining -= bits;
        }
        Ok(value)
    }

    /// Read up to 16 bits, most significant chunk first
    pub fn read_u16(&mut self, count_of_bits: u32) -> Result<u16> {
        check_width(count_of_bits, BITS_PER_SHORT)?;

        let mut value = 0u16;
        let mut remaining = count_of_bits;
        while remaining > 0 {
            let bits = remaining.min(BITS_PER_BYTE);
            value <<= bits;
            value |= u16::from(self.read_byte(bits)?);
            remaining -= bits;
        }
        Ok(value)
    }

    /// Read up to 16 bits, least significant chunk first
    pub fn read_u16_reverse(&mut self, count_of_bits: u32) -> Result<u16> {
        check_width(count_of_bits, BITS_PER_SHORT)?;

        let mut value = 0u16;
        let mut full_bytes_read = 0;
        let mut remaining = count_of_bits;
        while remaining > 0 {
            let bits = remaining.min(BITS_PER_BYTE);
            let chunk = u16::from(self.read_byte(bits)?);
            value |= chunk << (full_bytes_read * BITS_PER_BYTE);
            full_bytes_read += 1;
            remaining -= bits;
        }
        Ok(value)
    }

    /// Read up to 32 bits, most significant chunk first
    pub fn read_u32(&mut self, count_of_bits: u32) -> Result<u32> {
        check_width(count_of_bits, BITS_PER_INT)?;

        let mut value = 0u32;
        let mut remaining = count_of_bits;
        while remaining > 0 {
            let bits = remaining.min(BITS_PER_BYTE);
            value <<= bits;
            value |= u32::from(self.read_byte(bits)?);
            remaining -= bits;
        }
        Ok(value)
    }

    /// Read up to 32 bits, least significant chunk first
    pub fn read_u32_reverse(&mut self, count_of_bits: u32) -> Result<u32> {
        check_width(count_of_bits, BITS_PER_INT)?;

        let mut value = 0u32;
        let mut full_bytes_read = 0;
        let mut remaining = count_of_bits;
        while remaining > 0 {
            let bits = remaining.min(BITS_PER_BYTE);
            let chunk = u32::from(self.read_byte(bits)?);
            value |= chunk << (full_bytes_read * BITS_PER_BYTE);
            full_bytes_read += 1;
            remaining -= bits;
        }
        Ok(value)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_byte(1)? & 1 == 1)
    }

    /// Read 1 to 8 bits, right-aligned in the returned byte
    pub fn read_byte(&mut self, count_of_bits: u32) -> Result<u8> {
        if self.end_of_stream() {
            return Err(InkError::EndOfStream);
        }
        check_width(count_of_bits, BITS_PER_BYTE)?;
        if u64::from(count_of_bits) > self.remaining_bits {
            return Err(InkError::out_of_range(
                "count_of_bits",
                count_of_bits,
                1,
                self.remaining_bits,
            ));
        }

        let needed_from_next = count_of_bits.saturating_sub(self.bits_in_partial_byte);
        if needed_from_next > 0 && self.byte_index >= self.data.len() {
            return Err(InkError::EndOfStream);
        }

        self.remaining_bits -= u64::from(count_of_bits);

        // Top `count_of_bits` of the cache; any bits it lacks are zero and
        // get filled from the next byte below.
        let mut value = self.partial_byte >> (BITS_PER_BYTE - count_of_bits);

        if needed_from_next == 0 {
            self.partial_byte = shl_u8(self.partial_byte, count_of_bits);
            self.bits_in_partial_byte -= count_of_bits;
        } else {
            let next_byte = self.data[self.byte_index];
            self.byte_index += 1;

            value |= next_byte >> (BITS_PER_BYTE - needed_from_next);
            self.partial_byte = shl_u8(next_byte, needed_from_next);
            self.bits_in_partial_byte = BITS_PER_BYTE - needed_from_next;
        }

        Ok(value)
    }

    /// Whether the bit budget is exhausted
    #[inline]
    pub fn end_of_stream(&self) -> bool {
        self.remaining_bits == 0
    }

    /// Index of the most recently consumed byte
    pub fn current_index(&self) -> Option<usize> {
        self.byte_index.checked_sub(1)
    }

    /// Bits left in the budget
    pub fn remaining_bits(&self) -> u64 {
        self.remaining_bits
    }
}

/// Left shift with 8-bit truncation; shifting by 8 clears the byte
#[inline]
fn shl_u8(byte: u8, bits: u32) -> u8 {
    byte.checked_shl(bits).unwrap_or(0)
}
