//! Bit-level I/O in ISF layout
//!
//! The reader and writer are independent cursors but are exact inverses:
//! bits laid down by a sequence of [`BitStreamWriter`] calls come back from
//! the matching [`BitStreamReader`] calls when the same widths are replayed
//! in the same order.

mod reader;
mod writer;

pub use reader::BitStreamReader;
pub use writer::BitStreamWriter;

use crate::{InkError, Result};

/// Validate a bit width against `1..=max`
#[inline]
pub(crate) fn check_width(count_of_bits: u32, max: u32) -> Result<()> {
    if count_of_bits == 0 || count_of_bits > max {
        return Err(InkError::out_of_range(
            "count_of_bits",
            count_of_bits,
            1,
            u64::from(max),
        ));
    }
    Ok(())
}

/// Number of byte-sized chunks a value of `count_of_bits` spans
#[inline]
pub(crate) fn chunk_count(count_of_bits: u32) -> u32 {
    count_of_bits.div_ceil(crate::config::BITS_PER_BYTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(8), 1);
        assert_eq!(chunk_count(9), 2);
        assert_eq!(chunk_count(32), 4);
    }

    #[test]
    fn test_check_width() {
        assert!(check_width(1, 8).is_ok());
        assert!(check_width(8, 8).is_ok());
        assert!(matches!(check_width(0, 8), Err(InkError::OutOfRange { .. })));
        assert!(matches!(check_width(9, 8), Err(InkError::OutOfRange { .. })));
    }

    fn mask(width: u32) -> u32 {
        if width == 32 {
            u32::MAX
        } else {
            (1u32 << width) - 1
        }
    }

    #[test]
    fn test_random_mixed_width_roundtrip() {
        let mut rng = StdRng::seed_from_u64(0x15F);
        let fields: Vec<(u32, u32)> = (0..2000)
            .map(|_| {
                let width = rng.gen_range(1..=32);
                (rng.gen::<u32>() & mask(width), width)
            })
            .collect();

        let mut buffer = Vec::new();
        let mut writer = BitStreamWriter::new(&mut buffer);
        for &(value, width) in &fields {
            writer.write_u32(value, width).unwrap();
        }

        let total_bits: u32 = fields.iter().map(|&(_, w)| w).sum();
        assert_eq!(buffer.len() as u32, total_bits.div_ceil(8));

        let mut reader = BitStreamReader::with_bit_length(&buffer, u64::from(total_bits)).unwrap();
        for (i, &(value, width)) in fields.iter().enumerate() {
            assert_eq!(reader.read_u32(width).unwrap(), value, "field {} width {}", i, width);
        }
        assert!(reader.end_of_stream());
    }

    #[test]
    fn test_random_byte_width_roundtrip() {
        let mut rng = StdRng::seed_from_u64(7);
        let fields: Vec<(u8, u32)> = (0..1000)
            .map(|_| {
                let width = rng.gen_range(1..=8);
                (rng.gen::<u8>() & (mask(width) as u8), width)
            })
            .collect();

        let mut buffer = Vec::new();
        let mut writer = BitStreamWriter::new(&mut buffer);
        for &(value, width) in &fields {
            writer.write(value, width).unwrap();
        }

        let mut reader = BitStreamReader::new(&buffer);
        for &(value, width) in &fields {
            assert_eq!(reader.read_byte(width).unwrap(), value);
        }
    }

    #[test]
    fn test_u16_and_u64_readers_follow_writer() {
        let mut buffer = Vec::new();
        let mut writer = BitStreamWriter::new(&mut buffer);
        writer.write_u32(0x1ABC, 13).unwrap();
        writer.write_u32(0xDEAD_BEEF, 32).unwrap();
        writer.write_u32(0x0123_4567, 32).unwrap();
        writer.write_u32(0x3, 3).unwrap();

        let mut reader = BitStreamReader::new(&buffer);
        assert_eq!(reader.read_u16(13).unwrap(), 0x1ABC);
        assert_eq!(reader.read_u64(64).unwrap(), 0xDEAD_BEEF_0123_4567);
        assert_eq!(reader.read_u16(3).unwrap(), 0x3);
    }

    #[test]
    fn test_reverse_roundtrip_whole_bytes() {
        let mut buffer = Vec::new();
        let mut writer = BitStreamWriter::new(&mut buffer);
        writer.write(0b1, 1).unwrap();
        writer.write_u32_reverse(0xBEEF, 16).unwrap();
        writer.write_u32_reverse(0x1234_5678, 32).unwrap();
        writer.write_u32_reverse(0xAB_CDEF, 24).unwrap();

        let mut reader = BitStreamReader::new(&buffer);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_u16_reverse(16).unwrap(), 0xBEEF);
        assert_eq!(reader.read_u32_reverse(32).unwrap(), 0x1234_5678);
        assert_eq!(reader.read_u32_reverse(24).unwrap(), 0xAB_CDEF);
    }

    #[test]
    fn test_reverse_partial_width_is_asymmetric() {
        // The writer pads a 12-bit reverse write to two full bytes while the
        // reader consumes 8 + 4 bits, so the values do not line up.
        let mut buffer = Vec::new();
        let mut writer = BitStreamWriter::new(&mut buffer);
        writer.write_u32_reverse(0xABC, 12).unwrap();
        assert_eq!(buffer, vec![0xBC, 0x0A]);

        let mut reader = BitStreamReader::new(&buffer);
        assert_eq!(reader.read_u16_reverse(12).unwrap(), 0x0BC);
        assert_eq!(reader.remaining_bits(), 4);
    }
}
