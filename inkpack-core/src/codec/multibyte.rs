//! Multi-byte variable-length integers
//!
//! Seven payload bits per byte, least significant group first. Bit 0x80 marks
//! a continuation byte. Signed values move the sign into bit 0 of the
//! magnitude before encoding.

use crate::config::BITS_PER_LONG;
use crate::{InkError, Result};

const PAYLOAD_MASK: u8 = 0x7F;
const CONTINUATION: u8 = 0x80;
const PAYLOAD_BITS: u32 = 7;

/// Append the encoding of `value` to `out`
pub fn encode(mut value: u64, out: &mut Vec<u8>) {
    while value > u64::from(PAYLOAD_MASK) {
        out.push(CONTINUATION | (value as u8 & PAYLOAD_MASK));
        value >>= PAYLOAD_BITS;
    }
    out.push(value as u8);
}

/// Append the encoding of a signed value to `out`
pub fn sign_encode(value: i64, out: &mut Vec<u8>) {
    encode(sign_fold(value), out);
}

/// Number of bytes [`encode`] emits for `value`
pub fn encoded_len(value: u64) -> usize {
    let significant = BITS_PER_LONG - value.leading_zeros();
    (significant.max(1)).div_ceil(PAYLOAD_BITS) as usize
}

/// Decode a value starting at `index`, returning it with the number of
/// bytes consumed
pub fn decode(input: &[u8], index: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (consumed, &byte) in input.get(index..).unwrap_or_default().iter().enumerate() {
        let payload = u64::from(byte & PAYLOAD_MASK);
        if shift >= BITS_PER_LONG || (payload << shift) >> shift != payload {
            return Err(InkError::Overflow(format!(
                "multi-byte value at offset {} exceeds 64 bits",
                index
            )));
        }
        value |= payload << shift;
        shift += PAYLOAD_BITS;

        if byte & CONTINUATION == 0 {
            return Ok((value, consumed + 1));
        }
    }

    Err(InkError::Truncated(format!(
        "multi-byte value at offset {} has no terminating byte",
        index
    )))
}

/// Decode a signed value starting at `index`
pub fn sign_decode(input: &[u8], index: usize) -> Result<(i64, usize)> {
    let (folded, consumed) = decode(input, index)?;
    Ok((sign_unfold(folded), consumed))
}

fn sign_fold(value: i64) -> u64 {
    (value.unsigned_abs() << 1) | u64::from(value < 0)
}

fn sign_unfold(folded: u64) -> i64 {
    let magnitude = (folded >> 1) as i64;
    if folded & 1 == 1 {
        // -0 stands in for i64::MIN, whose magnitude does not fit in 63 bits
        if magnitude == 0 {
            i64::MIN
        } else {
            -magnitude
        }
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_small_values() {
        let mut out = Vec::new();
        encode(0, &mut out);
        encode(0x7F, &mut out);
        assert_eq!(out, vec![0x00, 0x7F]);
    }

    #[test]
    fn test_encode_multi_byte() {
        let mut out = Vec::new();
        encode(300, &mut out);
        assert_eq!(out, vec![0xAC, 0x02]);
        assert_eq!(decode(&out, 0).unwrap(), (300, 2));
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            let mut out = Vec::new();
            encode(value, &mut out);
            assert_eq!(encoded_len(value), out.len(), "value {}", value);
            assert_eq!(decode(&out, 0).unwrap(), (value, out.len()));
        }
    }

    #[test]
    fn test_sign_encoding() {
        let mut out = Vec::new();
        sign_encode(-1, &mut out);
        sign_encode(1, &mut out);
        sign_encode(-64, &mut out);
        assert_eq!(out, vec![0x03, 0x02, 0x81, 0x01]);

        assert_eq!(sign_decode(&out, 0).unwrap(), (-1, 1));
        assert_eq!(sign_decode(&out, 1).unwrap(), (1, 1));
        assert_eq!(sign_decode(&out, 2).unwrap(), (-64, 2));
    }

    #[test]
    fn test_sign_extremes() {
        for value in [i64::MIN, i64::MIN + 1, i64::MAX, 0] {
            let mut out = Vec::new();
            sign_encode(value, &mut out);
            assert_eq!(sign_decode(&out, 0).unwrap().0, value);
        }
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(decode(&[0x80, 0x80], 0), Err(InkError::Truncated(_))));
        assert!(matches!(decode(&[0x01], 1), Err(InkError::Truncated(_))));
        assert!(matches!(decode(&[], 5), Err(InkError::Truncated(_))));
    }

    #[test]
    fn test_decode_overflow() {
        let mut input = vec![0xFF; 10];
        input.push(0x01);
        assert!(matches!(decode(&input, 0), Err(InkError::Overflow(_))));
    }
}
