//! Subcommand implementations
//!
//! File layouts:
//! - packed: `multibyte(bit length) || bits`
//! - compressed: `multibyte(value count) || algorithm byte || bits`

use anyhow::{bail, ensure, Context};
use inkpack_core::codec::{multibyte, CodecConfig, GorillaDecoder, GorillaEncoder};
use inkpack_core::{BitStreamReader, BitStreamWriter};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Values recovered from a file
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<u8>,
    pub values: Vec<T>,
}

fn check_width(width: u32) -> anyhow::Result<()> {
    ensure!((1..=32).contains(&width), "width must be between 1 and 32, got {}", width);
    Ok(())
}

/// Pack unsigned values with a fixed width
pub fn pack(values: &[u32], width: u32, reverse: bool, output: &Path) -> anyhow::Result<()> {
    check_width(width)?;
    if reverse {
        ensure!(width % 8 == 0, "reverse packing needs a width that is a multiple of 8, got {}", width);
    }

    let mut bits = Vec::new();
    let mut writer = BitStreamWriter::new(&mut bits);
    for &value in values {
        if reverse {
            writer.write_u32_reverse(value, width)?;
        } else {
            writer.write_u32(value, width)?;
        }
    }

    let mut data = Vec::with_capacity(bits.len() + 5);
    multibyte::encode(values.len() as u64 * u64::from(width), &mut data);
    data.extend_from_slice(&bits);

    fs::write(output, &data).with_context(|| format!("writing {}", output.display()))?;
    info!("Packed {} values into {} bytes", values.len(), data.len());
    Ok(())
}

/// Read back values written by [`pack`]
pub fn unpack(input: &Path, width: u32, reverse: bool) -> anyhow::Result<Report<u32>> {
    check_width(width)?;
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let (bit_length, header) = multibyte::decode(&data, 0).context("reading bit length")?;

    let mut reader = BitStreamReader::with_bit_length(&data[header..], bit_length)
        .context("bit length exceeds file size")?;

    let mut values = Vec::new();
    while reader.remaining_bits() >= u64::from(width) {
        let value = if reverse {
            reader.read_u32_reverse(width)?
        } else {
            reader.read_u32(width)?
        };
        values.push(value);
    }
    if !reader.end_of_stream() {
        bail!(
            "{} trailing bits do not form a {}-bit value",
            reader.remaining_bits(),
            width
        );
    }

    Ok(Report {
        count: values.len(),
        algorithm: None,
        values,
    })
}

/// Compress signed packet data
pub fn compress(values: &[i32], config: CodecConfig, output: &Path) -> anyhow::Result<()> {
    let block = GorillaEncoder::new(config).compress(values)?;

    let mut data = Vec::with_capacity(block.data.len() + 5);
    multibyte::encode(block.count as u64, &mut data);
    data.extend_from_slice(&block.data);

    fs::write(output, &data).with_context(|| format!("writing {}", output.display()))?;
    info!(
        "Compressed {} values to {} bytes ({} bits each, delta-delta {})",
        block.count,
        data.len(),
        block.algorithm.bit_count,
        block.algorithm.delta_delta
    );
    Ok(())
}

/// Decompress a file written by [`compress`]
pub fn decompress(input: &Path) -> anyhow::Result<Report<i32>> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let (count, header) = multibyte::decode(&data, 0).context("reading value count")?;
    let count = usize::try_from(count).context("value count too large")?;

    let mut decoder = GorillaDecoder::new(&data[header..], count)?;
    let values = decoder.decode_all()?;
    let consumed = header + decoder.bytes_consumed();
    if consumed < data.len() {
        warn!("Ignoring {} trailing bytes", data.len() - consumed);
    }

    Ok(Report {
        count: values.len(),
        algorithm: Some(decoder.algorithm().to_byte()),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pack_unpack() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.bin");

        pack(&[5, 0, 7, 3], 3, false, &path).unwrap();
        // 1 header byte + 12 bits
        assert_eq!(fs::read(&path).unwrap().len(), 3);

        let report = unpack(&path, 3, false).unwrap();
        assert_eq!(report.values, vec![5, 0, 7, 3]);
    }

    #[test]
    fn test_pack_unpack_reverse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reverse.bin");

        pack(&[0x1234, 0xBEEF], 16, true, &path).unwrap();
        let data = fs::read(&path).unwrap();
        assert_eq!(&data[1..], &[0x34, 0x12, 0xEF, 0xBE]);

        let report = unpack(&path, 16, true).unwrap();
        assert_eq!(report.values, vec![0x1234, 0xBEEF]);
    }

    #[test]
    fn test_reverse_requires_whole_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bin");
        assert!(pack(&[1], 12, true, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_unpack_with_wrong_width() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.bin");
        pack(&[1, 2, 3], 5, false, &path).unwrap();
        assert!(unpack(&path, 4, false).is_err());
    }

    #[test]
    fn test_compress_decompress() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stroke.isf");
        let stroke: Vec<i32> = (0..64).map(|i| 500 - i * 3).collect();

        compress(&stroke, CodecConfig::default(), &path).unwrap();
        let report = decompress(&path).unwrap();
        assert_eq!(report.count, 64);
        assert_eq!(report.values, stroke);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["count"], 64);
        assert!(json["algorithm"].is_u64());
    }

    #[test]
    fn test_unpack_rejects_invalid_width_on_empty_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        // Bit length 0, no payload
        fs::write(&path, [0x00]).unwrap();

        assert!(unpack(&path, 0, false).is_err());
        assert!(unpack(&path, 99, false).is_err());
        assert!(unpack(&path, 8, false).unwrap().values.is_empty());
    }

    #[test]
    fn test_decompress_with_oversized_count() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.isf");
        let mut data = Vec::new();
        multibyte::encode(u64::MAX, &mut data);
        data.extend_from_slice(&[0x08, 0x01]);
        fs::write(&path, &data).unwrap();

        let err = decompress(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<inkpack_core::InkError>(),
            Some(inkpack_core::InkError::EndOfStream)
        ));
    }

    #[test]
    fn test_decompress_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(decompress(&dir.path().join("missing.isf")).is_err());
    }
}
