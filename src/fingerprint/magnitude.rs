use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes consumed per magnitude value.
pub const PCM_UNIT_BYTES: usize = 2;

/// Keeps `FullSample` magnitudes on the same scale as `HighByte` ones.
const FULL_SAMPLE_SCALE: f64 = 256.0;

/// How a 2-byte PCM unit is turned into a magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeMode {
    /// Second byte of the unit as a signed scalar. The alignment tolerances
    /// were tuned against this signal shape.
    #[default]
    HighByte,
    /// Whole little-endian `i16` sample divided by 256.
    FullSample,
}

/// Errors raised while pulling PCM bytes for magnitude extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The stream ended before the declared length.
    #[error("PCM stream ended after {available} of {expected} declared bytes")]
    ReadExhausted { expected: usize, available: usize },
    /// Any other read failure.
    #[error("Failed to read PCM stream: {0}")]
    Io(#[from] io::Error),
}

/// Read exactly `declared_len` bytes and convert them to magnitudes.
///
/// Never pads a short stream: fewer bytes than declared is
/// [`ExtractError::ReadExhausted`]. Memory grows with the bytes actually
/// read, not with `declared_len`.
pub fn extract_magnitudes<R: Read>(
    reader: &mut R,
    declared_len: usize,
    mode: MagnitudeMode,
) -> Result<Vec<f64>, ExtractError> {
    let mut buf = Vec::new();
    reader.by_ref().take(declared_len as u64).read_to_end(&mut buf)?;
    if buf.len() < declared_len {
        return Err(ExtractError::ReadExhausted {
            expected: declared_len,
            available: buf.len(),
        });
    }
    Ok(magnitudes_from_pcm(&buf, mode))
}

/// One magnitude per 2-byte unit; a trailing odd byte is ignored.
pub fn magnitudes_from_pcm(pcm: &[u8], mode: MagnitudeMode) -> Vec<f64> {
    pcm.chunks_exact(PCM_UNIT_BYTES)
        .map(|unit| {
            let value = match mode {
                MagnitudeMode::HighByte => f64::from(unit[1] as i8),
                MagnitudeMode::FullSample => {
                    f64::from(i16::from_le_bytes([unit[0], unit[1]])) / FULL_SAMPLE_SCALE
                }
            };
            single_point_magnitude(value)
        })
        .collect()
}

/// Magnitude of the one-point DFT of `value`.
///
/// `X[0] = x[0]` with a zero imaginary part, so this is `|value|`.
fn single_point_magnitude(value: f64) -> f64 {
    let (re, im) = (value, 0.0_f64);
    re.hypot(im)
}
