use thiserror::Error;

use super::TrendFingerprint;

/// RMS windows per second of audio.
pub const WINDOWS_PER_SECOND: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrendError {
    /// The sample rate yields a zero-length window.
    #[error("Sample rate {sample_rate} Hz is too low for tenth-second RMS windows")]
    WindowTooSmall { sample_rate: u32 },
}

/// Magnitudes per RMS window for the given sample rate.
pub fn window_size(sample_rate: u32) -> Result<usize, TrendError> {
    match (sample_rate / WINDOWS_PER_SECOND) as usize {
        0 => Err(TrendError::WindowTooSmall { sample_rate }),
        size => Ok(size),
    }
}

/// Encode the rising/falling energy trend of non-overlapping windows.
///
/// A window is encoded only when at least one magnitude follows it, so the
/// result holds `floor((n - 1) / window)` bits for `n > 0` magnitudes. The
/// first window is compared against an implicit previous RMS of `0.0`.
pub fn encode_trend(magnitudes: &[f64], sample_rate: u32) -> Result<TrendFingerprint, TrendError> {
    let window = window_size(sample_rate)?;
    let mut bits = Vec::with_capacity(magnitudes.len().saturating_sub(1) / window);
    let mut previous = 0.0_f64;
    let mut start = 0usize;
    while start + window < magnitudes.len() {
        let current = rms(&magnitudes[start..start + window]);
        bits.push(current >= previous);
        previous = current;
        start += window;
    }
    Ok(TrendFingerprint::new(bits))
}

/// RMS of the entire magnitude sequence; `0.0` when empty.
pub fn whole_file_rms(magnitudes: &[f64]) -> f64 {
    rms(magnitudes)
}

fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|value| value * value).sum();
    (sum / values.len() as f64).sqrt()
}
