//! Energy-trend fingerprints built from canonical 16-bit PCM.
//!
//! A fingerprint is one bit per tenth of a second of audio: `true` when the
//! window's RMS energy is at least the previous window's, `false` when it fell.

mod magnitude;
mod trend;

use std::fmt;

pub use magnitude::{ExtractError, MagnitudeMode, PCM_UNIT_BYTES, extract_magnitudes, magnitudes_from_pcm};
pub use trend::{TrendError, WINDOWS_PER_SECOND, encode_trend, whole_file_rms, window_size};

/// Per-window energy trend of one file. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendFingerprint {
    bits: Vec<bool>,
}

impl TrendFingerprint {
    /// Wrap an already-encoded trend sequence.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// Renders as a `t`/`f` string, e.g. `tftttf`.
impl fmt::Display for TrendFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "t" } else { "f" })?;
        }
        Ok(())
    }
}

/// Everything the comparator needs to know about one decoded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    /// Number of magnitude values the file produced.
    pub magnitude_count: usize,
    /// RMS over the whole magnitude sequence, used by the equal-length fast path.
    pub whole_file_rms: f64,
    pub fingerprint: TrendFingerprint,
}

impl FileAnalysis {
    /// Encode a magnitude sequence. The magnitudes are not retained.
    pub fn from_magnitudes(magnitudes: &[f64], sample_rate: u32) -> Result<Self, TrendError> {
        let fingerprint = encode_trend(magnitudes, sample_rate)?;
        Ok(Self {
            magnitude_count: magnitudes.len(),
            whole_file_rms: whole_file_rms(magnitudes),
            fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_t_and_f() {
        let fingerprint = TrendFingerprint::new(vec![true, false, true, true]);
        assert_eq!(fingerprint.to_string(), "tftt");
    }

    #[test]
    fn analysis_keeps_counts_and_rms() {
        let magnitudes = vec![3.0_f64; 25];
        let analysis = FileAnalysis::from_magnitudes(&magnitudes, 100).unwrap();
        assert_eq!(analysis.magnitude_count, 25);
        assert!((analysis.whole_file_rms - 3.0).abs() < 1e-12);
        // window = 10, floor((25 - 1) / 10) = 2 windows
        assert_eq!(analysis.fingerprint.len(), 2);
    }

    #[test]
    fn analysis_is_deterministic() {
        let magnitudes: Vec<f64> = (0..5_000).map(|i| ((i * 37) % 101) as f64).collect();
        let first = FileAnalysis::from_magnitudes(&magnitudes, 8_000).unwrap();
        let second = FileAnalysis::from_magnitudes(&magnitudes, 8_000).unwrap();
        assert_eq!(first, second);
    }
}
