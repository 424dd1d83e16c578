//! Pairwise derivation checks: analyse both files, consult the cache, align.

pub mod align;
pub mod cache;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{AudioDecoder, DecodeError};
use crate::fingerprint::{
    ExtractError, FileAnalysis, MagnitudeMode, TrendError, extract_magnitudes,
};

pub use align::{Alignment, Larger, align, align_pair, mismatch_threshold};
pub use cache::{CacheStats, CachedOutcome, ComparisonCache, FileKey, PairKey, PairOutcome};

/// Whole-file RMS values closer than this count as the same recording.
pub const RMS_MATCH_TOLERANCE: f64 = 1.0;

/// One `MATCH:` line.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// Offset score in seconds.
    pub score: f32,
    pub first: String,
    pub second: String,
}

impl MatchReport {
    fn new(score: f32, first: &FileKey, second: &FileKey) -> Self {
        Self {
            score,
            first: first.display_name(),
            second: second.display_name(),
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MATCH: {:.1} {} {}", self.score, self.first, self.second)
    }
}

/// Why a file could not take part in comparisons.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The decoder rejected the file.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The decoded stream was shorter than declared, or unreadable.
    #[error("Failed to extract magnitudes from {path}: {source}")]
    Extract { path: PathBuf, source: ExtractError },
    /// The sample rate is too low to encode.
    #[error("Failed to encode energy trend for {path}: {source}")]
    Trend { path: PathBuf, source: TrendError },
}

/// Compares file pairs for one run, sharing a [`ComparisonCache`].
pub struct Comparator<'a, D: AudioDecoder + ?Sized> {
    decoder: &'a D,
    cache: &'a ComparisonCache,
    mode: MagnitudeMode,
}

impl<'a, D: AudioDecoder + ?Sized> Comparator<'a, D> {
    pub fn new(decoder: &'a D, cache: &'a ComparisonCache, mode: MagnitudeMode) -> Self {
        Self {
            decoder,
            cache,
            mode,
        }
    }

    /// Cached analysis of `key`, computing it on first use.
    ///
    /// Returns `None` for files that failed; the failure is logged once.
    pub fn analysis(&self, key: &FileKey) -> Option<Arc<FileAnalysis>> {
        if let Some(analysis) = self.cache.analysis(key) {
            return Some(analysis);
        }
        if self.cache.has_failed(key) {
            return None;
        }
        match self.analyse_file(key) {
            Ok(analysis) => {
                debug!(
                    file = %key.path().display(),
                    windows = analysis.fingerprint.len(),
                    magnitudes = analysis.magnitude_count,
                    "Fingerprinted"
                );
                Some(self.cache.store_analysis(key.clone(), analysis))
            }
            Err(err) => {
                if self.cache.mark_failed(key.clone()) {
                    warn!("Skipping {}: {err}", key.path().display());
                }
                None
            }
        }
    }

    fn analyse_file(&self, key: &FileKey) -> Result<FileAnalysis, AnalysisError> {
        let stream = self.decoder.decode(key.path())?;
        let mut reader = stream.pcm.as_slice();
        let magnitudes = extract_magnitudes(&mut reader, stream.declared_len, self.mode)
            .map_err(|source| AnalysisError::Extract {
                path: key.path().to_path_buf(),
                source,
            })?;
        FileAnalysis::from_magnitudes(&magnitudes, stream.sample_rate).map_err(|source| {
            AnalysisError::Trend {
                path: key.path().to_path_buf(),
                source,
            }
        })
    }

    /// Decide whether `first` and `second` are derived from one another.
    ///
    /// `None` means no match, or that one of the files could not be analysed.
    /// Aligned matches name the longer file first; the equal-energy shortcut
    /// keeps the input order.
    pub fn compare(&self, first: &FileKey, second: &FileKey) -> Option<MatchReport> {
        let first_analysis = self.analysis(first)?;
        let second_analysis = self.analysis(second)?;

        if first_analysis.magnitude_count == second_analysis.magnitude_count
            && (first_analysis.whole_file_rms - second_analysis.whole_file_rms).abs()
                < RMS_MATCH_TOLERANCE
        {
            return Some(MatchReport::new(0.0, first, second));
        }

        let ((larger_key, larger), (smaller_key, smaller)) =
            match Larger::of(&first_analysis.fingerprint, &second_analysis.fingerprint) {
                Larger::First => ((first, &first_analysis), (second, &second_analysis)),
                Larger::Second => ((second, &second_analysis), (first, &first_analysis)),
            };
        let pair = PairKey::new(first, second);
        let score = match self.cache.lookup(&pair) {
            CachedOutcome::Match(score) => score,
            CachedOutcome::Mismatch => return None,
            CachedOutcome::Unknown => {
                match align(&larger.fingerprint, &smaller.fingerprint) {
                    Some(alignment) => {
                        let score = alignment.score_seconds();
                        self.cache.record(pair, PairOutcome::Match(score));
                        score
                    }
                    None => {
                        self.cache.record(pair, PairOutcome::Mismatch);
                        return None;
                    }
                }
            }
        };
        Some(MatchReport::new(score, larger_key, smaller_key))
    }
}
