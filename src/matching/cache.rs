//! Batch-scoped memo of per-file analyses and pairwise outcomes.
//!
//! One [`ComparisonCache`] lives for one comparison run. It never evicts and
//! is never written to disk. All maps sit behind mutexes so workers can share
//! it; analyses are computed outside the locks and a racing insert simply
//! replaces an identical value.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fingerprint::FileAnalysis;

/// Cache identity of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey(PathBuf);

impl FileKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name used in reports, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

/// Unordered pair of files: `(a, b)` and `(b, a)` build the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    low: FileKey,
    high: FileKey,
}

impl PairKey {
    pub fn new(a: &FileKey, b: &FileKey) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.clone(),
            high: high.clone(),
        }
    }
}

/// Outcome recorded for a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// Offset score in seconds.
    Match(f32),
    /// Recorded only to skip recomputation; carries no confidence.
    Mismatch,
}

/// Result of a pair lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedOutcome {
    Match(f32),
    Mismatch,
    Unknown,
}

/// Entry counts, for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub analysed_files: usize,
    pub failed_files: usize,
    pub matches: usize,
    pub mismatches: usize,
}

#[derive(Debug, Default)]
pub struct ComparisonCache {
    analyses: Mutex<HashMap<FileKey, Arc<FileAnalysis>>>,
    failed: Mutex<HashSet<FileKey>>,
    outcomes: Mutex<HashMap<PairKey, PairOutcome>>,
}

impl ComparisonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analysis(&self, key: &FileKey) -> Option<Arc<FileAnalysis>> {
        lock(&self.analyses).get(key).cloned()
    }

    /// Store a fresh analysis and return the shared handle.
    pub fn store_analysis(&self, key: FileKey, analysis: FileAnalysis) -> Arc<FileAnalysis> {
        let analysis = Arc::new(analysis);
        lock(&self.analyses).insert(key, Arc::clone(&analysis));
        analysis
    }

    /// Remember that a file could not be analysed. Returns `true` the first time.
    pub fn mark_failed(&self, key: FileKey) -> bool {
        lock(&self.failed).insert(key)
    }

    pub fn has_failed(&self, key: &FileKey) -> bool {
        lock(&self.failed).contains(key)
    }

    pub fn lookup(&self, pair: &PairKey) -> CachedOutcome {
        match lock(&self.outcomes).get(pair) {
            Some(PairOutcome::Match(score)) => CachedOutcome::Match(*score),
            Some(PairOutcome::Mismatch) => CachedOutcome::Mismatch,
            None => CachedOutcome::Unknown,
        }
    }

    /// Record an outcome. The first recorded outcome for a pair wins.
    pub fn record(&self, pair: PairKey, outcome: PairOutcome) {
        lock(&self.outcomes).entry(pair).or_insert(outcome);
    }

    pub fn stats(&self) -> CacheStats {
        let outcomes = lock(&self.outcomes);
        let matches = outcomes
            .values()
            .filter(|outcome| matches!(outcome, PairOutcome::Match(_)))
            .count();
        CacheStats {
            analysed_files: lock(&self.analyses).len(),
            failed_files: lock(&self.failed).len(),
            matches,
            mismatches: outcomes.len() - matches,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
