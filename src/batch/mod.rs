//! Comparison runs: cross every file of one path spec with every file of the
//! other and collect the match reports in pair order.

pub mod pathspec;

use std::collections::VecDeque;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{info, warn};

use crate::decode::AudioDecoder;
use crate::fingerprint::MagnitudeMode;
use crate::matching::{CacheStats, Comparator, ComparisonCache, FileKey, MatchReport};

pub use pathspec::{PathSpec, PathSpecError};

/// Knobs for one comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; 0 picks the available parallelism.
    pub worker_count: u32,
    pub magnitude_mode: MagnitudeMode,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub pairs: usize,
    /// Reports in the order their pairs were enumerated.
    pub reports: Vec<MatchReport>,
    pub stats: CacheStats,
}

/// Every `(a, b)` with `a` from `first` and `b` from `second`, `first`-major.
pub fn enumerate_pairs(first: &[FileKey], second: &[FileKey]) -> Vec<(FileKey, FileKey)> {
    first
        .iter()
        .flat_map(|a| second.iter().map(move |b| (a.clone(), b.clone())))
        .collect()
}

/// Compare every pair on a scoped worker pool sharing one cache.
pub fn run_batch<D: AudioDecoder + ?Sized>(
    decoder: &D,
    pairs: Vec<(FileKey, FileKey)>,
    options: &BatchOptions,
) -> BatchOutcome {
    let started = Instant::now();
    let pair_count = pairs.len();
    let cache = ComparisonCache::new();
    let comparator = Comparator::new(decoder, &cache, options.magnitude_mode);
    let worker_count = resolve_worker_count(options.worker_count, pair_count);

    let queue = Arc::new(Mutex::new(
        pairs.into_iter().enumerate().collect::<VecDeque<_>>(),
    ));
    let (tx, rx) = channel();

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let comparator = &comparator;
            scope.spawn(move || {
                loop {
                    let next = match queue.lock() {
                        Ok(mut guard) => guard.pop_front(),
                        Err(_) => return,
                    };
                    let Some((index, (first, second))) = next else {
                        break;
                    };
                    if let Some(report) = comparator.compare(&first, &second) {
                        let _ = tx.send((index, report));
                    }
                }
            });
        }
        drop(tx);
    });

    let mut indexed: Vec<(usize, MatchReport)> = rx.into_iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    let reports: Vec<MatchReport> = indexed.into_iter().map(|(_, report)| report).collect();

    let stats = cache.stats();
    if stats.failed_files > 0 {
        warn!("{} file(s) could not be analysed", stats.failed_files);
    }
    info!(
        pairs = pair_count,
        matches = reports.len(),
        analysed = stats.analysed_files,
        workers = worker_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Comparison run finished"
    );
    BatchOutcome {
        pairs: pair_count,
        reports,
        stats,
    }
}

fn resolve_worker_count(override_count: u32, pair_count: usize) -> usize {
    let wanted = if override_count >= 1 {
        override_count as usize
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    };
    wanted.min(pair_count).max(1)
}
