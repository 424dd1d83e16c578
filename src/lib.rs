//! Library exports for the command-line tool, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Comparison runs over two path specs.
pub mod batch;
/// `config.toml` settings.
pub mod config;
/// Audio decoding into mono 16-bit PCM.
pub mod decode;
/// Magnitudes, energy trends and per-file analyses.
pub mod fingerprint;
/// Tracing subscriber setup.
pub mod logging;
/// Fuzzy alignment, pair cache and the comparator.
pub mod matching;
