use serde::{Deserialize, Serialize};

use super::defaults::{
    MIN_RESAMPLE_RATE, clamp_worker_count, default_log_level, default_magnitude_mode,
    default_true, default_worker_count,
};
use crate::fingerprint::MagnitudeMode;

/// Settings stored in `config.toml`. Every field has a default, so a partial
/// or empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Clamp or drop values that the pipeline cannot use.
    pub fn normalized(mut self) -> Self {
        self.batch.worker_count = clamp_worker_count(self.batch.worker_count);
        self.analysis.resample_to = self
            .analysis
            .resample_to
            .filter(|rate| *rate >= MIN_RESAMPLE_RATE);
        let level = self.logging.level.trim().to_ascii_lowercase();
        self.logging.level = if level.is_empty() {
            default_log_level()
        } else {
            level
        };
        self
    }
}

/// How files are turned into fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_magnitude_mode")]
    pub magnitude_mode: MagnitudeMode,
    /// Resample decoded audio to this rate before fingerprinting.
    #[serde(default)]
    pub resample_to: Option<u32>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            magnitude_mode: default_magnitude_mode(),
            resample_to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Comparison worker count override (0 = auto).
    #[serde(default = "default_worker_count")]
    pub worker_count: u32,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write a per-launch log file under the application directory.
    #[serde(default = "default_true")]
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: default_true(),
        }
    }
}
