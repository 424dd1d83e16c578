use crate::fingerprint::MagnitudeMode;

pub(super) const MAX_WORKER_COUNT: u32 = 64;
/// Lowest rate that still yields a non-empty tenth-second window.
pub(super) const MIN_RESAMPLE_RATE: u32 = 10;

pub(super) fn clamp_worker_count(value: u32) -> u32 {
    value.min(MAX_WORKER_COUNT)
}

pub(super) fn default_magnitude_mode() -> MagnitudeMode {
    MagnitudeMode::HighByte
}

pub(super) fn default_worker_count() -> u32 {
    0
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_true() -> bool {
    true
}
