//! Settings discovery through `SONOMATCH_CONFIG_HOME`.

mod support;

use sonomatch::config::{self, AppSettings};
use sonomatch::fingerprint::MagnitudeMode;
use support::sonomatch_env::SonomatchEnvGuard;

#[test]
fn missing_settings_file_yields_defaults() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = SonomatchEnvGuard::set_config_home(temp.path().to_path_buf());
    assert_eq!(config::load_or_default().unwrap(), AppSettings::default());
    assert_eq!(
        config::config_path().unwrap(),
        temp.path().join(".sonomatch").join("config.toml")
    );
}

#[test]
fn settings_file_in_app_dir_is_loaded() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = SonomatchEnvGuard::set_config_home(temp.path().to_path_buf());
    let app_dir = temp.path().join(".sonomatch");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(
        app_dir.join("config.toml"),
        "[analysis]\nmagnitude_mode = \"full_sample\"\nresample_to = 11025\n\n[logging]\nfile_logging = false\n",
    )
    .unwrap();

    let settings = config::load_or_default().unwrap();
    assert_eq!(settings.analysis.magnitude_mode, MagnitudeMode::FullSample);
    assert_eq!(settings.analysis.resample_to, Some(11_025));
    assert!(!settings.logging.file_logging);
    assert_eq!(settings.batch.worker_count, 0);
}
