//! Settings file handling: `config.toml` under the application directory.

mod defaults;
mod errors;
mod io;
mod types;

use crate::app_dirs;

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub use errors::ConfigError;
pub use io::{config_path, load_from, load_or_default};
pub use types::{AnalysisSettings, AppSettings, BatchSettings, LoggingSettings};

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
