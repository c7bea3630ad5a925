use std::path::{
    Path,
    PathBuf,
};

use crate::backend::ConfigSource;

pub const CONFIG_FILE_NAME: &str = "log4net.config";

pub const CONFIG_SUBFOLDER: &str = "Config";

pub const EMBEDDED_CONFIG: &str = include_str!("../../config/log4netEmbedManifest.config");

/// Filesystem locations checked, in order of preference.
pub fn candidate_paths(base_dir: &Path) -> [PathBuf; 2] {
    [
        base_dir.join(CONFIG_SUBFOLDER).join(CONFIG_FILE_NAME),
        base_dir.join(CONFIG_FILE_NAME),
    ]
}

pub fn locate(base_dir: &Path) -> ConfigSource {
    candidate_paths(base_dir)
        .into_iter()
        .find(|path| path.is_file())
        .map(ConfigSource::File)
        .unwrap_or(ConfigSource::Embedded(EMBEDDED_CONFIG))
}
