//! Module for searching for bubblelevel config files

use std::path::PathBuf;

use crate::constants::CONFIG_PREFIX;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// System-wide config location, checked after the user's config directory
const SYSTEM_CONFIG_PATH: &str = "/etc/bubblelevel/config.yaml";

/// Returns the config file paths in the order they are checked.
/// E.g. ["~/.config/bubblelevel/config.yaml", "/etc/bubblelevel/config.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    match xdg::BaseDirectories::with_prefix(CONFIG_PREFIX) {
        Ok(base_dirs) => paths.push(base_dirs.get_config_home().join(CONFIG_FILE_NAME)),
        Err(e) => log::warn!("Unable to determine user config path: {e}"),
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));

    paths
}

/// Returns the first config file that exists
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking for config at {path:?}");
        path.is_file()
    })
}
