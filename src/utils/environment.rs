use std::env;
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ONEROSTER_FILTER_CONFIG";

/// Locate the filter config file
///
/// Returns the path from [`CONFIG_ENV_VAR`] when set and non-empty, otherwise
/// `<config dir>/oneroster-filter/config.toml`. The second element is true
/// when the path was chosen explicitly via the environment.
pub fn get_config_path() -> Option<(PathBuf, bool)> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }

    dirs::config_dir().map(|dir| (dir.join("oneroster-filter").join("config.toml"), false))
}
