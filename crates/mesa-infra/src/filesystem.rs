//! Data-directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MESA_DATA_DIR";

/// Resolve the Mesa data directory.
///
/// Priority: `MESA_DATA_DIR`, then `~/.mesa`, then `./.mesa`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mesa");
    }

    PathBuf::from(".mesa")
}
