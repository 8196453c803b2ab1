use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "food-directory";

pub fn get_config_directory() -> PathBuf {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    base.join(APP_DIR_NAME)
}

pub fn get_cache_directory() -> PathBuf {
    // Respect XDG_CACHE_HOME first, fallback to dirs::cache_dir()
    let base = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp")));

    base.join(APP_DIR_NAME)
}

/// Cache directory for one data root, isolated by the md5 of its path
pub fn get_data_cache_directory(data_root: &Path) -> PathBuf {
    let root_hash = format!("{:x}", md5::compute(data_root.to_string_lossy().as_bytes()));
    log::debug!("get_data_cache_directory: data_root = {data_root:?}, hash = {root_hash}");
    get_cache_directory().join(root_hash)
}
