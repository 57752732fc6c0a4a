mod company;

pub use company::{BillingSettings, Company, Config, StorageSettings};

use crate::error::{LogisticsError, Result};
use crate::store::{EntryStore, FileBlobStore};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.logistics/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "logistics") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.logistics/
    let home = dirs_home().ok_or_else(|| {
        LogisticsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".logistics"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(LogisticsError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| LogisticsError::ConfigParse { path, source: e })
}

/// Resolve the data directory; relative paths are taken from the config directory.
pub fn resolve_data_dir(config: &Config, config_dir: &Path) -> PathBuf {
    match config.storage.data_dir.as_deref() {
        Some(dir) => {
            let path = expand_path(dir);
            if path.is_absolute() {
                path
            } else {
                config_dir.join(path)
            }
        }
        None => config_dir.join("data"),
    }
}

/// Open the file-backed entry store configured for `config_dir`.
pub fn open_store(config: &Config, config_dir: &Path) -> Result<EntryStore<FileBlobStore>> {
    let backend = FileBlobStore::open(resolve_data_dir(config, config_dir))?;
    Ok(EntryStore::new(backend))
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Transport Company"
address = "123 Transport Nagar, Pune"
# gst_no = "27ABCDE1234F1Z5"   # optional, printed on bills

[billing]
currency_symbol = "₹"
tax_rate = 0.18        # GST applied to monthly bills
number_prefix = "BILL" # e.g., BILL-482913

[storage]
# data_dir = "~/.logistics/data"   # optional, defaults to <config dir>/data
"#;
