use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u64 = 1;

/// Name of the group a fresh board starts with.
pub const DEFAULT_GROUP: &str = "기본";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("memoboard")
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_title_max_chars() -> usize {
    30
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub version: u64,
    pub data_directory: PathBuf,
    pub default_group: String,
    /// Derived titles are cut to this many characters.
    pub title_max_chars: usize,
    pub debug_logging: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_directory: default_data_dir(),
            default_group: default_group(),
            title_max_chars: default_title_max_chars(),
            debug_logging: false,
        }
    }
}

impl BoardConfig {
    /// `~/.config/memoboard/config.json` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("memoboard")
            .join("config.json")
    }

    /// Load the config, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(mut config) => {
                if config.default_group.trim().is_empty() {
                    config.default_group = default_group();
                }
                if config.title_max_chars == 0 {
                    config.title_max_chars = default_title_max_chars();
                }
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_directory.join("store")
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.store_path())
    }
}
