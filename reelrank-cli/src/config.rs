/// Config file loading and creation for the reelrank CLI.
///
/// Config lives at ~/.config/reelrank/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct ReelrankConfig {
    pub ratings: Option<String>,
    pub images_dir: Option<String>,
    pub placeholder: Option<String>,
    pub posters: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# reelrank configuration
# All values here can be overridden by CLI flags.

# Durable ratings CSV (columns: Date, Name, Year, Reference URI, Rating)
# ratings = \"db/ratings.csv\"

# Directory for cached poster images
# images_dir = \"images\"

# Placeholder image copied in for films with no cached poster.
# Posters are refetched only while a film's cached file still matches
# this placeholder by content hash.
# placeholder = \"assets/no_image.jpg\"

# Set to false to skip poster resolution entirely
# posters = true
";

/// Returns the default config path: ~/.config/reelrank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("reelrank").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> ReelrankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content)
                .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ReelrankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
