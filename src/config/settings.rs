//! Runtime settings from environment variables.
//!
//! Everything has a sensible default so the demo binary runs from a fresh
//! checkout; a `.env` file (loaded in `main`) or real environment variables
//! override the defaults.

use std::path::PathBuf;

/// Resolved runtime settings for one process.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory holding the JSON collection snapshots
    pub data_dir: PathBuf,
    /// Path to the event catalog TOML file
    pub catalog_path: PathBuf,
    /// Origin used when building shareable ticket links
    pub share_origin: String,
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults:
    /// `TIKETA_DATA_DIR` (default `data`), `TIKETA_CATALOG` (default
    /// `catalog.toml`), and `TIKETA_ORIGIN` (default `https://tiketa.local`).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("TIKETA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            catalog_path: std::env::var("TIKETA_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("catalog.toml")),
            share_origin: std::env::var("TIKETA_ORIGIN")
                .unwrap_or_else(|_| "https://tiketa.local".to_string()),
        }
    }
}
