// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings come from an optional YAML file. Every field has a default, so
//! a partial file only overrides what it names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::io::serialization::default_snapshot_path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "hotspotter.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Endpoint the editor posts generated HTML to.
    pub save_endpoint: String,
    /// Snapshot file; the platform data directory when unset.
    pub snapshot_path: Option<PathBuf>,
    pub max_display_width: u32,
    pub max_display_height: u32,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub library_dir: PathBuf,
    /// Base of the URLs returned for saved files; `http://<bind>` when unset.
    pub public_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_endpoint: "http://127.0.0.1:8080/save".to_string(),
            snapshot_path: None,
            max_display_width: 1200,
            max_display_height: 800,
            server: ServerSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            library_dir: PathBuf::from("library"),
            public_base_url: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = std::fs::read_to_string(path_ref)
            .with_context(|| format!("reading settings {}", path_ref.display()))?;
        let settings = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing settings {}", path_ref.display()))?;
        Ok(settings)
    }

    /// Load an explicitly requested file, or the default file if present,
    /// or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    log::info!("No {} found, using default settings", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path.clone().unwrap_or_else(default_snapshot_path)
    }
}

impl ServerSettings {
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}", self.bind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"max_display_width: 640\nserver:\n  library_dir: /srv/hotspots\n")
            .unwrap();
        let path = temp.into_temp_path();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.max_display_width, 640);
        assert_eq!(settings.max_display_height, 800);
        assert_eq!(settings.server.library_dir, PathBuf::from("/srv/hotspots"));
        assert_eq!(settings.server.bind, ServerSettings::default().bind);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"server: [not, a, map]\n").unwrap();
        let path = temp.into_temp_path();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load_or_default(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn public_base_url_defaults_to_bind() {
        let mut server = ServerSettings::default();
        assert_eq!(server.public_base_url(), "http://127.0.0.1:8080");
        server.public_base_url = Some("https://example.org/hotspots/".to_string());
        assert_eq!(server.public_base_url(), "https://example.org/hotspots");
    }
}
