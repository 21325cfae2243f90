// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File library for generated hotspot pages.
//!
//! The library stores HTML documents under a single directory. File names
//! are sanitized, always end in `.html`, and an existing file is only
//! replaced when the request explicitly asks for it.

pub mod routes;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use warp::http::StatusCode;

/// Body of a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

impl SaveRequest {
    pub fn new(filename: impl Into<String>, content: impl Into<String>, overwrite: bool) -> Self {
        Self {
            filename: Some(filename.into()),
            content: Some(content.into()),
            overwrite: overwrite.then_some(true),
        }
    }
}

/// Body of every save response, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwritten: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_exists: Option<bool>,
}

impl SaveReply {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    fn already_exists(filename: &str) -> Self {
        Self {
            file_exists: Some(true),
            filename: Some(filename.to_string()),
            ..Self::failure("File already exists")
        }
    }
}

/// Directory of saved pages plus the public URL they are served under.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    dir: PathBuf,
    base_url: String,
}

impl FileLibrary {
    /// Open the library, creating its directory if needed.
    pub fn open(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating library directory {}", dir.display()))?;
        Ok(Self {
            dir,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store a page and describe the outcome as an HTTP status and reply.
    pub fn save(&self, request: &SaveRequest) -> (StatusCode, SaveReply) {
        let (Some(raw_name), Some(content)) = (&request.filename, &request.content) else {
            return (
                StatusCode::BAD_REQUEST,
                SaveReply::failure("Missing filename or content"),
            );
        };

        let filename = sanitize_filename(raw_name, unix_seconds());
        let file_path = self.dir.join(&filename);
        let exists = file_path.exists();

        if exists && !request.overwrite.unwrap_or(false) {
            log::warn!("Refusing to overwrite existing {}", filename);
            return (StatusCode::CONFLICT, SaveReply::already_exists(&filename));
        }

        if let Err(e) = std::fs::write(&file_path, content) {
            log::error!("Failed to write {}: {}", file_path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                SaveReply::failure("Failed to save file"),
            );
        }

        log::info!(
            "Saved {} ({} bytes{})",
            filename,
            content.len(),
            if exists { ", overwritten" } else { "" }
        );

        (
            StatusCode::OK,
            SaveReply {
                success: true,
                url: Some(format!("{}/library/{}", self.base_url, filename)),
                path: Some(format!("library/{}", filename)),
                overwritten: Some(exists),
                filename: Some(filename),
                ..Default::default()
            },
        )
    }
}

/// Reduce a requested name to `[A-Za-z0-9._-]`, trim separator dashes,
/// fall back to a timestamped name, and force an `.html` suffix.
pub fn sanitize_filename(raw: &str, timestamp: u64) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut name = replaced.trim_matches('-').to_string();
    if name.is_empty() {
        name = format!("hotspot-{}", timestamp);
    }
    if !name.to_ascii_lowercase().ends_with(".html") {
        name.push_str(".html");
    }
    name
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
