// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Client for the remote file library.

use anyhow::{Context, Result};

use crate::server::{SaveReply, SaveRequest};

/// What happened to a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved {
        filename: String,
        url: String,
        overwritten: bool,
    },
    /// The name is taken; retry with `overwrite` after the user confirms.
    AlreadyExists { filename: String },
    /// The server refused; the message is shown verbatim.
    Failed(String),
}

impl From<SaveReply> for SaveOutcome {
    fn from(reply: SaveReply) -> Self {
        if reply.success {
            return SaveOutcome::Saved {
                filename: reply.filename.unwrap_or_default(),
                url: reply.url.unwrap_or_default(),
                overwritten: reply.overwritten.unwrap_or(false),
            };
        }
        if reply.file_exists == Some(true) {
            return SaveOutcome::AlreadyExists {
                filename: reply.filename.unwrap_or_default(),
            };
        }
        SaveOutcome::Failed(reply.error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct LibraryClient {
    endpoint: String,
}

impl LibraryClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post a page to the library. Transport failures are errors; refusals
    /// reported by the server come back as an outcome.
    pub fn save(&self, filename: &str, content: &str, overwrite: bool) -> Result<SaveOutcome> {
        let request = SaveRequest::new(filename, content, overwrite);
        let response = match ureq::post(&self.endpoint).send_json(&request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                log::warn!("Library answered {} for {}", code, filename);
                response
            }
            Err(e) => {
                return Err(e).with_context(|| format!("posting to {}", self.endpoint));
            }
        };

        let reply: SaveReply = response
            .into_json()
            .with_context(|| format!("reading reply from {}", self.endpoint))?;
        Ok(reply.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_success() {
        let reply: SaveReply = serde_json::from_str(
            r#"{"success":true,"filename":"a.html","url":"http://h/library/a.html","path":"library/a.html","overwritten":true}"#,
        )
        .unwrap();
        assert_eq!(
            SaveOutcome::from(reply),
            SaveOutcome::Saved {
                filename: "a.html".to_string(),
                url: "http://h/library/a.html".to_string(),
                overwritten: true,
            }
        );
    }

    #[test]
    fn test_outcome_from_conflict_and_failure() {
        let exists: SaveReply = serde_json::from_str(
            r#"{"success":false,"error":"File already exists","fileExists":true,"filename":"a.html"}"#,
        )
        .unwrap();
        assert_eq!(
            SaveOutcome::from(exists),
            SaveOutcome::AlreadyExists { filename: "a.html".to_string() }
        );

        let failed: SaveReply =
            serde_json::from_str(r#"{"success":false,"error":"Failed to save file"}"#).unwrap();
        assert_eq!(
            SaveOutcome::from(failed),
            SaveOutcome::Failed("Failed to save file".to_string())
        );
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let client = LibraryClient::new("http://127.0.0.1:1/save");
        assert!(client.save("a", "b", false).is_err());
    }
}
