// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Domain error type shared by the repository, drawing session and editor.

/// Errors raised by hotspot operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HotspotError {
    #[error("{0}")]
    Validation(String),
    #[error("no hotspot with id {0}")]
    NotFound(u64),
    #[error("invalid drawing state: {0}")]
    InvalidState(&'static str),
    #[error("no image loaded")]
    NoImage,
}

pub type HotspotResult<T> = Result<T, HotspotError>;
