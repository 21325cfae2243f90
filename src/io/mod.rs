// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media decoding, snapshot persistence, downloads and
//! the remote file library.

pub mod download;
pub mod library_client;
pub mod media;
pub mod serialization;
