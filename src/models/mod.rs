// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot data model and domain state.

pub mod error;
pub mod hotspot;
pub mod project;
pub mod repository;
pub mod session;
