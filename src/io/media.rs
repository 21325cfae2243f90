// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading and the loaded image reference.
//!
//! This module handles decoding uploaded images, fitting them to the
//! display canvas, and converting them to and from self-contained
//! `data:` URIs for persistence and export.

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, ImageFormat, RgbaImage};
use std::path::Path;

use crate::util::geometry::fit_within;

/// A decoded image at native resolution together with its display canvas.
///
/// Hotspot points live in display space; `scale()` converts them to
/// native space.
#[derive(Clone)]
pub struct ImageRef {
    native: RgbaImage,
    display: RgbaImage,
    data_uri: String,
}

impl ImageRef {
    /// Wrap a native image shown on a canvas of the given size.
    pub fn new(native: RgbaImage, display_width: u32, display_height: u32) -> Result<Self> {
        if native.width() == 0 || native.height() == 0 {
            bail!("image has no pixels");
        }
        if display_width == 0 || display_height == 0 {
            bail!("display canvas has no area");
        }

        let display = if (display_width, display_height) == native.dimensions() {
            native.clone()
        } else {
            image::imageops::resize(&native, display_width, display_height, FilterType::Triangle)
        };
        let data_uri = png_data_uri(&native)?;

        Ok(Self {
            native,
            display,
            data_uri,
        })
    }

    /// Wrap a native image, shrinking the display canvas to fit the bounds.
    pub fn fit(native: RgbaImage, max_width: u32, max_height: u32) -> Result<Self> {
        let (width, height) = fit_within(native.width(), native.height(), max_width, max_height);
        Self::new(native, width, height)
    }

    pub fn native(&self) -> &RgbaImage {
        &self.native
    }

    /// The image resampled to the display canvas size.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn native_size(&self) -> (u32, u32) {
        self.native.dimensions()
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }

    /// Display-to-native scale factors `(scale_x, scale_y)`.
    pub fn scale(&self) -> (f64, f64) {
        let (nw, nh) = self.native_size();
        let (dw, dh) = self.display_size();
        (nw as f64 / dw as f64, nh as f64 / dh as f64)
    }

    /// The native image as a PNG `data:` URI.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRef")
            .field("native", &self.native_size())
            .field("display", &self.display_size())
            .finish()
    }
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decoding {}", path.display()))
}

/// Decode image bytes in any supported format.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).context("unsupported or corrupt image data")?;
    Ok(image.to_rgba8())
}

/// Encode an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

fn png_data_uri(image: &RgbaImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Decode a base64 `data:` URI into an image.
pub fn decode_data_uri(uri: &str) -> Result<RgbaImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URI has no payload"))?;
    if !header.ends_with(";base64") {
        bail!("data URI is not base64 encoded");
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .context("invalid base64 in data URI")?;
    decode_image(&bytes)
}
