// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native-resolution PNG download with the hotspots burned in.

use anyhow::{Context, Result};
use std::path::Path;

use super::media::{encode_png, ImageRef};
use crate::models::hotspot::Hotspot;
use crate::render::burn_in;

/// Suggested file name for a download made at `unix_millis`.
pub fn default_file_name(unix_millis: u128) -> String {
    format!("hotspot-image-{}.png", unix_millis)
}

/// Encode the annotated image as PNG bytes.
pub fn annotated_png(image: &ImageRef, hotspots: &[Hotspot]) -> Result<Vec<u8>> {
    let annotated = burn_in(image, hotspots)?;
    encode_png(&annotated)
}

/// Write the annotated image to `path`.
pub fn write_png(image: &ImageRef, hotspots: &[Hotspot], path: &Path) -> Result<()> {
    let png = annotated_png(image, hotspots)?;
    std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Downloaded annotated image to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::decode_image;
    use crate::models::hotspot::Point;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_written_png_is_native_size() {
        let image = ImageRef::new(RgbaImage::from_pixel(80, 60, Rgba([255, 255, 255, 255])), 40, 30).unwrap();
        let hotspots = vec![Hotspot {
            id: 1,
            name: "Door".to_string(),
            description: String::new(),
            color: "#0000ff".to_string(),
            points: vec![Point::new(5.0, 5.0), Point::new(20.0, 5.0), Point::new(20.0, 20.0)],
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_file_name(1));

        write_png(&image, &hotspots, &path).unwrap();

        let decoded = decode_image(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (80, 60));
        assert_eq!(path.file_name().unwrap(), "hotspot-image-1.png");
    }
}
