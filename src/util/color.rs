// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hex color parsing for hotspot colors.

/// Color used for new hotspots until the user picks another.
pub const DEFAULT_COLOR: &str = "#ff0000";

/// Parse a `#rrggbb` string into RGB components.
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Format RGB components as a lowercase `#rrggbb` string.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("#FF8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("#ff00ÿ"), None);
    }

    #[test]
    fn test_to_hex_matches_parse() {
        assert_eq!(to_hex([255, 128, 0]), "#ff8000");
        assert_eq!(parse_hex(&to_hex([1, 2, 3])), Some([1, 2, 3]));
    }
}
