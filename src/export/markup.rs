// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Markup fragments shared by every embed format.

use super::ExportData;

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode text as a JavaScript string literal that is safe inside `<script>`.
pub fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

/// Tooltip and polygon styling, scoped to the embed container.
pub const EMBED_CSS: &str = "\
.hotspot-embed { position: relative; display: inline-block; max-width: 100%; }
.hotspot-embed svg { max-width: 100%; height: auto; display: block; }
.hotspot-embed polygon { cursor: pointer; transition: opacity 0.3s; }
.hotspot-embed polygon:hover { opacity: 0.7; }
.hotspot-embed .hotspot-tooltip { position: absolute; background: rgba(0,0,0,0.85); color: #ffffff; padding: 10px 15px; border-radius: 6px; pointer-events: none; display: none; font-size: 14px; z-index: 1000; box-shadow: 0 2px 8px rgba(0,0,0,0.3); }
.hotspot-embed .hotspot-tooltip.show { display: block; }
.hotspot-embed .hotspot-tooltip h4 { margin: 0 0 5px 0; font-size: 16px; font-weight: 600; }
.hotspot-embed .hotspot-tooltip p { margin: 0; font-size: 12px; color: #f0f0f0; }
";

/// A JavaScript function expression `(root, anchor)` that attaches the
/// hover tooltip to every region under `root`. Text is inserted with
/// `textContent`, so region metadata never becomes markup.
pub const TOOLTIP_BEHAVIOR: &str = "\
function (root, anchor) {
    var tooltip = root.querySelector('.hotspot-tooltip');
    var polygons = root.querySelectorAll('polygon[data-hotspot-index]');
    Array.prototype.forEach.call(polygons, function (poly) {
        poly.addEventListener('mouseenter', function () {
            tooltip.textContent = '';
            var title = document.createElement('h4');
            title.textContent = poly.getAttribute('data-hotspot-name');
            tooltip.appendChild(title);
            var desc = poly.getAttribute('data-hotspot-desc');
            if (desc) {
                var text = document.createElement('p');
                text.textContent = desc;
                tooltip.appendChild(text);
            }
            tooltip.classList.add('show');
        });
        poly.addEventListener('mousemove', function (e) {
            var rect = anchor.getBoundingClientRect();
            tooltip.style.left = (e.clientX - rect.left + 10) + 'px';
            tooltip.style.top = (e.clientY - rect.top + 10) + 'px';
        });
        poly.addEventListener('mouseleave', function () {
            tooltip.classList.remove('show');
        });
    });
}";

/// The image and its regions as inline SVG, followed by the tooltip node.
pub fn figure(data: &ExportData) -> String {
    let (w, h) = (data.image_width, data.image_height);
    let mut svg = format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <image href=\"{src}\" width=\"{w}\" height=\"{h}\"/>\n",
        src = escape_html(&data.image_src),
    );

    for (index, region) in data.regions.iter().enumerate() {
        let points = region
            .points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let color = escape_html(&region.color);
        svg.push_str(&format!(
            "<polygon points=\"{points}\" fill=\"{color}40\" stroke=\"{color}\" stroke-width=\"2\" \
             data-hotspot-index=\"{index}\" data-hotspot-name=\"{name}\" data-hotspot-desc=\"{desc}\"/>\n",
            name = escape_html(&region.name),
            desc = escape_html(&region.description),
        ));
    }

    svg.push_str("</svg>\n<div class=\"hotspot-tooltip\"></div>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_js_string_cannot_close_script() {
        let literal = js_string("</script><!-- \"x\"");
        assert!(!literal.contains("</script"));
        assert!(!literal.contains("<!--"));
        assert!(literal.starts_with('"') && literal.ends_with('"'));
    }
}
