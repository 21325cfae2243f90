// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Embed snippet generation.
//!
//! Converts the hotspot list and loaded image into self-contained,
//! interactive HTML. Every format embeds the native image as a data URI,
//! positions regions in native coordinates, and shares the same escaping
//! and tooltip behavior; they differ only in how the figure is wrapped.

pub mod markup;

use crate::io::media::ImageRef;
use crate::models::hotspot::{Hotspot, Point};
use crate::util::geometry::scale_points;
use markup::{escape_html, figure, js_string, EMBED_CSS, TOOLTIP_BEHAVIOR};

/// Output form of an embed snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedFormat {
    /// Inline markup plus a script that wires the tooltip once per container.
    Widget,
    /// Standalone document inside an `<iframe srcdoc>`.
    Iframe,
    /// Custom element rendering into its own shadow root.
    WebComponent,
    /// Complete HTML document.
    Standalone,
}

impl EmbedFormat {
    pub const ALL: [EmbedFormat; 4] = [
        EmbedFormat::Widget,
        EmbedFormat::Iframe,
        EmbedFormat::WebComponent,
        EmbedFormat::Standalone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EmbedFormat::Widget => "Inline widget",
            EmbedFormat::Iframe => "Iframe",
            EmbedFormat::WebComponent => "Web component",
            EmbedFormat::Standalone => "Standalone page",
        }
    }
}

/// Per-export parameters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Distinguishes element ids and custom element names between exports.
    pub instance_id: String,
    /// Iframe height in pixels; defaults to the image height plus padding.
    pub iframe_height: Option<u32>,
}

impl ExportOptions {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            iframe_height: None,
        }
    }

    fn sanitized_id(&self) -> String {
        let id: String = self
            .instance_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if id.is_empty() {
            "0".to_string()
        } else {
            id
        }
    }
}

/// One hotspot as it appears in exported markup.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRegion {
    pub name: String,
    pub description: String,
    pub color: String,
    /// Native image coordinates.
    pub points: Vec<Point>,
}

/// Everything an embed needs, already in native space.
#[derive(Debug, Clone)]
pub struct ExportData {
    pub image_width: u32,
    pub image_height: u32,
    pub image_src: String,
    pub regions: Vec<ExportRegion>,
}

impl ExportData {
    /// Scale hotspot points from display to native space using the
    /// image's current scale factors.
    pub fn collect(image: &ImageRef, hotspots: &[Hotspot]) -> Self {
        let (image_width, image_height) = image.native_size();
        let (scale_x, scale_y) = image.scale();

        let regions = hotspots
            .iter()
            .map(|h| ExportRegion {
                name: h.name.clone(),
                description: h.description().unwrap_or_default().to_string(),
                color: h.color.clone(),
                points: scale_points(&h.points, scale_x, scale_y),
            })
            .collect();

        Self {
            image_width,
            image_height,
            image_src: image.data_uri().to_string(),
            regions,
        }
    }
}

/// Generate an embed snippet in the requested format.
pub fn generate(
    format: EmbedFormat,
    image: &ImageRef,
    hotspots: &[Hotspot],
    options: &ExportOptions,
) -> String {
    let data = ExportData::collect(image, hotspots);
    render(format, &data, options)
}

/// Render already-collected export data.
pub fn render(format: EmbedFormat, data: &ExportData, options: &ExportOptions) -> String {
    let id = options.sanitized_id();
    match format {
        EmbedFormat::Widget => widget(data, &id),
        EmbedFormat::Iframe => iframe(data, &id, options.iframe_height),
        EmbedFormat::WebComponent => web_component(data, &id),
        EmbedFormat::Standalone => standalone(data, &id),
    }
}

fn widget(data: &ExportData, id: &str) -> String {
    format!(
        r#"<!-- Hotspot widget: paste this into your HTML -->
<div class="hotspot-embed" id="hotspot-widget-{id}">
<style>
{css}</style>
{figure}
</div>
<script>
(function () {{
    var script = document.currentScript;
    var container = script && script.previousElementSibling;
    if (!container || !container.classList.contains('hotspot-embed')) {{
        container = document.getElementById('hotspot-widget-{id}');
    }}
    if (!container || container.hasAttribute('data-rendered')) {{
        return;
    }}
    container.setAttribute('data-rendered', 'true');
    ({behavior})(container, container);
}})();
</script>
"#,
        css = EMBED_CSS,
        figure = figure(data),
        behavior = TOOLTIP_BEHAVIOR,
    )
}

fn standalone(data: &ExportData, id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Hotspot Image</title>
<style>
body {{ margin: 0; padding: 20px; font-family: Arial, sans-serif; background: #f5f5f5; }}
{css}</style>
</head>
<body>
<div class="hotspot-embed" id="hotspot-embed-{id}">
{figure}
</div>
<script>
(function () {{
    var container = document.getElementById('hotspot-embed-{id}');
    if (!container || container.hasAttribute('data-rendered')) {{
        return;
    }}
    container.setAttribute('data-rendered', 'true');
    ({behavior})(container, container);
}})();
</script>
</body>
</html>
"#,
        css = EMBED_CSS,
        figure = figure(data),
        behavior = TOOLTIP_BEHAVIOR,
    )
}

fn iframe(data: &ExportData, id: &str, height: Option<u32>) -> String {
    let height = height.unwrap_or(data.image_height + 40);
    format!(
        r#"<iframe
    srcdoc="{doc}"
    width="100%"
    height="{height}"
    frameborder="0"
    title="Hotspot image"
    style="border: 1px solid #ddd; border-radius: 8px;">
</iframe>
"#,
        doc = escape_html(&standalone(data, id)),
    )
}

fn web_component(data: &ExportData, id: &str) -> String {
    let shadow_markup = format!(
        ":host {{ display: inline-block; position: relative; max-width: 100%; }}\n{css}",
        css = EMBED_CSS
    );
    let shadow_markup = format!(
        "<style>\n{shadow_markup}</style>\n<div class=\"hotspot-embed\">\n{figure}\n</div>",
        figure = figure(data)
    );

    format!(
        r#"<!-- Hotspot web component: paste this into your HTML -->
<script>
(function () {{
    var tag = 'hotspot-image-{id}';
    if (customElements.get(tag)) {{
        return;
    }}
    var markup = {markup};
    var attachTooltips = {behavior};
    class HotspotImage extends HTMLElement {{
        constructor() {{
            super();
            this.attachShadow({{ mode: 'open' }});
        }}
        connectedCallback() {{
            if (this.shadowRoot.childElementCount > 0) {{
                return;
            }}
            this.shadowRoot.innerHTML = markup;
            attachTooltips(this.shadowRoot, this.shadowRoot.querySelector('.hotspot-embed'));
        }}
    }}
    customElements.define(tag, HotspotImage);
}})();
</script>
<hotspot-image-{id}></hotspot-image-{id}>
"#,
        markup = js_string(&shadow_markup),
        behavior = TOOLTIP_BEHAVIOR,
    )
}
