use metro_diagram::{RenderOptions, Theme, render_line_svg};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    narrow: Option<bool>,
    caption: Option<String>,
    lines: Option<BTreeMap<String, String>>,
}

fn build_render_options(options: DiagramRenderOptions) -> RenderOptions {
    let mut render_options = RenderOptions::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        render_options.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(caption) = options.caption {
        render_options.layout.caption = caption;
    }
    for (code, color) in options.lines.unwrap_or_default() {
        render_options.layout.catalog.set_color(&code, &color);
    }
    render_options.narrow = options.narrow;
    render_options
}

#[wasm_bindgen]
pub fn render_line_diagram_svg(
    geojson: &str,
    line: &str,
    width: f32,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<DiagramRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        DiagramRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_line_svg(geojson, line, width, &render_options)
        .map_err(|error| JsValue::from_str(&format!("{error:#}")))
}
