use crate::layout::{LabelEntry, LabelStyle, LayoutPlan, Marker, Primitive, RailSegment};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

pub fn render_svg(plan: &LayoutPlan, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = plan.width.max(1.0);
    let height = plan.height.max(0.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" data-line=\"{}\">",
        escape_xml(&plan.line)
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for primitive in plan.primitives() {
        match primitive {
            Primitive::Rail(rail) => svg.push_str(&rail_svg(rail)),
            Primitive::Marker(marker) => svg.push_str(&marker_svg(marker)),
            Primitive::Label(label) => svg.push_str(&label_svg(label, theme)),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn rail_svg(rail: &RailSegment) -> String {
    format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        points_to_path(&rail.points),
        rail.color,
        rail.width
    )
}

fn marker_svg(marker: &Marker) -> String {
    format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        marker.x, marker.y, marker.radius, marker.fill, marker.stroke, marker.stroke_width
    )
}

fn label_svg(label: &LabelEntry, theme: &Theme) -> String {
    let (font_size, default_fill, weight) = match label.style {
        LabelStyle::Station => (theme.font_size, theme.label_color.as_str(), None),
        LabelStyle::Anchor => (theme.font_size, theme.label_color.as_str(), Some("700")),
        LabelStyle::Caption => (theme.caption_font_size, theme.caption_color.as_str(), None),
    };
    let fill = label.color.as_deref().unwrap_or(default_fill);
    let mut attrs = format!(
        "x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"",
        label.x,
        label.y,
        label.anchor.as_str(),
        escape_xml(&theme.font_family),
        font_size,
        fill
    );
    if let Some(weight) = weight {
        attrs.push_str(&format!(" font-weight=\"{weight}\""));
    }
    if let Some(deg) = label.rotation {
        attrs.push_str(&format!(
            " transform=\"rotate({deg} {:.2} {:.2})\"",
            label.x, label.y
        ));
    }
    format!("<text {attrs}>{}</text>", escape_xml(&label.text))
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(1100.0, 380.0))
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
