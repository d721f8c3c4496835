pub mod anchor;
pub mod branch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod layout;
pub mod layout_dump;
pub mod lint;
pub mod render;
pub mod session;
pub mod station;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use anchor::{AnchorChoice, AnchorSelector, select_anchor};
pub use branch::{Branches, partition, working_set};
pub use config::{Config, LayoutConfig, load_config, parse_config};
pub use dataset::{DatasetError, load_stations, parse_stations};
pub use layout::{DiagramRequest, LayoutPlan, Viewport, compute_layout};
pub use render::render_svg;
pub use session::DiagramSession;
pub use station::{Station, normalize};
pub use theme::Theme;

/// Everything besides the dataset needed to turn a line into SVG.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Overrides the width-based narrow/wide decision when set.
    pub narrow: Option<bool>,
}

impl RenderOptions {
    pub fn viewport(&self, width: f32) -> Viewport {
        match self.narrow {
            Some(narrow) => Viewport::new(width, narrow),
            None => Viewport::classify(width, self.layout.narrow_breakpoint),
        }
    }
}

/// Parse a GeoJSON station collection and render one line as SVG.
///
/// A collection without features renders as an empty canvas; malformed input is an error.
pub fn render_line_svg(
    geojson: &str,
    line: &str,
    width: f32,
    options: &RenderOptions,
) -> anyhow::Result<String> {
    let stations = match parse_stations(geojson) {
        Ok(stations) => stations,
        Err(DatasetError::Empty) => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    let request = DiagramRequest::new(line, options.viewport(width));
    let plan = compute_layout(&request, &stations, &options.theme, &options.layout);
    Ok(render_svg(&plan, &options.theme))
}
