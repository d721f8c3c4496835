use crate::anchor::AnchorSelector;
use crate::config::LayoutConfig;
use crate::layout::{DiagramRequest, LayoutPlan, Viewport, compute_layout_with};
use crate::render::render_svg;
use crate::station::Station;
use crate::theme::Theme;

/// Caller-side state for an interactive diagram: the dataset plus which line is shown.
///
/// Switching lines is a plain setter; every `layout` call recomputes from scratch.
#[derive(Debug)]
pub struct DiagramSession {
    stations: Vec<Station>,
    theme: Theme,
    config: LayoutConfig,
    selector: AnchorSelector,
    active_line: String,
}

impl DiagramSession {
    pub fn new(stations: Vec<Station>, theme: Theme, config: LayoutConfig) -> Self {
        let selector = AnchorSelector::new(&config.anchor);
        let active_line = config
            .catalog
            .codes()
            .next()
            .unwrap_or("PURPLE")
            .to_string();
        Self {
            stations,
            theme,
            config,
            selector,
            active_line,
        }
    }

    pub fn active_line(&self) -> &str {
        &self.active_line
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Returns `true` when the active line changed. Unknown lines and the current line
    /// are ignored.
    pub fn set_active_line(&mut self, line: &str) -> bool {
        let line = line.trim().to_uppercase();
        if line == self.active_line || !self.config.catalog.contains(&line) {
            return false;
        }
        self.active_line = line;
        true
    }

    pub fn request(&self, viewport: Viewport) -> DiagramRequest {
        DiagramRequest::new(self.active_line.clone(), viewport)
    }

    pub fn layout(&self, viewport: Viewport) -> LayoutPlan {
        compute_layout_with(
            &self.selector,
            &self.request(viewport),
            &self.stations,
            &self.theme,
            &self.config,
        )
    }

    pub fn render_svg(&self, viewport: Viewport) -> String {
        render_svg(&self.layout(viewport), &self.theme)
    }
}
