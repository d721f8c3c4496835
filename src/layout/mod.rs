//! Layout computation: one request in, one [`LayoutPlan`] out.
//!
//! Every call recomputes the plan from scratch. The narrow/wide decision travels inside the
//! [`DiagramRequest`]; nothing here reads global display state.

mod desktop;
pub mod label_placement;
mod mobile;
mod types;

pub use desktop::Desktop;
pub use mobile::{MobileDualRail, MobileInterleaved, mobile_height};
pub use types::*;

use crate::anchor::{AnchorSelector, complement_line};
use crate::branch::{Branches, split_at_anchor, working_set};
use crate::config::{LayoutConfig, MobileArrangement};
use crate::station::Station;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub narrow: bool,
}

impl Viewport {
    pub fn new(width: f32, narrow: bool) -> Self {
        Self { width, narrow }
    }

    pub fn wide(width: f32) -> Self {
        Self::new(width, false)
    }

    pub fn narrow(width: f32) -> Self {
        Self::new(width, true)
    }

    /// Same rule as a `(max-width: <breakpoint>px)` media query.
    pub fn classify(width: f32, breakpoint: f32) -> Self {
        Self::new(width, width <= breakpoint)
    }

    pub fn effective_width(&self, fallback: f32) -> f32 {
        if self.width.is_finite() && self.width > 0.0 {
            self.width
        } else {
            fallback
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub line: String,
    pub viewport: Viewport,
}

impl DiagramRequest {
    pub fn new(line: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            line: line.into(),
            viewport,
        }
    }
}

/// Resolved inputs handed to a strategy.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub line: &'a str,
    pub width: f32,
    pub anchor: &'a Station,
    pub branches: &'a Branches<'a>,
    pub line_color: &'a str,
    pub complement_color: &'a str,
    pub caption: &'a str,
}

impl Scene<'_> {
    pub(crate) fn plan(&self, mode: LayoutMode, height: f32) -> LayoutPlan {
        LayoutPlan {
            mode,
            height,
            complement_color: Some(self.complement_color.to_string()),
            ..LayoutPlan::empty(self.line, self.width, self.line_color)
        }
    }

    pub(crate) fn place(&self, station: &Station, x: f32, y: f32) -> PlacedStation {
        PlacedStation {
            id: station.id.clone(),
            name: station.name.clone(),
            seq: station.seq_for(self.line).unwrap_or_default(),
            x,
            y,
        }
    }

    pub(crate) fn station_marker(
        &self,
        station: &PlacedStation,
        radius: f32,
        stroke_width: f32,
        theme: &Theme,
    ) -> Marker {
        Marker {
            x: station.x,
            y: station.y,
            radius,
            stroke: self.line_color.to_string(),
            stroke_width,
            fill: theme.marker_fill.clone(),
            station_id: Some(station.id.clone()),
        }
    }

    /// Outer ring in the line color, inner ring in the complement color.
    pub(crate) fn anchor_rings(
        &self,
        anchor: &PlacedStation,
        outer: (f32, f32),
        inner: (f32, f32),
        theme: &Theme,
    ) -> [Marker; 2] {
        let outer_ring = self.station_marker(anchor, outer.0, outer.1, theme);
        let inner_ring = Marker {
            radius: inner.0,
            stroke: self.complement_color.to_string(),
            stroke_width: inner.1,
            ..outer_ring.clone()
        };
        [outer_ring, inner_ring]
    }

    pub(crate) fn anchor_label(&self, anchor: &PlacedStation, x: f32, y: f32, align: TextAnchor) -> LabelEntry {
        LabelEntry {
            text: anchor.name.clone(),
            x,
            y,
            anchor: align,
            rotation: None,
            style: LabelStyle::Anchor,
            color: Some(self.complement_color.to_string()),
            station_id: Some(anchor.id.clone()),
        }
    }

    pub(crate) fn caption_label(&self, x: f32, y: f32) -> LabelEntry {
        LabelEntry {
            text: self.caption.to_string(),
            x,
            y,
            anchor: TextAnchor::Middle,
            rotation: None,
            style: LabelStyle::Caption,
            color: None,
            station_id: None,
        }
    }
}

pub(crate) fn station_label(
    station: &PlacedStation,
    x: f32,
    y: f32,
    anchor: TextAnchor,
    rotation: Option<f32>,
) -> LabelEntry {
    LabelEntry {
        text: station.name.clone(),
        x,
        y,
        anchor,
        rotation,
        style: LabelStyle::Station,
        color: None,
        station_id: Some(station.id.clone()),
    }
}

pub trait LayoutStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn layout(&self, scene: &Scene<'_>, theme: &Theme, config: &LayoutConfig) -> LayoutPlan;
}

pub fn select_strategy(viewport: &Viewport, config: &LayoutConfig) -> &'static dyn LayoutStrategy {
    if !viewport.narrow {
        return &Desktop;
    }
    match config.mobile.arrangement {
        MobileArrangement::Interleaved => &MobileInterleaved,
        MobileArrangement::DualRail => &MobileDualRail,
    }
}

pub fn compute_layout(
    request: &DiagramRequest,
    stations: &[Station],
    theme: &Theme,
    config: &LayoutConfig,
) -> LayoutPlan {
    let selector = AnchorSelector::new(&config.anchor);
    compute_layout_with(&selector, request, stations, theme, config)
}

/// Like [`compute_layout`] but reuses a compiled selector across requests.
pub fn compute_layout_with(
    selector: &AnchorSelector,
    request: &DiagramRequest,
    stations: &[Station],
    theme: &Theme,
    config: &LayoutConfig,
) -> LayoutPlan {
    let line = request.line.trim().to_uppercase();
    let width = request.viewport.effective_width(config.default_width);
    let line_color = config.catalog.color_of(&line);

    let ordered = working_set(&line, stations);
    let Some(choice) = selector.select_in(&line, &ordered) else {
        tracing::debug!(line = %line, "no stations on line, empty plan");
        return LayoutPlan::empty(&line, width, line_color);
    };
    let branches = split_at_anchor(&line, &ordered, choice.station);

    let complement_color = complement_line(&line, choice.station, &config.anchor)
        .and_then(|other| config.catalog.get(other))
        .map(|spec| spec.color.as_str())
        .unwrap_or(config.anchor.default_secondary_color.as_str());

    let scene = Scene {
        line: &line,
        width,
        anchor: choice.station,
        branches: &branches,
        line_color,
        complement_color,
        caption: &config.caption,
    };
    let strategy = select_strategy(&request.viewport, config);
    tracing::debug!(
        line = %line,
        strategy = strategy.name(),
        width,
        before = branches.before.len(),
        after = branches.after.len(),
        "computing layout"
    );
    strategy.layout(&scene, theme, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn station(id: &str, lines: &[&str], interchange: bool, seq: i64) -> Station {
        let mut map = BTreeMap::new();
        map.insert("PURPLE".to_string(), seq);
        Station {
            id: id.to_string(),
            name: format!("Station {id}"),
            position: None,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            interchange,
            seq: map,
        }
    }

    fn purple_line(n: i64) -> Vec<Station> {
        (1..=n)
            .map(|seq| station(&format!("p{seq}"), &["PURPLE"], false, seq))
            .collect()
    }

    #[test]
    fn viewport_classification_matches_media_query() {
        assert!(Viewport::classify(640.0, 640.0).narrow);
        assert!(!Viewport::classify(641.0, 640.0).narrow);
        assert_eq!(Viewport::wide(0.0).effective_width(1100.0), 1100.0);
        assert_eq!(Viewport::wide(f32::NAN).effective_width(1100.0), 1100.0);
        assert_eq!(Viewport::wide(800.0).effective_width(1100.0), 800.0);
    }

    #[test]
    fn strategy_follows_viewport_and_arrangement() {
        let mut config = LayoutConfig::default();
        assert_eq!(select_strategy(&Viewport::wide(1200.0), &config).name(), "desktop");
        assert_eq!(
            select_strategy(&Viewport::narrow(360.0), &config).name(),
            "mobile-interleaved"
        );
        config.mobile.arrangement = MobileArrangement::DualRail;
        assert_eq!(
            select_strategy(&Viewport::narrow(360.0), &config).name(),
            "mobile-dual-rail"
        );
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let plan = compute_layout(
            &DiagramRequest::new("PURPLE", Viewport::wide(1000.0)),
            &[],
            &Theme::night(),
            &LayoutConfig::default(),
        );
        assert_eq!(plan.mode, LayoutMode::Empty);
        assert!(plan.is_empty());
        assert!(plan.labels.is_empty());
        assert!(plan.primitives().is_empty());
        assert_eq!(plan.width, 1000.0);
    }

    #[test]
    fn request_line_is_case_insensitive() {
        let stations = purple_line(5);
        let plan = compute_layout(
            &DiagramRequest::new(" purple ", Viewport::wide(1000.0)),
            &stations,
            &Theme::night(),
            &LayoutConfig::default(),
        );
        assert_eq!(plan.line, "PURPLE");
        assert_eq!(plan.station_count(), 5);
    }

    #[test]
    fn complement_color_comes_from_anchor_lines() {
        let mut stations = purple_line(5);
        stations[2] = station("hub", &["PURPLE", "YELLOW"], true, 3);
        let config = LayoutConfig::default();
        let plan = compute_layout(
            &DiagramRequest::new("PURPLE", Viewport::wide(1000.0)),
            &stations,
            &Theme::night(),
            &config,
        );
        assert_eq!(plan.anchor.as_ref().unwrap().id, "hub");
        assert_eq!(plan.complement_color.as_deref(), Some("#f59e0b"));
    }

    #[test]
    fn complement_color_falls_back_to_preferred_then_default() {
        let stations = purple_line(3);
        let mut config = LayoutConfig::default();
        let request = DiagramRequest::new("PURPLE", Viewport::wide(1000.0));
        let plan = compute_layout(&request, &stations, &Theme::night(), &config);
        assert_eq!(plan.complement_color.as_deref(), Some("#10b981"));

        config.anchor.preferred_complements.clear();
        config.anchor.default_complement = None;
        let plan = compute_layout(&request, &stations, &Theme::night(), &config);
        assert_eq!(plan.complement_color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn layout_is_deterministic_across_viewports() {
        let mut stations = purple_line(12);
        stations[4] = station("hub", &["PURPLE", "GREEN"], true, 5);
        let selector = AnchorSelector::default();
        for viewport in [Viewport::wide(1280.0), Viewport::narrow(375.0)] {
            let request = DiagramRequest::new("PURPLE", viewport);
            let first = compute_layout_with(
                &selector,
                &request,
                &stations,
                &Theme::night(),
                &LayoutConfig::default(),
            );
            let second = compute_layout(&request, &stations, &Theme::night(), &LayoutConfig::default());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn primitives_draw_rails_first_and_labels_last() {
        let stations = purple_line(4);
        let plan = compute_layout(
            &DiagramRequest::new("PURPLE", Viewport::wide(900.0)),
            &stations,
            &Theme::night(),
            &LayoutConfig::default(),
        );
        let prims = plan.primitives();
        assert!(matches!(prims.first(), Some(Primitive::Rail(_))));
        assert!(matches!(prims.last(), Some(Primitive::Label(_))));
        assert_eq!(
            prims.len(),
            plan.rails.len() + plan.markers.len() + plan.labels.len()
        );
    }
}
