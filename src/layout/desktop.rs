use crate::config::{DesktopConfig, LayoutConfig, StepMode};
use crate::theme::Theme;

use super::label_placement::thin_outward;
use super::{LayoutMode, LayoutPlan, LayoutStrategy, PlacedStation, RailSegment, Scene, TextAnchor, station_label};

/// Two parallel rows joined by a vertical connector at the anchor.
///
/// The later branch runs rightwards on the top row, the earlier branch leftwards on the
/// bottom row. Labels are slanted so long names fit in a narrow column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desktop;

/// Spacing between stations on a row holding `count` stations.
pub(crate) fn row_step(width: f32, count: usize, cfg: &DesktopConfig) -> f32 {
    if count == 0 {
        return cfg.max_step;
    }
    let raw = (width / 2.0 - cfg.pad_x) / count as f32;
    raw.max(cfg.min_step).min(cfg.max_step)
}

impl LayoutStrategy for Desktop {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn layout(&self, scene: &Scene<'_>, theme: &Theme, config: &LayoutConfig) -> LayoutPlan {
        let cfg = &config.desktop;
        let cx = scene.width / 2.0;
        let top_y = cfg.top_y;
        let bottom_y = cfg.bottom_y;
        let mid_y = (top_y + bottom_y) / 2.0;

        let before = &scene.branches.before;
        let after = &scene.branches.after;
        let (step_before, step_after) = match cfg.step_mode {
            StepMode::PerBranch => (
                row_step(scene.width, before.len(), cfg),
                row_step(scene.width, after.len(), cfg),
            ),
            StepMode::Shared => {
                let step = row_step(scene.width, before.len().max(after.len()), cfg);
                (step, step)
            }
        };

        let mut plan = scene.plan(LayoutMode::Desktop, cfg.height);

        let top: Vec<PlacedStation> = after
            .iter()
            .enumerate()
            .map(|(i, station)| scene.place(station, cx + step_after * (i + 1) as f32, top_y))
            .collect();
        // nearest the anchor first
        let bottom: Vec<PlacedStation> = before
            .iter()
            .rev()
            .enumerate()
            .map(|(i, station)| scene.place(station, cx - step_before * (i + 1) as f32, bottom_y))
            .collect();

        if let Some(last) = top.last() {
            plan.rails.push(RailSegment {
                points: vec![(cx, top_y), (last.x, top_y)],
                color: scene.line_color.to_string(),
                width: cfg.rail_width,
            });
        }
        if let Some(last) = bottom.last() {
            plan.rails.push(RailSegment {
                points: vec![(last.x, bottom_y), (cx, bottom_y)],
                color: scene.line_color.to_string(),
                width: cfg.rail_width,
            });
        }
        plan.rails.push(RailSegment {
            points: vec![(cx, bottom_y), (cx, top_y)],
            color: scene.line_color.to_string(),
            width: cfg.rail_width,
        });

        for station in top.iter().chain(bottom.iter()) {
            plan.markers
                .push(scene.station_marker(station, cfg.marker_radius, cfg.marker_stroke_width, theme));
        }

        let slant = Some(-cfg.label_slant);
        let top_offsets: Vec<f32> = top.iter().map(|s| s.x - cx).collect();
        for idx in thin_outward(&top_offsets, config.labels.desktop_top_min_gap) {
            let station = &top[idx];
            plan.labels.push(station_label(
                station,
                station.x,
                top_y - cfg.label_gap_top,
                TextAnchor::Start,
                slant,
            ));
        }
        let bottom_offsets: Vec<f32> = bottom.iter().map(|s| s.x - cx).collect();
        for idx in thin_outward(&bottom_offsets, config.labels.desktop_bottom_min_gap) {
            let station = &bottom[idx];
            plan.labels.push(station_label(
                station,
                station.x,
                bottom_y + cfg.label_gap_bottom,
                TextAnchor::End,
                slant,
            ));
        }

        let anchor = scene.place(scene.anchor, cx, mid_y);
        plan.markers.extend(scene.anchor_rings(
            &anchor,
            (cfg.anchor_outer_radius, cfg.anchor_ring_width),
            (cfg.anchor_inner_radius, cfg.anchor_ring_width),
            theme,
        ));
        plan.labels.push(scene.anchor_label(
            &anchor,
            cx,
            mid_y - cfg.anchor_label_offset,
            TextAnchor::Middle,
        ));
        plan.labels.push(scene.caption_label(cx, mid_y + cfg.caption_offset));

        plan.anchor = Some(anchor);
        plan.branch_a = bottom.into_iter().rev().collect();
        plan.branch_b = top;
        plan
    }
}
