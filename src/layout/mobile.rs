use crate::config::{LayoutConfig, MobileConfig};
use crate::station::Station;
use crate::theme::Theme;

use super::label_placement::{Side, alternate_side, jitter, thin_outward};
use super::{LayoutMode, LayoutPlan, LayoutStrategy, PlacedStation, RailSegment, Scene, TextAnchor, station_label};

/// Total schematic height for `stations` stations (anchor included).
pub fn mobile_height(cfg: &MobileConfig, stations: usize) -> f32 {
    cfg.min_height
        .max(cfg.base_offset + cfg.step * (stations + 1) as f32)
}

/// One vertical spine: anchor at the bottom, then one branch outward, then the other.
/// Labels alternate sides and are staggered vertically.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileInterleaved;

/// Two vertical rails left and right of center, the right one shifted half a step so the
/// two branches never share a row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileDualRail;

/// Indices in `0..len` that keep a label after thinning, as a membership mask.
fn kept_mask(offsets: &[f32], min_gap: f32) -> Vec<bool> {
    let mut mask = vec![false; offsets.len()];
    for idx in thin_outward(offsets, min_gap) {
        mask[idx] = true;
    }
    mask
}

impl LayoutStrategy for MobileInterleaved {
    fn name(&self) -> &'static str {
        "mobile-interleaved"
    }

    fn layout(&self, scene: &Scene<'_>, theme: &Theme, config: &LayoutConfig) -> LayoutPlan {
        let cfg = &config.mobile;
        let before = &scene.branches.before;
        let after = &scene.branches.after;
        let height = mobile_height(cfg, scene.branches.len() + 1);
        let cx = scene.width / 2.0;
        let base_y = height - cfg.bottom_margin;

        let mut plan = scene.plan(LayoutMode::MobileInterleaved, height);

        let ordered: Vec<&Station> = std::iter::once(scene.anchor)
            .chain(before.iter().rev().copied())
            .chain(after.iter().copied())
            .collect();
        let placed: Vec<PlacedStation> = ordered
            .iter()
            .enumerate()
            .map(|(i, station)| scene.place(station, cx, base_y - i as f32 * cfg.step))
            .collect();

        if let Some(top) = placed.last().filter(|_| placed.len() > 1) {
            plan.rails.push(RailSegment {
                points: vec![(cx, top.y), (cx, base_y)],
                color: scene.line_color.to_string(),
                width: cfg.rail_width,
            });
        }

        // Thin each branch on its own so both terminals survive.
        let split = 1 + before.len();
        let branch_offsets = |range: std::ops::Range<usize>| -> Vec<f32> {
            placed[range].iter().map(|s| base_y - s.y).collect()
        };
        let mut labeled = vec![true];
        labeled.extend(kept_mask(&branch_offsets(1..split), config.labels.mobile_min_gap));
        labeled.extend(kept_mask(&branch_offsets(split..placed.len()), config.labels.mobile_min_gap));

        for (i, station) in placed.iter().enumerate() {
            let is_anchor = i == 0;
            if is_anchor {
                plan.markers.extend(scene.anchor_rings(
                    station,
                    (cfg.marker_radius, cfg.marker_stroke_width),
                    (cfg.anchor_inner_radius, cfg.anchor_ring_width),
                    theme,
                ));
            } else {
                plan.markers.push(scene.station_marker(
                    station,
                    cfg.marker_radius,
                    cfg.marker_stroke_width,
                    theme,
                ));
            }
            if !labeled[i] {
                continue;
            }
            let side = alternate_side(i);
            let (tx, dy, align) = match side {
                Side::Left => (cx - cfg.label_dx, cfg.label_raise, TextAnchor::End),
                Side::Right => (cx + cfg.label_dx, cfg.label_drop, TextAnchor::Start),
            };
            let ty = station.y + dy + jitter(&config.labels.jitter, i);
            let label = if is_anchor {
                scene.anchor_label(station, tx, ty, align)
            } else {
                station_label(station, tx, ty, align, None)
            };
            plan.labels.push(label);
        }
        plan.labels
            .push(scene.caption_label(cx, base_y + cfg.caption_offset));

        let mut placed = placed.into_iter();
        plan.anchor = placed.next();
        let mut branch_a: Vec<PlacedStation> = placed.by_ref().take(before.len()).collect();
        branch_a.reverse();
        plan.branch_a = branch_a;
        plan.branch_b = placed.collect();
        plan
    }
}

impl LayoutStrategy for MobileDualRail {
    fn name(&self) -> &'static str {
        "mobile-dual-rail"
    }

    fn layout(&self, scene: &Scene<'_>, theme: &Theme, config: &LayoutConfig) -> LayoutPlan {
        let cfg = &config.mobile;
        let before = &scene.branches.before;
        let after = &scene.branches.after;
        let height = mobile_height(cfg, scene.branches.len() + 1);
        let cx = scene.width / 2.0;
        let base_y = height - cfg.bottom_margin;
        let left_x = cx - cfg.rail_offset;
        let right_x = cx + cfg.rail_offset;
        let phase = cfg.step / 2.0;

        let mut plan = scene.plan(LayoutMode::MobileDualRail, height);

        // outward order, nearest the anchor first
        let left: Vec<PlacedStation> = before
            .iter()
            .rev()
            .enumerate()
            .map(|(i, station)| scene.place(station, left_x, base_y - cfg.step * (i + 1) as f32))
            .collect();
        let right: Vec<PlacedStation> = after
            .iter()
            .enumerate()
            .map(|(i, station)| {
                scene.place(station, right_x, base_y - cfg.step * (i + 1) as f32 - phase)
            })
            .collect();

        for rail in [&left, &right] {
            let (Some(first), Some(last)) = (rail.first(), rail.last()) else {
                continue;
            };
            let mut points = vec![(cx, base_y), (first.x, first.y)];
            if rail.len() > 1 {
                points.push((last.x, last.y));
            }
            plan.rails.push(RailSegment {
                points,
                color: scene.line_color.to_string(),
                width: cfg.rail_width,
            });
        }

        let text_dy = theme.font_size / 3.0;
        let rails = [
            (&left, left_x - cfg.label_dx, TextAnchor::End),
            (&right, right_x + cfg.label_dx, TextAnchor::Start),
        ];
        for (rail, label_x, align) in rails {
            let offsets: Vec<f32> = rail.iter().map(|s| base_y - s.y).collect();
            let labeled = kept_mask(&offsets, config.labels.mobile_min_gap);
            for (station, keep) in rail.iter().zip(labeled) {
                plan.markers.push(scene.station_marker(
                    station,
                    cfg.marker_radius,
                    cfg.marker_stroke_width,
                    theme,
                ));
                if keep {
                    plan.labels
                        .push(station_label(station, label_x, station.y + text_dy, align, None));
                }
            }
        }

        let anchor = scene.place(scene.anchor, cx, base_y);
        plan.markers.extend(scene.anchor_rings(
            &anchor,
            (cfg.marker_radius, cfg.marker_stroke_width),
            (cfg.anchor_inner_radius, cfg.anchor_ring_width),
            theme,
        ));
        let anchor_label_y = base_y + cfg.caption_offset;
        plan.labels
            .push(scene.anchor_label(&anchor, cx, anchor_label_y, TextAnchor::Middle));
        plan.labels.push(scene.caption_label(
            cx,
            anchor_label_y + theme.caption_font_size + 4.0,
        ));

        plan.anchor = Some(anchor);
        plan.branch_a = left.into_iter().rev().collect();
        plan.branch_b = right;
        plan
    }
}
