// Label thinning and staggering shared by the desktop and mobile strategies.
// Works on plain offsets along a rail; no knowledge of rendering.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Greedy outward sweep over label positions along one rail.
///
/// `offsets` must be ordered from the anchor outward. A label is kept when it is at least
/// `min_gap` away from the last kept label, otherwise it is skipped. Kept labels are never
/// revoked. The terminal (last) entry is always kept, even when it sits closer than
/// `min_gap` to its kept neighbour. Returns kept indices in ascending order.
pub fn thin_outward(offsets: &[f32], min_gap: f32) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(offsets.len());
    let Some(terminal) = offsets.len().checked_sub(1) else {
        return kept;
    };
    for (idx, &pos) in offsets.iter().enumerate() {
        let clear = kept
            .last()
            .is_none_or(|&prev| (pos - offsets[prev]).abs() >= min_gap);
        if clear || idx == terminal {
            kept.push(idx);
        }
    }
    let dropped = offsets.len() - kept.len();
    if dropped > 0 {
        tracing::debug!(total = offsets.len(), dropped, min_gap, "thinned labels");
    }
    kept
}

/// Even positions label to the left, odd to the right.
pub fn alternate_side(index: usize) -> Side {
    if index % 2 == 0 { Side::Left } else { Side::Right }
}

/// Vertical stagger for the `index`-th label, cycling through `pattern`.
pub fn jitter(pattern: &[f32], index: usize) -> f32 {
    if pattern.is_empty() {
        return 0.0;
    }
    pattern[index % pattern.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_everything_when_gap_is_zero() {
        let offsets = [10.0, 20.0, 30.0];
        assert_eq!(thin_outward(&offsets, 0.0), vec![0, 1, 2]);
    }

    #[test]
    fn empty_rail_keeps_nothing() {
        assert!(thin_outward(&[], 40.0).is_empty());
    }

    #[test]
    fn single_station_is_always_labeled() {
        assert_eq!(thin_outward(&[36.0], 1000.0), vec![0]);
    }

    #[test]
    fn skips_crowded_labels() {
        let offsets = [36.0, 72.0, 108.0, 144.0, 180.0];
        // gap 40: keep 36, skip 72 (36 away), keep 108, skip 144, keep 180 (terminal)
        assert_eq!(thin_outward(&offsets, 40.0), vec![0, 2, 4]);
    }

    #[test]
    fn crowded_terminal_keeps_placed_neighbour() {
        let offsets = [36.0, 72.0, 108.0, 144.0];
        // keep 36, skip 72, keep 108; terminal 144 is only 36 from 108 but both stay
        assert_eq!(thin_outward(&offsets, 40.0), vec![0, 2, 3]);
    }

    #[test]
    fn terminal_survives_huge_gap() {
        let offsets: Vec<f32> = (1..=20).map(|i| i as f32 * 36.0).collect();
        let kept = thin_outward(&offsets, 10_000.0);
        assert_eq!(kept, vec![0, 19]);
    }

    #[test]
    fn works_with_leftward_offsets() {
        let offsets = [-36.0, -72.0, -108.0];
        assert_eq!(thin_outward(&offsets, 50.0), vec![0, 2]);
    }

    #[test]
    fn sides_alternate() {
        assert_eq!(alternate_side(0), Side::Left);
        assert_eq!(alternate_side(1), Side::Right);
        assert_eq!(alternate_side(6), Side::Left);
    }

    #[test]
    fn jitter_cycles_through_pattern() {
        let pattern = [0.0, -6.0, 0.0, 6.0];
        let values: Vec<f32> = (0..6).map(|i| jitter(&pattern, i)).collect();
        assert_eq!(values, vec![0.0, -6.0, 0.0, 6.0, 0.0, -6.0]);
        assert_eq!(jitter(&[], 3), 0.0);
    }
}
