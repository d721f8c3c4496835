//! Anchor selection: which station a line's diagram is centered on.
//!
//! Selection runs an ordered list of [`AnchorRule`]s; the first rule that returns a station
//! wins. The default order is landmark override, interchange scoring, median fallback, so
//! a non-empty working set always yields exactly one anchor.

use crate::branch::working_set;
use crate::config::{AnchorConfig, ComplementPolicy};
use crate::station::Station;
use regex::{Regex, RegexBuilder};

/// Everything a rule may look at. `ordered` is the working set ascending by sequence.
#[derive(Debug, Clone, Copy)]
pub struct AnchorContext<'s, 'a> {
    pub line: &'s str,
    pub ordered: &'s [&'a Station],
    pub median: &'a Station,
    pub median_seq: i64,
}

impl<'s, 'a> AnchorContext<'s, 'a> {
    /// `None` when the working set is empty.
    pub fn new(line: &'s str, ordered: &'s [&'a Station]) -> Option<Self> {
        let median = *ordered.get(ordered.len() / 2)?;
        let median_seq = median.seq_for(line)?;
        Some(Self {
            line,
            ordered,
            median,
            median_seq,
        })
    }
}

pub trait AnchorRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn pick<'a>(&self, ctx: &AnchorContext<'_, 'a>) -> Option<&'a Station>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorChoice<'a> {
    pub station: &'a Station,
    pub rule: &'static str,
}

/// Named hubs always win, regardless of how they would score.
#[derive(Debug, Clone, Default)]
pub struct LandmarkOverride {
    patterns: Vec<Regex>,
}

impl LandmarkOverride {
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(err) => {
                        tracing::warn!(pattern = %pattern, error = %err, "dropping landmark pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }
}

impl AnchorRule for LandmarkOverride {
    fn name(&self) -> &'static str {
        "landmark"
    }

    fn pick<'a>(&self, ctx: &AnchorContext<'_, 'a>) -> Option<&'a Station> {
        ctx.ordered
            .iter()
            .copied()
            .find(|s| s.interchange && s.serves(ctx.line) && self.matches(&s.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScore {
    pub degree: u32,
    pub distance: u64,
}

impl CandidateScore {
    /// Strictly better: higher degree, then closer to the median.
    pub fn beats(&self, other: &CandidateScore) -> bool {
        self.degree > other.degree || (self.degree == other.degree && self.distance < other.distance)
    }
}

/// Best-connected interchange, nearest the middle of the line on ties.
#[derive(Debug, Clone)]
pub struct InterchangeScoring {
    config: AnchorConfig,
}

impl InterchangeScoring {
    pub fn new(config: &AnchorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn policy(&self) -> ComplementPolicy {
        self.config.complement_policy
    }

    /// `None` when the station is not an eligible candidate for `line`.
    pub fn score(&self, line: &str, station: &Station, median_seq: i64) -> Option<CandidateScore> {
        let eligible = station.interchange
            && station.serves(line)
            && station.lines.iter().any(|code| code != line);
        if !eligible {
            return None;
        }
        let seq = station.seq_for(line)?;
        let mut degree = station.distinct_line_count() as u32;
        if self.config.complement_policy == ComplementPolicy::FixedComplement {
            if let Some(preferred) = self.config.preferred_complement(line) {
                if station.serves(preferred) {
                    degree = degree.saturating_add(self.config.complement_weight);
                }
            }
        }
        Some(CandidateScore {
            degree,
            distance: seq.abs_diff(median_seq),
        })
    }
}

impl AnchorRule for InterchangeScoring {
    fn name(&self) -> &'static str {
        "interchange"
    }

    fn pick<'a>(&self, ctx: &AnchorContext<'_, 'a>) -> Option<&'a Station> {
        let mut best: Option<(&'a Station, CandidateScore)> = None;
        for station in ctx.ordered.iter().copied() {
            let Some(score) = self.score(ctx.line, station, ctx.median_seq) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, current)| score.beats(current)) {
                best = Some((station, score));
            }
        }
        best.map(|(station, _)| station)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MedianFallback;

impl AnchorRule for MedianFallback {
    fn name(&self) -> &'static str {
        "median"
    }

    fn pick<'a>(&self, ctx: &AnchorContext<'_, 'a>) -> Option<&'a Station> {
        Some(ctx.median)
    }
}

pub struct AnchorSelector {
    rules: Vec<Box<dyn AnchorRule>>,
}

impl std::fmt::Debug for AnchorSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorSelector")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl AnchorSelector {
    pub fn new(config: &AnchorConfig) -> Self {
        Self::with_rules(vec![
            Box::new(LandmarkOverride::new(&config.landmark_patterns)),
            Box::new(InterchangeScoring::new(config)),
            Box::new(MedianFallback),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn AnchorRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn select<'a>(&self, line: &str, stations: &'a [Station]) -> Option<AnchorChoice<'a>> {
        self.select_in(line, &working_set(line, stations))
    }

    /// Select from a working set already sorted by sequence.
    pub fn select_in<'a>(&self, line: &str, ordered: &[&'a Station]) -> Option<AnchorChoice<'a>> {
        let ctx = AnchorContext::new(line, ordered)?;
        let choice = self.rules.iter().find_map(|rule| {
            rule.pick(&ctx).map(|station| AnchorChoice {
                station,
                rule: rule.name(),
            })
        });
        // A custom rule list may lack a fallback; the median keeps the result total.
        let choice = choice.unwrap_or(AnchorChoice {
            station: ctx.median,
            rule: "median",
        });
        tracing::debug!(line, anchor = %choice.station.name, rule = choice.rule, "anchor selected");
        Some(choice)
    }
}

impl Default for AnchorSelector {
    fn default() -> Self {
        Self::new(&AnchorConfig::default())
    }
}

pub fn select_anchor<'a>(
    line: &str,
    stations: &'a [Station],
    config: &AnchorConfig,
) -> Option<&'a Station> {
    AnchorSelector::new(config)
        .select(line, stations)
        .map(|choice| choice.station)
}

/// Line drawn as the anchor's inner ring: its first other listed line, else the configured
/// complement for `line`.
pub fn complement_line<'a>(line: &str, anchor: &'a Station, config: &'a AnchorConfig) -> Option<&'a str> {
    anchor
        .other_line(line)
        .or_else(|| config.preferred_complement(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn station(name: &str, lines: &[&str], interchange: bool, seq: i64) -> Station {
        let mut map = BTreeMap::new();
        map.insert("X".to_string(), seq);
        Station {
            id: name.to_lowercase(),
            name: name.to_string(),
            position: None,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            interchange,
            seq: map,
        }
    }

    fn plain_line(n: i64) -> Vec<Station> {
        (1..=n)
            .map(|seq| station(&format!("S{seq}"), &["X"], false, seq))
            .collect()
    }

    fn config_for_x() -> AnchorConfig {
        let mut config = AnchorConfig::default();
        config.preferred_complements.clear();
        config.preferred_complements.insert("X".to_string(), "G".to_string());
        config.default_complement = None;
        config
    }

    #[test]
    fn empty_working_set_has_no_anchor() {
        assert!(select_anchor("X", &[], &AnchorConfig::default()).is_none());
        let off_line = vec![station("Lonely", &["Y"], true, 1)];
        assert!(select_anchor("X", &off_line, &AnchorConfig::default()).is_none());
    }

    #[test]
    fn median_fallback_uses_lower_middle_by_floor() {
        let odd = plain_line(7);
        assert_eq!(select_anchor("X", &odd, &config_for_x()).unwrap().name, "S4");
        // floor(6 / 2) = 3 -> fourth station
        let even = plain_line(6);
        let choice = AnchorSelector::new(&config_for_x()).select("X", &even).unwrap();
        assert_eq!(choice.station.name, "S4");
        assert_eq!(choice.rule, "median");
    }

    #[test]
    fn seven_station_scenario_picks_the_interchange() {
        let mut stations = plain_line(7);
        stations[3] = station("Hub", &["X", "Y"], true, 4);
        let choice = AnchorSelector::new(&config_for_x()).select("X", &stations).unwrap();
        assert_eq!(choice.station.name, "Hub");
        assert_eq!(choice.rule, "interchange");
    }

    #[test]
    fn landmark_rule_matches_case_insensitively() {
        let rule = LandmarkOverride::new(&["majestic".to_string()]);
        let stations = vec![
            station("Nadaprabhu Kempegowda Station, MAJESTIC", &["X", "G"], true, 5),
            station("Majestic Bus Stand", &["X"], false, 6),
        ];
        let ordered: Vec<&Station> = stations.iter().collect();
        let ctx = AnchorContext::new("X", &ordered).unwrap();
        assert_eq!(rule.pick(&ctx).unwrap().seq_for("X"), Some(5));
    }

    #[test]
    fn landmark_requires_interchange_flag() {
        let rule = LandmarkOverride::new(&["majestic".to_string()]);
        let stations = vec![station("Majestic", &["X", "G"], false, 1)];
        let ordered: Vec<&Station> = stations.iter().collect();
        let ctx = AnchorContext::new("X", &ordered).unwrap();
        assert!(rule.pick(&ctx).is_none());
    }

    #[test]
    fn invalid_landmark_patterns_are_skipped() {
        let rule = LandmarkOverride::new(&["(broken".to_string(), "central".to_string()]);
        assert!(rule.matches("Central Silk Board"));
        assert!(!rule.matches("(broken"));
    }

    #[test]
    fn landmark_overrides_higher_degree_interchange() {
        let mut config = config_for_x();
        config.landmark_patterns = vec!["cubbon".to_string()];
        let stations = vec![
            station("Cubbon Park", &["X", "Y"], true, 1),
            station("Mega Hub", &["X", "Y", "Z", "G"], true, 3),
            station("Plain", &["X"], false, 2),
        ];
        let choice = AnchorSelector::new(&config).select("X", &stations).unwrap();
        assert_eq!(choice.station.name, "Cubbon Park");
        assert_eq!(choice.rule, "landmark");
    }

    #[test]
    fn scoring_prefers_degree_then_distance_then_first_seen() {
        let scoring = InterchangeScoring::new(&config_for_x());
        let stations = vec![
            station("Near", &["X", "Y"], true, 4),
            station("Far", &["X", "Y"], true, 1),
            station("Twin", &["X", "Y"], true, 6),
            station("Median", &["X"], false, 5),
            station("Pad", &["X"], false, 7),
        ];
        let mut ordered: Vec<&Station> = stations.iter().collect();
        ordered.sort_by_key(|s| s.seq_for("X"));
        let ctx = AnchorContext::new("X", &ordered).unwrap();
        assert_eq!(ctx.median_seq, 5);
        // Near (|4-5| = 1) and Twin (|6-5| = 1) tie; Near comes first in sequence order.
        assert_eq!(scoring.pick(&ctx).unwrap().name, "Near");
    }

    #[test]
    fn scoring_ignores_non_candidates() {
        let scoring = InterchangeScoring::new(&config_for_x());
        assert!(scoring.score("X", &station("Solo", &["X"], true, 1), 1).is_none());
        assert!(scoring.score("X", &station("Flagless", &["X", "Y"], false, 1), 1).is_none());
        assert!(scoring.score("X", &station("Elsewhere", &["Y", "Z"], true, 1), 1).is_none());
        let score = scoring.score("X", &station("Dup", &["X", "Y", "Y"], true, 9), 4).unwrap();
        assert_eq!(score, CandidateScore { degree: 2, distance: 5 });
    }

    #[test]
    fn fixed_complement_policy_weights_the_preferred_line() {
        let stations = vec![
            station("Wide", &["X", "Y", "Z"], true, 4),
            station("Paired", &["X", "G"], true, 1),
            station("Filler", &["X"], false, 5),
        ];
        let fixed = config_for_x();
        assert_eq!(
            select_anchor("X", &stations, &fixed).unwrap().name,
            "Paired"
        );

        let mut anchor_lines = config_for_x();
        anchor_lines.complement_policy = ComplementPolicy::AnchorLines;
        assert_eq!(
            select_anchor("X", &stations, &anchor_lines).unwrap().name,
            "Wide"
        );
    }

    #[test]
    fn selection_is_deterministic() {
        let stations = vec![
            station("A", &["X", "Y"], true, 3),
            station("B", &["X", "Z"], true, 7),
            station("C", &["X"], false, 5),
        ];
        let selector = AnchorSelector::default();
        let first = selector.select("X", &stations).unwrap();
        for _ in 0..10 {
            assert_eq!(selector.select("X", &stations).unwrap(), first);
        }
    }

    #[test]
    fn custom_rule_list_without_fallback_still_returns_median() {
        let selector = AnchorSelector::with_rules(vec![Box::new(LandmarkOverride::default())]);
        let stations = plain_line(5);
        let choice = selector.select("X", &stations).unwrap();
        assert_eq!(choice.station.name, "S3");
        assert_eq!(selector.rule_names(), ["landmark"]);
    }

    #[test]
    fn complement_prefers_anchor_lines_then_config() {
        let config = config_for_x();
        let hub = station("Hub", &["X", "Y"], true, 1);
        assert_eq!(complement_line("X", &hub, &config), Some("Y"));
        let lonely = station("Lonely", &["X"], false, 1);
        assert_eq!(complement_line("X", &lonely, &config), Some("G"));
        let mut bare = config_for_x();
        bare.preferred_complements.clear();
        assert_eq!(complement_line("X", &lonely, &bare), None);
    }

    #[test]
    fn oversized_complement_weight_saturates() {
        let mut config = config_for_x();
        config.complement_weight = u32::MAX;
        let stations = vec![
            station("A", &["X"], false, 1),
            station("Near", &["X", "G"], true, 2),
            station("Busy", &["X", "Y", "Z"], true, 3),
            station("Far", &["X", "G", "Y"], true, 5),
            station("B", &["X"], false, 6),
        ];
        let scoring = InterchangeScoring::new(&config);
        let near = scoring.score("X", &stations[1], 3).unwrap();
        let far = scoring.score("X", &stations[3], 3).unwrap();
        assert_eq!(near.degree, u32::MAX);
        assert_eq!(far.degree, u32::MAX);
        // both saturate, so distance to the median decides
        assert_eq!(select_anchor("X", &stations, &config).unwrap().name, "Near");
    }
}
