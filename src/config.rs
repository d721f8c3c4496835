use crate::theme::Theme;
use anyhow::Context;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_LINES: [(&str, &str, &str); 3] = [
    ("PURPLE", "#7c3aed", "Purple Line"),
    ("GREEN", "#10b981", "Green Line"),
    ("YELLOW", "#f59e0b", "Yellow Line"),
];

const DEFAULT_LANDMARKS: [&str; 2] = [r"\bmajestic\b", r"kempegowda"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub code: String,
    pub color: String,
    pub name: Option<String>,
}

/// Process-wide line catalog. Codes are stored uppercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCatalog {
    pub lines: Vec<LineSpec>,
    pub fallback_color: String,
}

impl LineCatalog {
    pub fn get(&self, code: &str) -> Option<&LineSpec> {
        self.lines
            .iter()
            .find(|spec| spec.code.eq_ignore_ascii_case(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn color_of(&self, code: &str) -> &str {
        self.get(code)
            .map(|spec| spec.color.as_str())
            .unwrap_or(self.fallback_color.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|spec| spec.code.as_str())
    }

    /// Insert or recolor a line.
    pub fn set_color(&mut self, code: &str, color: &str) {
        let code = code.trim().to_uppercase();
        if let Some(spec) = self.lines.iter_mut().find(|spec| spec.code == code) {
            spec.color = color.to_string();
        } else {
            self.lines.push(LineSpec {
                code,
                color: color.to_string(),
                name: None,
            });
        }
    }
}

impl Default for LineCatalog {
    fn default() -> Self {
        Self {
            lines: DEFAULT_LINES
                .iter()
                .map(|(code, color, name)| LineSpec {
                    code: code.to_string(),
                    color: color.to_string(),
                    name: Some(name.to_string()),
                })
                .collect(),
            fallback_color: "#94a3b8".to_string(),
        }
    }
}

/// How the preferred complementary line feeds into anchor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplementPolicy {
    /// Candidates listing the line's configured complement get `complement_weight` extra score.
    FixedComplement,
    /// No score weight; the complement comes from the chosen anchor's own line list.
    AnchorLines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Case-insensitive regexes matched against station names.
    pub landmark_patterns: Vec<String>,
    pub complement_policy: ComplementPolicy,
    pub preferred_complements: BTreeMap<String, String>,
    pub default_complement: Option<String>,
    pub complement_weight: u32,
    pub default_secondary_color: String,
}

impl AnchorConfig {
    /// Configured complement for `line`, never the line itself.
    pub fn preferred_complement(&self, line: &str) -> Option<&str> {
        self.preferred_complements
            .get(line)
            .or(self.default_complement.as_ref())
            .map(String::as_str)
            .filter(|other| !other.eq_ignore_ascii_case(line))
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        let mut preferred_complements = BTreeMap::new();
        preferred_complements.insert("PURPLE".to_string(), "GREEN".to_string());
        preferred_complements.insert("GREEN".to_string(), "PURPLE".to_string());
        Self {
            landmark_patterns: DEFAULT_LANDMARKS.iter().map(|p| p.to_string()).collect(),
            complement_policy: ComplementPolicy::FixedComplement,
            preferred_complements,
            default_complement: Some("GREEN".to_string()),
            complement_weight: 2,
            default_secondary_color: "#ffffff".to_string(),
        }
    }
}

/// Label thinning and staggering knobs shared by all layout strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPolicy {
    pub desktop_top_min_gap: f32,
    pub desktop_bottom_min_gap: f32,
    pub mobile_min_gap: f32,
    pub jitter: Vec<f32>,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            desktop_top_min_gap: 34.0,
            desktop_bottom_min_gap: 42.0,
            mobile_min_gap: 0.0,
            jitter: vec![0.0, -6.0, 0.0, 6.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepMode {
    PerBranch,
    Shared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopConfig {
    pub height: f32,
    pub top_y: f32,
    pub bottom_y: f32,
    pub pad_x: f32,
    pub min_step: f32,
    pub max_step: f32,
    pub step_mode: StepMode,
    pub rail_width: f32,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    pub anchor_outer_radius: f32,
    pub anchor_inner_radius: f32,
    pub anchor_ring_width: f32,
    pub label_gap_top: f32,
    pub label_gap_bottom: f32,
    pub label_slant: f32,
    pub anchor_label_offset: f32,
    pub caption_offset: f32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            height: 380.0,
            top_y: 140.0,
            bottom_y: 240.0,
            pad_x: 56.0,
            min_step: 36.0,
            max_step: 86.0,
            step_mode: StepMode::PerBranch,
            rail_width: 6.0,
            marker_radius: 6.0,
            marker_stroke_width: 3.0,
            anchor_outer_radius: 8.0,
            anchor_inner_radius: 5.0,
            anchor_ring_width: 4.0,
            label_gap_top: 12.0,
            label_gap_bottom: 18.0,
            label_slant: 26.0,
            anchor_label_offset: 18.0,
            caption_offset: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MobileArrangement {
    Interleaved,
    DualRail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileConfig {
    pub arrangement: MobileArrangement,
    pub min_height: f32,
    pub base_offset: f32,
    pub step: f32,
    pub bottom_margin: f32,
    pub rail_offset: f32,
    pub rail_width: f32,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    pub anchor_inner_radius: f32,
    pub anchor_ring_width: f32,
    pub label_dx: f32,
    pub label_raise: f32,
    pub label_drop: f32,
    pub caption_offset: f32,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            arrangement: MobileArrangement::Interleaved,
            min_height: 460.0,
            base_offset: 80.0,
            step: 44.0,
            bottom_margin: 40.0,
            rail_offset: 36.0,
            rail_width: 6.0,
            marker_radius: 6.0,
            marker_stroke_width: 3.0,
            anchor_inner_radius: 4.2,
            anchor_ring_width: 4.0,
            label_dx: 12.0,
            label_raise: -10.0,
            label_drop: 14.0,
            caption_offset: 18.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub default_width: f32,
    pub narrow_breakpoint: f32,
    pub caption: String,
    pub catalog: LineCatalog,
    pub anchor: AnchorConfig,
    pub labels: LabelPolicy,
    pub desktop: DesktopConfig,
    pub mobile: MobileConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_width: 1100.0,
            narrow_breakpoint: 640.0,
            caption: "Line change".to_string(),
            catalog: LineCatalog::default(),
            anchor: AnchorConfig::default(),
            labels: LabelPolicy::default(),
            desktop: DesktopConfig::default(),
            mobile: MobileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 380.0,
            background: "#0e1726".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::night();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    lines: Option<BTreeMap<String, String>>,
    anchor: Option<AnchorConfigFile>,
    labels: Option<LabelPolicyFile>,
    desktop: Option<DesktopConfigFile>,
    mobile: Option<MobileConfigFile>,
    caption: Option<String>,
    default_width: Option<f32>,
    narrow_breakpoint: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    caption_font_size: Option<NumberOrString>,
    label_color: Option<String>,
    caption_color: Option<String>,
    marker_fill: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorConfigFile {
    landmark_patterns: Option<Vec<String>>,
    complement_policy: Option<ComplementPolicy>,
    preferred_complements: Option<BTreeMap<String, String>>,
    default_complement: Option<String>,
    complement_weight: Option<u32>,
    default_secondary_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelPolicyFile {
    desktop_top_min_gap: Option<f32>,
    desktop_bottom_min_gap: Option<f32>,
    mobile_min_gap: Option<f32>,
    jitter: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DesktopConfigFile {
    height: Option<f32>,
    top_y: Option<f32>,
    bottom_y: Option<f32>,
    pad_x: Option<f32>,
    min_step: Option<f32>,
    max_step: Option<f32>,
    step_mode: Option<StepMode>,
    label_slant: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MobileConfigFile {
    arrangement: Option<MobileArrangement>,
    min_height: Option<f32>,
    base_offset: Option<f32>,
    step: Option<f32>,
    bottom_margin: Option<f32>,
    rail_offset: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents)
}

/// Parse a JSON (or JSON5) config document and merge it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| json_err)
            .context("config is neither JSON nor JSON5")?,
    };
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.and_then(|v| v.as_f32()) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.caption_font_size.and_then(|v| v.as_f32()) {
            config.theme.caption_font_size = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.caption_color {
            config.theme.caption_color = v;
        }
        if let Some(v) = vars.marker_fill {
            config.theme.marker_fill = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(lines) = parsed.lines {
        for (code, color) in &lines {
            config.layout.catalog.set_color(code, color);
        }
    }

    if let Some(anchor) = parsed.anchor {
        if let Some(patterns) = anchor.landmark_patterns {
            for pattern in &patterns {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid landmark pattern {pattern:?}"))?;
            }
            config.layout.anchor.landmark_patterns = patterns;
        }
        if let Some(v) = anchor.complement_policy {
            config.layout.anchor.complement_policy = v;
        }
        if let Some(v) = anchor.preferred_complements {
            config.layout.anchor.preferred_complements = v
                .into_iter()
                .map(|(line, other)| (line.trim().to_uppercase(), other.trim().to_uppercase()))
                .collect();
        }
        if let Some(v) = anchor.default_complement {
            let v = v.trim().to_uppercase();
            config.layout.anchor.default_complement = (!v.is_empty()).then_some(v);
        }
        if let Some(v) = anchor.complement_weight {
            config.layout.anchor.complement_weight = v;
        }
        if let Some(v) = anchor.default_secondary_color {
            config.layout.anchor.default_secondary_color = v;
        }
    }

    if let Some(labels) = parsed.labels {
        if let Some(v) = labels.desktop_top_min_gap {
            config.layout.labels.desktop_top_min_gap = v;
        }
        if let Some(v) = labels.desktop_bottom_min_gap {
            config.layout.labels.desktop_bottom_min_gap = v;
        }
        if let Some(v) = labels.mobile_min_gap {
            config.layout.labels.mobile_min_gap = v;
        }
        if let Some(v) = labels.jitter {
            config.layout.labels.jitter = v;
        }
    }

    if let Some(desktop) = parsed.desktop {
        if let Some(v) = desktop.height {
            config.layout.desktop.height = v;
        }
        if let Some(v) = desktop.top_y {
            config.layout.desktop.top_y = v;
        }
        if let Some(v) = desktop.bottom_y {
            config.layout.desktop.bottom_y = v;
        }
        if let Some(v) = desktop.pad_x {
            config.layout.desktop.pad_x = v;
        }
        if let Some(v) = desktop.min_step {
            config.layout.desktop.min_step = v;
        }
        if let Some(v) = desktop.max_step {
            config.layout.desktop.max_step = v;
        }
        if let Some(v) = desktop.step_mode {
            config.layout.desktop.step_mode = v;
        }
        if let Some(v) = desktop.label_slant {
            config.layout.desktop.label_slant = v;
        }
        if config.layout.desktop.min_step > config.layout.desktop.max_step {
            anyhow::bail!(
                "desktop.minStep ({}) exceeds desktop.maxStep ({})",
                config.layout.desktop.min_step,
                config.layout.desktop.max_step
            );
        }
    }

    if let Some(mobile) = parsed.mobile {
        if let Some(v) = mobile.arrangement {
            config.layout.mobile.arrangement = v;
        }
        if let Some(v) = mobile.min_height {
            config.layout.mobile.min_height = v;
        }
        if let Some(v) = mobile.base_offset {
            config.layout.mobile.base_offset = v;
        }
        if let Some(v) = mobile.step {
            config.layout.mobile.step = v;
        }
        if let Some(v) = mobile.bottom_margin {
            config.layout.mobile.bottom_margin = v;
        }
        if let Some(v) = mobile.rail_offset {
            config.layout.mobile.rail_offset = v;
        }
    }

    if let Some(v) = parsed.caption {
        config.layout.caption = v;
    }
    if let Some(v) = parsed.default_width {
        config.layout.default_width = v;
    }
    if let Some(v) = parsed.narrow_breakpoint {
        config.layout.narrow_breakpoint = v;
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
