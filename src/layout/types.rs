use serde::Serialize;

/// Which strategy produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    Empty,
    Desktop,
    MobileInterleaved,
    MobileDualRail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelStyle {
    Station,
    /// Bold, drawn in the complement color.
    Anchor,
    /// Small muted caption under the anchor.
    Caption,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedStation {
    pub id: String,
    pub name: String,
    pub seq: i64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RailSegment {
    pub points: Vec<(f32, f32)>,
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub stroke: String,
    pub stroke_width: f32,
    pub fill: String,
    pub station_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    /// Degrees, rotated around `(x, y)`.
    pub rotation: Option<f32>,
    pub style: LabelStyle,
    pub color: Option<String>,
    pub station_id: Option<String>,
}

/// Renderer-agnostic draw list entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Rail(&'a RailSegment),
    Marker(&'a Marker),
    Label(&'a LabelEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub line: String,
    pub mode: LayoutMode,
    pub width: f32,
    pub height: f32,
    pub line_color: String,
    pub complement_color: Option<String>,
    pub anchor: Option<PlacedStation>,
    pub branch_a: Vec<PlacedStation>,
    pub branch_b: Vec<PlacedStation>,
    pub rails: Vec<RailSegment>,
    pub markers: Vec<Marker>,
    pub labels: Vec<LabelEntry>,
}

impl LayoutPlan {
    pub fn empty(line: &str, width: f32, line_color: &str) -> Self {
        Self {
            line: line.to_string(),
            mode: LayoutMode::Empty,
            width,
            height: 0.0,
            line_color: line_color.to_string(),
            complement_color: None,
            anchor: None,
            branch_a: Vec::new(),
            branch_b: Vec::new(),
            rails: Vec::new(),
            markers: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor.is_none() && self.markers.is_empty() && self.rails.is_empty()
    }

    pub fn station_count(&self) -> usize {
        self.branch_a.len() + self.branch_b.len() + usize::from(self.anchor.is_some())
    }

    pub fn label_for(&self, station_id: &str) -> Option<&LabelEntry> {
        self.labels
            .iter()
            .find(|label| label.station_id.as_deref() == Some(station_id))
    }

    /// Draw order: rails under markers under labels.
    pub fn primitives(&self) -> Vec<Primitive<'_>> {
        self.rails
            .iter()
            .map(Primitive::Rail)
            .chain(self.markers.iter().map(Primitive::Marker))
            .chain(self.labels.iter().map(Primitive::Label))
            .collect()
    }
}
