use crate::layout::{DiagramRequest, LabelStyle, LayoutPlan, PlacedStation};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub line: String,
    pub mode: String,
    pub narrow: bool,
    pub width: f32,
    pub height: f32,
    pub line_color: String,
    pub complement_color: Option<String>,
    pub anchor: Option<StationDump>,
    pub branch_a: Vec<StationDump>,
    pub branch_b: Vec<StationDump>,
    pub rails: Vec<RailDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDump {
    pub id: String,
    pub name: String,
    pub seq: i64,
    pub x: f32,
    pub y: f32,
    pub labeled: bool,
}

#[derive(Debug, Serialize)]
pub struct RailDump {
    pub color: String,
    pub width: f32,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub text: String,
    pub style: String,
    pub x: f32,
    pub y: f32,
    pub anchor: String,
    pub rotation: Option<f32>,
}

impl LayoutDump {
    pub fn from_plan(plan: &LayoutPlan, request: &DiagramRequest) -> Self {
        let station = |placed: &PlacedStation| StationDump {
            id: placed.id.clone(),
            name: placed.name.clone(),
            seq: placed.seq,
            x: placed.x,
            y: placed.y,
            labeled: plan.label_for(&placed.id).is_some(),
        };

        let rails = plan
            .rails
            .iter()
            .map(|rail| RailDump {
                color: rail.color.clone(),
                width: rail.width,
                points: rail.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        let labels = plan
            .labels
            .iter()
            .map(|label| LabelDump {
                text: label.text.clone(),
                style: match label.style {
                    LabelStyle::Station => "station",
                    LabelStyle::Anchor => "anchor",
                    LabelStyle::Caption => "caption",
                }
                .to_string(),
                x: label.x,
                y: label.y,
                anchor: label.anchor.as_str().to_string(),
                rotation: label.rotation,
            })
            .collect();

        LayoutDump {
            line: plan.line.clone(),
            mode: format!("{:?}", plan.mode),
            narrow: request.viewport.narrow,
            width: plan.width,
            height: plan.height,
            line_color: plan.line_color.clone(),
            complement_color: plan.complement_color.clone(),
            anchor: plan.anchor.as_ref().map(station),
            branch_a: plan.branch_a.iter().map(station).collect(),
            branch_b: plan.branch_b.iter().map(station).collect(),
            rails,
            labels,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_layout_dump(
    path: Option<&Path>,
    plan: &LayoutPlan,
    request: &DiagramRequest,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_plan(plan, request);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &dump)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
