//! Station records and the normalizer that canonicalizes raw GeoJSON features.
//!
//! Raw datasets are loose: `lines` may be a CSV string or an array, `interchange` may be a
//! boolean, a number or any spelling of "true", and per-line ordering lives in ad hoc
//! `seq_<line>` properties. [`normalize`] turns all of that into [`Station`] values with an
//! explicit line → sequence mapping. It never fails; values it cannot read are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

static SEQ_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^seq_(.+)$").expect("static regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatureCollection {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// `[lng, lat]`, carried through but never used for the schematic.
    pub position: Option<[f64; 2]>,
    pub lines: Vec<String>,
    pub interchange: bool,
    pub seq: BTreeMap<String, i64>,
}

impl Station {
    pub fn seq_for(&self, line: &str) -> Option<i64> {
        self.seq.get(line).copied()
    }

    pub fn serves(&self, line: &str) -> bool {
        self.lines.iter().any(|code| code == line)
    }

    /// Member of `line`'s working set: lists the line and has an ordering on it.
    pub fn on_line(&self, line: &str) -> bool {
        self.serves(line) && self.seq.contains_key(line)
    }

    pub fn distinct_line_count(&self) -> usize {
        let mut seen: Vec<&str> = Vec::with_capacity(self.lines.len());
        for code in &self.lines {
            if !seen.contains(&code.as_str()) {
                seen.push(code);
            }
        }
        seen.len()
    }

    /// First listed line other than `line`.
    pub fn other_line(&self, line: &str) -> Option<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .find(|code| *code != line)
    }

    /// Canonical raw record; normalizing it yields this station again.
    pub fn to_feature(&self) -> RawFeature {
        let mut props = Map::new();
        props.insert("id".to_string(), Value::String(self.id.clone()));
        props.insert("name".to_string(), Value::String(self.name.clone()));
        props.insert(
            "lines".to_string(),
            Value::Array(self.lines.iter().cloned().map(Value::String).collect()),
        );
        props.insert("interchange".to_string(), Value::Bool(self.interchange));
        let mut verbatim = Map::new();
        for (line, seq) in &self.seq {
            // `seq_<code>` is read back uppercased; codes that would not survive that go
            // into a `seq` object instead.
            if line.to_lowercase().to_uppercase() == *line {
                props.insert(seq_key(line), Value::from(*seq));
            } else {
                verbatim.insert(line.clone(), Value::from(*seq));
            }
        }
        if !verbatim.is_empty() {
            props.insert("seq".to_string(), Value::Object(verbatim));
        }
        let geometry = self.position.map(|[lng, lat]| {
            serde_json::json!({ "type": "Point", "coordinates": [lng, lat] })
        });
        RawFeature {
            kind: Some("Feature".to_string()),
            properties: Some(props),
            geometry,
        }
    }
}

/// Property name carrying a station's sequence on `line` in raw datasets.
pub fn seq_key(line: &str) -> String {
    format!("seq_{}", line.to_lowercase())
}

pub fn normalize(collection: &RawFeatureCollection) -> Vec<Station> {
    collection.features.iter().map(normalize_feature).collect()
}

pub fn normalize_feature(feature: &RawFeature) -> Station {
    let empty = Map::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    let id = props.get("id").map(value_to_string).unwrap_or_default();
    let name = props
        .get("name")
        .map(value_to_string)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| id.clone());

    let mut seq = BTreeMap::new();
    if let Some(Value::Object(map)) = props.get("seq") {
        for (line, value) in map {
            insert_seq(&mut seq, line, value);
        }
    }
    for (key, value) in props {
        if let Some(caps) = SEQ_KEY_RE.captures(key) {
            insert_seq(&mut seq, &caps[1], value);
        }
    }

    Station {
        id,
        name,
        position: feature.geometry.as_ref().and_then(point_coordinates),
        lines: props.get("lines").map(coerce_lines).unwrap_or_default(),
        interchange: props.get("interchange").is_some_and(is_truthy),
        seq,
    }
}

pub fn to_feature_collection(stations: &[Station]) -> RawFeatureCollection {
    RawFeatureCollection {
        kind: Some("FeatureCollection".to_string()),
        features: stations.iter().map(Station::to_feature).collect(),
    }
}

/// `true`, `1`, `"1"` and any casing of `"true"`; nothing else.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64() == Some(1.0),
        Value::String(text) => text == "1" || text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

pub fn coerce_lines(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        Value::Null => Vec::new(),
        other => value_to_string(other)
            .split(',')
            .map(str::to_string)
            .collect(),
    };
    raw.iter()
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Integral sequence value, or `None` for anything that is not a finite whole number.
pub fn parse_seq(value: &Value) -> Option<i64> {
    match value {
        Value::Number(num) => num.as_i64().or_else(|| num.as_f64().and_then(integral)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn insert_seq(seq: &mut BTreeMap<String, i64>, line: &str, value: &Value) {
    let line = line.trim().to_uppercase();
    if line.is_empty() {
        return;
    }
    if let Some(index) = parse_seq(value) {
        seq.insert(line, index);
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn point_coordinates(geometry: &Value) -> Option<[f64; 2]> {
    let coords = geometry.get("coordinates")?.as_array()?;
    let lng = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some([lng, lat])
}
