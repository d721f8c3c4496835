use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub caption_font_size: f32,
    pub label_color: String,
    pub caption_color: String,
    pub marker_fill: String,
    pub background: String,
}

impl Theme {
    /// Dark card palette the diagram was originally designed against.
    pub fn night() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            caption_font_size: 11.0,
            label_color: "#cbd5e1".to_string(),
            caption_color: "#94a3b8".to_string(),
            marker_fill: "#ffffff".to_string(),
            background: "#0e1726".to_string(),
        }
    }

    pub fn day() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            caption_font_size: 11.0,
            label_color: "#1C2430".to_string(),
            caption_color: "#5B6B82".to_string(),
            marker_fill: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "night" | "dark" | "default" => Some(Self::night()),
            "day" | "light" => Some(Self::day()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::night()
    }
}
