use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub muted_text_color: String,
    pub line_color: String,
    pub node_stroke: String,
    pub cell_stroke: String,
    pub background: String,
    /// Node fill per graph category, cycled when there are more categories than colors.
    pub category_colors: Vec<String>,
}

impl Theme {
    pub fn github() -> Self {
        Self {
            font_family: "-apple-system, Segoe UI, Helvetica, Arial, sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#24292F".to_string(),
            muted_text_color: "#57606A".to_string(),
            line_color: "#999999".to_string(),
            node_stroke: "#FFFFFF".to_string(),
            cell_stroke: "#1B1F2310".to_string(),
            background: "#FFFFFF".to_string(),
            category_colors: [
                "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B",
            ]
            .iter()
            .map(|value| value.to_string())
            .collect(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "-apple-system, Segoe UI, Helvetica, Arial, sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#E6EDF3".to_string(),
            muted_text_color: "#7D8590".to_string(),
            line_color: "#6E7681".to_string(),
            node_stroke: "#0D1117".to_string(),
            cell_stroke: "#FFFFFF0D".to_string(),
            background: "#0D1117".to_string(),
            category_colors: [
                "#58A6FF", "#F0883E", "#3FB950", "#F85149", "#BC8CFF", "#D29922",
            ]
            .iter()
            .map(|value| value.to_string())
            .collect(),
        }
    }

    pub fn category_color(&self, category: usize) -> &str {
        if self.category_colors.is_empty() {
            return &self.line_color;
        }
        &self.category_colors[category % self.category_colors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::github()
    }
}
