use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub container_fill: String,
    pub container_border: String,
    pub stage_fill: String,
    pub stage_border: String,
    pub circle_fill: String,
    pub circle_border: String,
    pub line_color: String,
    pub grid_color: String,
    pub tab_fill: String,
    pub tab_active_fill: String,
    pub chart_colors: [String; 8],
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            container_fill: "#F7FAFF".to_string(),
            container_border: "#D7E0F0".to_string(),
            stage_fill: "#EEF2FF".to_string(),
            stage_border: "#6366F1".to_string(),
            circle_fill: "#ECFDF5".to_string(),
            circle_border: "#10B981".to_string(),
            line_color: "#7A8AA6".to_string(),
            grid_color: "#E5E7EB".to_string(),
            tab_fill: "#F3F4F6".to_string(),
            tab_active_fill: "#6366F1".to_string(),
            chart_colors: [
                "#6366F1".to_string(),
                "#10B981".to_string(),
                "#F59E0B".to_string(),
                "#EF4444".to_string(),
                "#8B5CF6".to_string(),
                "#06B6D4".to_string(),
                "#EC4899".to_string(),
                "#84CC16".to_string(),
            ],
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#111827".to_string(),
            text_color: "#F9FAFB".to_string(),
            container_fill: "#1F2937".to_string(),
            container_border: "#374151".to_string(),
            stage_fill: "#312E81".to_string(),
            stage_border: "#818CF8".to_string(),
            circle_fill: "#064E3B".to_string(),
            circle_border: "#34D399".to_string(),
            line_color: "#9CA3AF".to_string(),
            grid_color: "#374151".to_string(),
            tab_fill: "#1F2937".to_string(),
            tab_active_fill: "#818CF8".to_string(),
            chart_colors: [
                "#818CF8".to_string(),
                "#34D399".to_string(),
                "#FBBF24".to_string(),
                "#F87171".to_string(),
                "#A78BFA".to_string(),
                "#22D3EE".to_string(),
                "#F472B6".to_string(),
                "#A3E635".to_string(),
            ],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" | "default" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    pub fn chart_color(&self, index: usize) -> &str {
        &self.chart_colors[index % self.chart_colors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
