use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON config file for the binaries.
pub const CONFIG_ENV: &str = "COMMITVIZ_CONFIG";

const CALENDAR_PALETTE: [&str; 6] = [
    "#ebedf0", "#c6e48b", "#7bc96f", "#40c463", "#239a3b", "#196127",
];

const CALENDAR_THRESHOLDS: [u32; 5] = [1, 4, 7, 11, 16];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown theme '{0}' (expected 'github' or 'dark')")]
    UnknownTheme(String),
    #[error("calendar palette needs {expected} colors, got {got}")]
    Palette { expected: usize, got: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub width: f32,
    pub height: f32,
    pub node_radius: f32,
    pub label_offset: f32,
    /// Link target distance is `link_distance / weight`.
    pub link_distance: f32,
    pub charge_strength: f32,
    pub collide_radius: f32,
    pub ticks: usize,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    /// Edge stroke width is `sqrt(weight) * stroke_scale`.
    pub stroke_scale: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            node_radius: 12.0,
            label_offset: 16.0,
            link_distance: 150.0,
            charge_strength: -300.0,
            collide_radius: 30.0,
            ticks: 300,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            stroke_scale: 1.5,
        }
    }
}

impl GraphConfig {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn link_distance_for(&self, weight: f32) -> f32 {
        self.link_distance / weight.max(f32::EPSILON)
    }

    pub fn stroke_width_for(&self, weight: f32) -> f32 {
        weight.max(0.0).sqrt() * self.stroke_scale
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub cell_size: f32,
    pub cell_gap: f32,
    pub cell_radius: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub right_margin: f32,
    pub bottom_margin: f32,
    /// Ascending lower bounds of bands 1..=5; band 0 is everything below the first.
    pub thresholds: Vec<u32>,
    /// One color per band, light to dark.
    pub palette: Vec<String>,
    pub show_legend: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            cell_size: 11.0,
            cell_gap: 3.0,
            cell_radius: 2.0,
            left_margin: 32.0,
            top_margin: 24.0,
            right_margin: 16.0,
            bottom_margin: 32.0,
            thresholds: CALENDAR_THRESHOLDS.to_vec(),
            palette: CALENDAR_PALETTE.iter().map(|value| value.to_string()).collect(),
            show_legend: true,
        }
    }
}

impl CalendarConfig {
    pub fn cell_step(&self) -> f32 {
        self.cell_size + self.cell_gap
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub graph: GraphConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
    category_colors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphOverrides {
    link_distance: Option<f32>,
    charge_strength: Option<f32>,
    collide_radius: Option<f32>,
    ticks: Option<usize>,
    node_radius: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarOverrides {
    cell_size: Option<f32>,
    cell_gap: Option<f32>,
    palette: Option<Vec<String>>,
    show_legend: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    graph: Option<GraphOverrides>,
    calendar: Option<CalendarOverrides>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&contents).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let parsed: ConfigFile = serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
        path: "<inline>".to_string(),
        source,
    })?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "github" | "default" | "light" => Theme::github(),
            "dark" => Theme::dark(),
            other => return Err(ConfigError::UnknownTheme(other.to_string())),
        };
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.category_colors {
            config.theme.category_colors = v;
        }
    }

    if let Some(graph) = parsed.graph {
        if let Some(v) = graph.link_distance {
            config.graph.link_distance = v;
        }
        if let Some(v) = graph.charge_strength {
            config.graph.charge_strength = v;
        }
        if let Some(v) = graph.collide_radius {
            config.graph.collide_radius = v;
        }
        if let Some(v) = graph.ticks {
            config.graph.ticks = v;
        }
        if let Some(v) = graph.node_radius {
            config.graph.node_radius = v;
        }
    }

    if let Some(calendar) = parsed.calendar {
        if let Some(v) = calendar.cell_size {
            config.calendar.cell_size = v;
        }
        if let Some(v) = calendar.cell_gap {
            config.calendar.cell_gap = v;
        }
        if let Some(v) = calendar.palette {
            let expected = config.calendar.thresholds.len() + 1;
            if v.len() != expected {
                return Err(ConfigError::Palette {
                    expected,
                    got: v.len(),
                });
            }
            config.calendar.palette = v;
        }
        if let Some(v) = calendar.show_legend {
            config.calendar.show_legend = v;
        }
    }

    Ok(config)
}

/// Config for the binaries: defaults, or the file named by `COMMITVIZ_CONFIG`.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => load_config(Some(Path::new(&path))),
        _ => Ok(Config::default()),
    }
}
