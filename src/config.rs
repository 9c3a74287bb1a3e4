//! `philosophy.toml` loading and validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::editor::panel::CreateDefaults;
use crate::state::CanvasSize;
use crate::surface::scene::Scene;
use crate::surface::Point;
use crate::thought::visual::Placement;

pub const FILE_NAME: &str = "philosophy.toml";
pub const ENV_VAR: &str = "PHILOSOPHY_CONFIG";

/// Written by `philosophy init`. Must parse to `Config::default()`.
pub const DEFAULT_CONTENTS: &str = "\
# Philosophy configuration
# Every key is optional; the values below are the defaults.

# Size of the drawing surface, in canvas units
canvas_width = 800
canvas_height = 600

# Width of the editor panel, in terminal columns
panel_width = 34

# Radius of a thought's circle
thought_radius = 70

# Where new thoughts appear
default_position = [300, 300]

# Detail fields every new thought starts with, in display order
default_details = [\"thinker\", \"text\"]

# How far one arrow-key press drags the selected element
drag_step = 10

# Refuse to draw more than this many shapes
# max_shapes = 500

# Append logs here (filter with PHILOSOPHY_LOG, e.g. PHILOSOPHY_LOG=debug)
# log_file = \"philosophy.log\"
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub panel_width: u16,
    pub thought_radius: f64,
    pub default_position: [f64; 2],
    pub default_details: Vec<String>,
    pub drag_step: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_shapes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            panel_width: 34,
            thought_radius: 70.0,
            default_position: [300.0, 300.0],
            default_details: vec!["thinker".to_string(), "text".to_string()],
            drag_step: 10.0,
            max_shapes: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            bail!(
                "canvas size must be positive (got {} x {})",
                self.canvas_width,
                self.canvas_height
            );
        }
        if !(self.thought_radius > 0.0) {
            bail!("thought_radius must be positive (got {})", self.thought_radius);
        }
        if !(self.drag_step > 0.0) {
            bail!("drag_step must be positive (got {})", self.drag_step);
        }
        if self.panel_width < 16 {
            bail!("panel_width must be at least 16 columns (got {})", self.panel_width);
        }
        let [x, y] = self.default_position;
        if !(0.0..=self.canvas_width).contains(&x) || !(0.0..=self.canvas_height).contains(&y) {
            bail!("default_position [{x}, {y}] lies outside the canvas");
        }
        let mut seen = HashSet::new();
        for field in &self.default_details {
            if field.trim().is_empty() {
                bail!("default_details may not contain blank field names");
            }
            if !seen.insert(field.as_str()) {
                bail!("default_details lists `{field}` twice");
            }
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// An empty scene of the configured size and shape limit.
    pub fn scene(&self) -> Scene {
        Scene::new(self.canvas_width, self.canvas_height).with_limit(self.max_shapes)
    }

    pub fn create_defaults(&self) -> CreateDefaults {
        let [x, y] = self.default_position;
        CreateDefaults {
            details: self.default_details.clone(),
            placement: Placement {
                position: Point::new(x, y),
                radius: self.thought_radius,
            },
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialise configuration")
    }
}

pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("invalid configuration")?;
    config.validate()?;
    Ok(config)
}

/// Pick the configuration file: explicit path, then `$PHILOSOPHY_CONFIG`, then
/// `./philosophy.toml` if it exists.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(FILE_NAME);
    local.exists().then_some(local)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("in {}", path.display()))
}

/// Load the configuration, falling back to the defaults when no file applies.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match resolve_path(explicit) {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}
