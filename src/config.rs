use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LabelStrategy {
    /// Let the host decide from its rendering capabilities.
    #[default]
    Auto,
    Rich,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center: [f32; 2],
    pub initial_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: [440.0, 230.0],
            initial_radius: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub gravity_strength: f32,
    pub centering_strength: f32,
    pub link_distance: f32,
    pub collision_padding: f32,
    pub alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub reheat_alpha_target: f32,
    pub radius_range: [f32; 2],
    pub radius_exponent: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            gravity_strength: 0.01,
            centering_strength: 0.1,
            link_distance: 200.0,
            collision_padding: 6.0,
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 0.0228,
            velocity_decay: 0.4,
            reheat_alpha_target: 0.3,
            radius_range: [10.0, 30.0],
            radius_exponent: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseStage {
    pub at_tick: u32,
    pub link_strength: f32,
    pub collision_strength: f32,
}

fn default_phases() -> Vec<PhaseStage> {
    vec![
        PhaseStage {
            at_tick: 10,
            link_strength: 0.1,
            collision_strength: 0.2,
        },
        PhaseStage {
            at_tick: 30,
            link_strength: 0.2,
            collision_strength: 0.5,
        },
        PhaseStage {
            at_tick: 50,
            link_strength: 0.3,
            collision_strength: 1.0,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialView {
    pub offset: [f32; 2],
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub scale_extent: [f32; 2],
    pub zoom_to_node_scale: f32,
    pub zoom_to_node_millis: u64,
    pub desktop: InitialView,
    pub mobile: InitialView,
    pub mobile_breakpoint: f32,
    pub drag_threshold: f32,
    pub wheel_sensitivity: f32,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: 0.8,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scale_extent: [0.1, 4.0],
            zoom_to_node_scale: 3.0,
            zoom_to_node_millis: 750,
            desktop: InitialView::default(),
            mobile: InitialView {
                offset: [0.0, -40.0],
                scale: 0.4,
            },
            mobile_breakpoint: 768.0,
            drag_threshold: 3.0,
            wheel_sensitivity: 0.0018,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub dim_opacity: f32,
    pub label_nudge: f32,
    pub edge_width: f32,
    pub edge_active_width: f32,
    pub edge_dim_width: f32,
    pub edge_opacity: f32,
    pub edge_fade_millis: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            dim_opacity: 0.3,
            label_nudge: 10.0,
            edge_width: 1.5,
            edge_active_width: 3.0,
            edge_dim_width: 1.0,
            edge_opacity: 0.6,
            edge_fade_millis: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub strategy: LabelStrategy,
    pub max_chars: usize,
    pub wrap_width: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub offset: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            strategy: LabelStrategy::Auto,
            max_chars: 56,
            wrap_width: 300.0,
            font_size: 12.0,
            line_height: 1.2,
            offset: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub layout: LayoutConfig,
    pub forces: ForceConfig,
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseStage>,
    pub camera: CameraConfig,
    pub highlight: HighlightConfig,
    pub labels: LabelConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            forces: ForceConfig::default(),
            phases: default_phases(),
            camera: CameraConfig::default(),
            highlight: HighlightConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<()> {
        let [min_scale, max_scale] = self.camera.scale_extent;
        if !(min_scale > 0.0 && min_scale <= max_scale) {
            bail!("camera.scale_extent must satisfy 0 < min <= max, got [{min_scale}, {max_scale}]");
        }

        let forces = &self.forces;
        if !(forces.alpha_decay > 0.0 && forces.alpha_decay <= 1.0) {
            bail!("forces.alpha_decay must be in (0, 1], got {}", forces.alpha_decay);
        }
        if !(0.0..=1.0).contains(&forces.velocity_decay) {
            bail!(
                "forces.velocity_decay must be in [0, 1], got {}",
                forces.velocity_decay
            );
        }
        if forces.radius_range[0] > forces.radius_range[1] {
            bail!("forces.radius_range must be ascending");
        }

        if self.phases.is_empty() {
            bail!("phases must name at least one stage");
        }
        for pair in self.phases.windows(2) {
            let [earlier, later] = pair else {
                continue;
            };
            if later.at_tick < earlier.at_tick
                || later.link_strength < earlier.link_strength
                || later.collision_strength < earlier.collision_strength
            {
                bail!("phases must be ordered by tick with non-decreasing strengths");
            }
        }

        if self.labels.max_chars == 0 {
            bail!("labels.max_chars must be positive");
        }
        Ok(())
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "bucket-graph")?;
    Some(proj.config_dir().join("graph.toml"))
}

/// Loads the explicit config file, or the platform one if it exists.
pub fn load(explicit: Option<&Path>) -> Result<GraphConfig> {
    let config = match explicit {
        Some(path) => load_from_path(path)?,
        None => match config_file_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => GraphConfig::default(),
        },
    };
    config.validate()?;
    Ok(config)
}

fn load_from_path(path: &Path) -> Result<GraphConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("invalid config {}", path.display()))
}
