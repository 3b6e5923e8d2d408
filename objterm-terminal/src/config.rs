//! Viewer configuration and command-line arguments

use anyhow::{bail, Context, Result};
use clap::Parser;
use objterm_core::{Camera, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level viewer configuration, read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub display: DisplayConfig,
}

/// Framebuffer size in pixels and the fixed light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub light: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Radians per key press
    pub rotate_step: f64,
    /// Distance multiplier per zoom key press
    pub zoom_factor: f64,
}

/// How framebuffer pixels become characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub char_width: usize,
    pub char_height: usize,
    pub color_factor: f64,
    pub brightness_factor: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 60,
            light: [0.5, 0.5, 1.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 1.5,
            near: 0.1,
            far: 100.0,
            distance: 3.0,
            min_distance: 0.2,
            max_distance: 50.0,
            rotate_step: 0.05,
            zoom_factor: 1.05,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            char_width: 2,
            char_height: 1,
            color_factor: 1.2,
            brightness_factor: 0.3,
        }
    }
}

impl RenderConfig {
    pub fn light_direction(&self) -> Vec3 {
        Vec3::from(self.light)
    }
}

impl CameraConfig {
    pub fn camera(&self) -> Camera {
        Camera {
            distance: self.distance,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            fov: self.fov,
            near: self.near,
            far: self.far,
            ..Camera::new(self.aspect)
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            bail!("render size must be non-zero");
        }
        if self.display.char_width == 0 || self.display.char_height == 0 {
            bail!("character cell size must be non-zero");
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            bail!("camera planes must satisfy 0 < near < far");
        }
        if self.camera.zoom_factor <= 0.0 {
            bail!("zoom factor must be positive");
        }
        Ok(())
    }
}

/// View an OBJ model in the terminal
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "objterm", version)]
#[command(about = "Software-rasterized OBJ viewer for the terminal")]
pub struct CliArgs {
    /// Viewer configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// OBJ model to display; the built-in cube when omitted
    pub model: Option<PathBuf>,
}
