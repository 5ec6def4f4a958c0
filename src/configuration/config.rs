//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator and collision response
//! - [`ParametersConfig`] – step size, time scale and physical constants
//! - [`BodyConfig`]       – initial state for each body
//! - [`CameraConfig`]     – initial view and pan/zoom steps
//! - [`WindowConfig`]     – viewer window
//! - [`ControlsConfig`]   – which body the keyboard steers
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! Everything except `parameters` and `bodies` can be omitted:
//!
//! ```yaml
//! engine:
//!   integrator: "verlet"    # or "euler"
//!   collisions: "halt"      # or "merge", "ignore"
//!
//! parameters:
//!   h0: 0.01                # fixed step size
//!   time_scale: 1.0         # simulated seconds per real second
//!   max_steps_per_frame: 64
//!   eps2: 0.0               # softening epsilon^2
//!   G: 1.0                  # gravitational constant
//!   t_end: 100.0            # optional stop time
//!
//! bodies:
//!   - name: earth
//!     x: [ 0.0, 0.0 ]
//!     m: 300000.0
//!     bounds: { circle: 100.0 }
//!     sprite: "res/planet2.png"
//!   - name: rocket
//!     x: [ 300.0, 100.0 ]
//!     v: [ -10.0, 29.0 ]
//!     m: 1.0
//!     rot: 1.047
//!     bounds: { box: [ 20.0, 20.0 ] }
//!     sprite: "res/rocket.png"
//!
//! controls:
//!   body: rocket
//! ```
//!
//! The engine then maps this configuration into its internal runtime scenario
//! representation, see [`crate::simulation::scenario::Scenario`].

use anyhow::{Context, Result};
use serde::Deserialize;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Which integrator method used by the engine
/// `integrator: "euler"` or `integrator: "verlet"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[serde(rename = "euler")] // Semi-implicit Euler, one force evaluation per step
    Euler,

    #[default]
    #[serde(rename = "verlet")] // Velocity Verlet, symplectic, two force evaluations per step
    Verlet,
}

/// What happens when two bodies' bounds touch
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionConfig {
    #[default]
    #[serde(rename = "halt")] // both bodies stop dead
    Halt,

    #[serde(rename = "merge")] // lighter body is absorbed by the heavier one
    Merge,

    #[serde(rename = "ignore")] // contacts are reported but bodies pass through
    Ignore,
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: IntegratorConfig,
    #[serde(default)]
    pub collisions: CollisionConfig,
}

fn default_h0() -> f64 { 0.01 }
fn default_time_scale() -> f64 { 1.0 }
fn default_max_steps() -> u32 { 64 }
fn default_g() -> f64 { 1.0 }

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default = "default_h0")]
    pub h0: f64,      // time step size
    #[serde(default = "default_time_scale")]
    pub time_scale: f64, // simulated seconds per real second
    #[serde(default = "default_max_steps")]
    pub max_steps_per_frame: u32,
    #[serde(default)]
    pub eps2: f64,    // softening - prevent singular forces at very small separations
    #[serde(default = "default_g")]
    pub G: f64,       // gravitational constant
    #[serde(default)]
    pub t_end: Option<f64>, // time end
}

/// Shape of a body: `{ box: [w, h] }` or `{ circle: r }`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum BoundsConfig {
    #[serde(rename = "box")]
    Box([f64; 2]),
    #[serde(rename = "circle")]
    Circle(f64),
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>, // defaults to "body<i>"
    pub x: Vec<f64>, // Initial position in world units
    #[serde(default)]
    pub v: Vec<f64>, // Initial velocity, empty -> at rest
    pub m: f64,      // Mass of the body
    #[serde(default)]
    pub rot: f64,    // Heading in radians
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub bounds: BoundsConfig, // Collision shape, also the sprite size
    #[serde(default)]
    pub sprite: Option<String>, // Image path relative to the asset folder
}

fn default_pan_step() -> f32 { 20.0 }
fn default_scale() -> f32 { 1.0 }
fn default_zoom_in_step() -> f32 { 0.1 }
fn default_zoom_out_factor() -> f32 { 1.1 }
fn default_min_scale() -> f32 { 0.01 }
fn default_max_scale() -> f32 { 100.0 }

/// Initial camera placement and control steps
#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_pan_step")]
    pub pan_step: f32, // screen pixels per key press
    #[serde(default = "default_zoom_in_step")]
    pub zoom_in_step: f32, // added to scale per wheel notch
    #[serde(default = "default_zoom_out_factor")]
    pub zoom_out_factor: f32, // scale divided by this per wheel notch
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: default_scale(),
            pan_step: default_pan_step(),
            zoom_in_step: default_zoom_in_step(),
            zoom_out_factor: default_zoom_out_factor(),
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
        }
    }
}

fn default_title() -> String { "gravsim".to_string() }
fn default_width() -> f32 { 720.0 }
fn default_height() -> f32 { 480.0 }

/// Viewer window settings
#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default)]
    pub draw_bounds: bool, // outline every body's bounds
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            draw_bounds: false,
        }
    }
}

fn default_thrust() -> f64 { 10.0 }
fn default_turn_rate() -> f64 { std::f64::consts::PI }

/// Keyboard steering of one body
#[derive(Deserialize, Debug, Clone)]
pub struct ControlsConfig {
    #[serde(default)]
    pub body: Option<String>, // name of the steered body, None -> first body
    #[serde(default = "default_thrust")]
    pub thrust: f64, // force applied while thrusting
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f64, // rad per second
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            body: None,
            thrust: default_thrust(),
            turn_rate: default_turn_rate(),
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // Integrator and collision response
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub bodies: Vec<BodyConfig>, // Bodies that define the initial state of the system
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg = serde_yaml::from_str(s).context("invalid scenario YAML")?;
        Ok(cfg)
    }
}

/// Read and parse a scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path)
        .with_context(|| format!("cannot open scenario file {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("cannot parse scenario file {}", path.display()))?;
    Ok(cfg)
}
