//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing), validates it and produces the
//! runtime bundle `Scenario` containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`AccelSet`)
//! - the frame clock and the keyboard-steered body
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! integration and visualization systems, or driven directly in headless mode

use anyhow::{bail, ensure, Context, Result};
use bevy::prelude::Resource;
use tracing::{debug, info};

use std::collections::HashSet;

use crate::configuration::config::{
    BodyConfig, BoundsConfig, CameraConfig, ControlsConfig, ScenarioConfig, WindowConfig,
};
use crate::simulation::clock::FixedClock;
use crate::simulation::collision::Contact;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, NewtonianGravity, Thrust};
use crate::simulation::integrator::step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, Bounds, System, NVec2};

/// Bevy resource representing a fully-initialized simulation scenario
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
    pub clock: FixedClock,
    pub controls: ControlsConfig,
    pub controlled: Option<u32>, // id of the steered body
    pub camera: CameraConfig,
    pub window: WindowConfig,
    pub paused: bool,
}

fn vec2(values: &[f64], what: &str, name: &str) -> Result<NVec2> {
    match values {
        [x, y] if x.is_finite() && y.is_finite() => Ok(NVec2::new(*x, *y)),
        [_, _] => bail!("body `{name}`: {what} must be finite"),
        _ => bail!("body `{name}`: {what} needs exactly 2 components, got {}", values.len()),
    }
}

fn build_body(id: u32, bc: &BodyConfig) -> Result<Body> {
    let name = bc.name.clone().unwrap_or_else(|| format!("body{id}"));

    ensure!(bc.m.is_finite() && bc.m > 0.0, "body `{name}`: mass must be finite and > 0, got {}", bc.m);

    ensure!(bc.rot.is_finite(), "body `{name}`: rot must be finite, got {}", bc.rot);

    let x = vec2(&bc.x, "position", &name)?;
    let v = if bc.v.is_empty() {
        NVec2::zeros()
    } else {
        vec2(&bc.v, "velocity", &name)?
    };

    let bounds = match bc.bounds {
        BoundsConfig::Box([w, h]) => {
            ensure!(
                w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0,
                "body `{name}`: box bounds must be finite and > 0, got {w}x{h}"
            );
            Bounds::Box { w, h }
        }
        BoundsConfig::Circle(r) => {
            ensure!(r.is_finite() && r > 0.0, "body `{name}`: circle radius must be finite and > 0, got {r}");
            Bounds::Circle { r }
        }
    };

    let mut body = Body::new(id, name, bc.m, x, bounds);
    body.v = v;
    body.rot = bc.rot;
    body.sprite = bc.sprite.clone();
    Ok(body)
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Bodies: map `BodyConfig` -> runtime `Body`, ids follow file order
        let mut bodies = Vec::with_capacity(cfg.bodies.len());
        let mut names = HashSet::new();
        for (i, bc) in cfg.bodies.iter().enumerate() {
            let body = build_body(i as u32, bc)
                .with_context(|| format!("invalid body #{i}"))?;
            ensure!(names.insert(body.name.clone()), "duplicate body name `{}`", body.name);
            bodies.push(body);
        }

        let system = System {
            bodies,
            t: 0.0,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        ensure!(p_cfg.h0.is_finite() && p_cfg.h0 > 0.0, "h0 must be > 0, got {}", p_cfg.h0);
        ensure!(
            p_cfg.time_scale.is_finite() && p_cfg.time_scale > 0.0,
            "time_scale must be > 0, got {}", p_cfg.time_scale
        );
        ensure!(p_cfg.max_steps_per_frame > 0, "max_steps_per_frame must be > 0");
        ensure!(p_cfg.eps2 >= 0.0, "eps2 must be >= 0, got {}", p_cfg.eps2);
        ensure!(p_cfg.G.is_finite(), "G must be finite");
        if let Some(t_end) = p_cfg.t_end {
            ensure!(t_end.is_finite() && t_end > 0.0, "t_end must be finite and > 0, got {t_end}");
        }
        let parameters = Parameters {
            h0: p_cfg.h0,
            time_scale: p_cfg.time_scale,
            max_steps_per_frame: p_cfg.max_steps_per_frame,
            eps2: p_cfg.eps2,
            G: p_cfg.G,
            t_end: p_cfg.t_end,
        };

        let engine = Engine {
            integrator: cfg.engine.integrator,
            collisions: cfg.engine.collisions,
        };

        // Forces: gravity plus the thrust term driven by input
        let forces = AccelSet::new()
            .with(NewtonianGravity {
                G: parameters.G,
                eps2: parameters.eps2,
            })
            .with(Thrust);

        let controlled = match &cfg.controls.body {
            Some(name) => match system.bodies.iter().find(|b| &b.name == name) {
                Some(b) => Some(b.id),
                None => bail!("controls.body names unknown body `{name}`"),
            },
            None => system.bodies.first().map(|b| b.id),
        };

        let clock = FixedClock::new(parameters.h0, parameters.time_scale, parameters.max_steps_per_frame);

        info!(
            bodies = system.bodies.len(),
            integrator = ?engine.integrator,
            collisions = ?engine.collisions,
            "scenario built"
        );

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
            clock,
            controls: cfg.controls,
            controlled,
            camera: cfg.camera,
            window: cfg.window,
            paused: false,
        })
    }

    /// True once the optional end time has been reached
    pub fn finished(&self) -> bool {
        self.parameters
            .t_end
            .is_some_and(|t_end| self.system.t >= t_end - 0.5 * self.parameters.h0)
    }

    fn clear_thrust(&mut self) {
        for b in self.system.bodies.iter_mut() {
            b.thrust = NVec2::zeros();
        }
    }

    /// If the steered body was absorbed in a merge, steer the survivor
    fn follow_merges(&mut self, contacts: &[Contact]) {
        let Some(start) = self.controlled else { return };
        let mut id = start;
        for c in contacts {
            if c.absorbed == Some(id) {
                id = if c.a == id { c.b } else { c.a };
            }
        }
        if id != start {
            info!(from = start, to = id, "steered body was merged");
            self.controlled = Some(id);
        }
    }

    /// Run one fixed step regardless of the clock. Thrust requested this
    /// frame stays in place until the next `advance` consumes it
    pub fn step_once(&mut self) -> Vec<Contact> {
        let contacts = step(&mut self.system, &self.forces, &self.parameters, &self.engine);
        self.follow_merges(&contacts);
        contacts
    }

    /// Advance by `real_dt` wall-clock seconds, running as many fixed steps
    /// as the clock hands out. Paused or finished scenarios stay put
    pub fn advance(&mut self, real_dt: f64) -> Vec<Contact> {
        let mut contacts = Vec::new();
        if self.paused || self.finished() {
            self.clear_thrust();
            return contacts;
        }

        let tick = self.clock.advance(real_dt);
        for _ in 0..tick.steps {
            if self.finished() {
                break;
            }
            contacts.extend(step(&mut self.system, &self.forces, &self.parameters, &self.engine));
        }
        self.follow_merges(&contacts);
        self.clear_thrust();

        if let Some(id) = self.controlled {
            if let Some(b) = self.system.body(id) {
                debug!(t = self.system.t, x = b.x.x, y = b.x.y, ax = b.a.x, ay = b.a.y, "controlled body");
            }
        }
        contacts
    }

    /// Request thrust on the steered body along its heading for the next frame
    pub fn apply_thrust(&mut self, throttle: f64) {
        let magnitude = throttle * self.controls.thrust;
        if let Some(b) = self.controlled.and_then(|id| self.system.body_mut(id)) {
            b.thrust = magnitude * b.heading();
        }
    }

    /// Rotate the steered body, `dir` is +1 counter-clockwise, -1 clockwise
    pub fn turn(&mut self, dir: f64, dt: f64) {
        let delta = dir * self.controls.turn_rate * dt;
        if let Some(b) = self.controlled.and_then(|id| self.system.body_mut(id)) {
            b.rot += delta;
        }
    }
}
