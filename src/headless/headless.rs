use std::time::Instant;

use tracing::{info, warn};

use crate::simulation::diagnostics::{momentum, total_energy};
use crate::simulation::scenario::Scenario;

/// What a headless run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub contacts: usize,
    pub t: f64,
    pub energy_start: f64,
    pub energy_end: f64,
    pub bodies_end: usize,
}

impl RunSummary {
    /// |E_end - E_start| / |E_start|, or the absolute drift if E_start is 0
    pub fn energy_drift(&self) -> f64 {
        let d = (self.energy_end - self.energy_start).abs();
        if self.energy_start != 0.0 {
            d / self.energy_start.abs()
        } else {
            d
        }
    }
}

/// Step the scenario without a window, `steps` fixed steps or until `t_end`
/// Logs energy and momentum every `report_every` steps (0 disables reports)
pub fn run_headless(scenario: &mut Scenario, steps: u64, report_every: u64) -> RunSummary {
    let g = scenario.parameters.G;
    let eps2 = scenario.parameters.eps2;
    let e0 = total_energy(&scenario.system, g, eps2);

    info!(steps, bodies = scenario.system.bodies.len(), e0, "headless run starting");

    let t0 = Instant::now();
    let mut done = 0;
    let mut contacts = 0;
    while done < steps && !scenario.finished() {
        contacts += scenario.step_once().len();
        done += 1;

        if report_every > 0 && done % report_every == 0 {
            let e = total_energy(&scenario.system, g, eps2);
            let p = momentum(&scenario.system);
            let drift = if e0 != 0.0 { (e - e0) / e0.abs() } else { e - e0 };
            info!(step = done, t = scenario.system.t, energy = e, drift, px = p.x, py = p.y, "report");
        }
    }
    let elapsed = t0.elapsed().as_secs_f64();

    let summary = RunSummary {
        steps: done,
        contacts,
        t: scenario.system.t,
        energy_start: e0,
        energy_end: total_energy(&scenario.system, g, eps2),
        bodies_end: scenario.system.bodies.len(),
    };

    if !summary.energy_end.is_finite() {
        warn!("energy is no longer finite, the step size is probably too large");
    }
    info!(
        steps = summary.steps,
        t = summary.t,
        contacts = summary.contacts,
        drift = summary.energy_drift(),
        ms_per_step = if done > 0 { elapsed * 1000.0 / done as f64 } else { 0.0 },
        "headless run finished"
    );

    summary
}
