//! Fixed-step time integrators for the n-body system
//!
//! Provides semi-implicit Euler and velocity-Verlet, both driven by
//! `AccelSet` and `Parameters`, plus `step` which also runs collision
//! handling for the configured engine

use super::states::{System, NVec2};
use super::forces::AccelSet;
use super::params::Parameters;
use super::engine::Engine;
use super::collision::{resolve_collisions, Contact};
use crate::configuration::config::IntegratorConfig;

/// Record the acceleration used for each body and the matching net force
fn store_accels(sys: &mut System, accels: &[NVec2]) {
    for (b, a) in sys.bodies.iter_mut().zip(accels.iter()) {
        b.a = *a;
        b.f = b.m * *a;
    }
}

/// Advance the system by one step using semi-implicit Euler
/// v_n+1 = v_n + dt a_n, x_n+1 = x_n + dt v_n+1
pub fn euler_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) {
    let dt = params.h0;
    let n = sys.bodies.len();
    if n == 0 {
        sys.t += dt;
        return;
    }

    let mut a = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a);

    for (b, acc) in sys.bodies.iter_mut().zip(a.iter()) {
        b.v += dt * *acc;
        b.x += dt * b.v;
    }

    store_accels(sys, &a);
    sys.t += dt;
}

/// Advance the system by one step using velocity–Verlet
/// Uses two force evaluations per step and updates positions, velocities,
/// and `sys.t` in-place based on `params.h0`
pub fn verlet_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) {
    let dt = params.h0; // time step dt
    let half_dt = 0.5 * dt;
    let n = sys.bodies.len();
    if n == 0 {
        sys.t += dt;
        return;
    }

    // a_n from x_n at time t_n
    let mut a_old = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_old);

    // Kick: v_n+1/2 = v_n + (dt/2) a_n
    for (b, a) in sys.bodies.iter_mut().zip(a_old.iter()) {
        b.v += half_dt * *a;
    }

    // Drift: x_n+1 = x_n + dt v_n+1/2
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }

    sys.t += dt;

    // a_n+1 from x_n+1 at time t_n+1
    let mut a_new = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_new);

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) a_n+1
    for (b, a) in sys.bodies.iter_mut().zip(a_new.iter()) {
        b.v += half_dt * *a;
    }

    store_accels(sys, &a_new);
}

/// One full engine step: integrate with the configured scheme, then handle contacts
pub fn step(sys: &mut System, forces: &AccelSet, params: &Parameters, engine: &Engine) -> Vec<Contact> {
    match engine.integrator {
        IntegratorConfig::Euler => euler_integrator(sys, forces, params),
        IntegratorConfig::Verlet => verlet_integrator(sys, forces, params),
    }

    resolve_collisions(sys, engine.collisions)
}
