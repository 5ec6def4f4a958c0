//! Conservation diagnostics: energy, momentum, centre of mass
//!
//! Potential energy uses the same per-pair softening as `NewtonianGravity`
//! so that energy drift reflects the integrator, not a model mismatch

use crate::simulation::states::{System, NVec2};

pub fn kinetic_energy(sys: &System) -> f64 {
    sys.bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum()
}

/// Softened gravitational potential energy, summed over unordered pairs
#[allow(non_snake_case)]
pub fn potential_energy(sys: &System, G: f64, eps2: f64) -> f64 {
    let n = sys.bodies.len();
    let mut u = 0.0;
    for i in 0..n {
        let bi = &sys.bodies[i];
        let ri = bi.bounds.radius();
        for j in (i + 1)..n {
            let bj = &sys.bodies[j];
            let rj = bj.bounds.radius();
            let r = bj.x - bi.x;
            let d2 = r.norm_squared() + 0.5 * (ri * ri + rj * rj) + eps2;
            if d2 > 0.0 {
                u -= G * bi.m * bj.m / d2.sqrt();
            }
        }
    }
    u
}

#[allow(non_snake_case)]
pub fn total_energy(sys: &System, G: f64, eps2: f64) -> f64 {
    kinetic_energy(sys) + potential_energy(sys, G, eps2)
}

/// Total linear momentum
pub fn momentum(sys: &System) -> NVec2 {
    sys.bodies.iter().fold(NVec2::zeros(), |p, b| p + b.m * b.v)
}

/// Mass-weighted mean position, None for an empty system
pub fn center_of_mass(sys: &System) -> Option<NVec2> {
    let m: f64 = sys.bodies.iter().map(|b| b.m).sum();
    if sys.bodies.is_empty() || m <= 0.0 {
        return None;
    }
    let weighted = sys.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.m * b.x);
    Some(weighted / m)
}
