//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, softened Newtonian gravity
//! and the thrust term driven by player input

use tracing::trace;

use crate::simulation::states::{System, NVec2};

/// Collection of acceleration terms (gravity, thrust, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]);
}

/// Newtonian gravity with softening
/// Uses body bounds and eps2 to smooth close encounters and avoid
/// singularities at small separations
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        let n = sys.bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &sys.bodies[i];
            let ri = bi.bounds.radius();

            for j in (i + 1)..n {
                let bj = &sys.bodies[j];
                let rj = bj.bounds.radius();

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - bi.x;

                // Softened squared distance:
                // |r|^2 + mean of squared core radii + global floor
                let soft2 = 0.5 * (ri * ri + rj * rj) + self.eps2;
                let d2 = r.dot(&r) + soft2;
                if d2 <= 0.0 {
                    // coincident point masses with no softening, no defined direction
                    continue;
                }

                // coef = G / |r_soft|^3
                let inv_r = d2.sqrt().recip();
                let coef = self.G * inv_r * inv_r * inv_r;

                // a_i +=  G m_j r / |r_soft|^3
                // a_j += -G m_i r / |r_soft|^3
                out[i] += coef * bj.m * r;
                out[j] -= coef * bi.m * r;

                trace!(
                    a = bi.id, b = bj.id,
                    fx = coef * bi.m * bj.m * r.x,
                    fy = coef * bi.m * bj.m * r.y,
                    "pair force"
                );
            }
        }
    }
}

/// Converts each body's requested `thrust` force into acceleration
pub struct Thrust;

impl Acceleration for Thrust {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        for (b, a) in sys.bodies.iter().zip(out.iter_mut()) {
            if b.thrust != NVec2::zeros() {
                *a += b.thrust / b.m;
            }
        }
    }
}
