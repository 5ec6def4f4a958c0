//! High-level runtime engine settings
//!
//! Selects the integrator and what happens when two bodies touch

use crate::configuration::config::{CollisionConfig, IntegratorConfig};

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // euler or verlet
    pub collisions: CollisionConfig, // halt, merge or ignore
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::Verlet,
            collisions: CollisionConfig::Halt,
        }
    }
}
