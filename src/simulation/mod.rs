pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod collision;
pub mod clock;
pub mod diagnostics;
pub mod scenario;
