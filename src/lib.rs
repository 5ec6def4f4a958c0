pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod headless;

pub use simulation::states::{Body, Bounds, System, NVec2};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, Thrust};
pub use simulation::integrator::{euler_integrator, verlet_integrator, step};
pub use simulation::collision::{intersects, resolve_collisions, Contact};
pub use simulation::clock::{FixedClock, Tick};
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    IntegratorConfig, CollisionConfig, EngineConfig, ParametersConfig, BodyConfig, BoundsConfig,
    CameraConfig, WindowConfig, ControlsConfig, ScenarioConfig, load_scenario,
};

pub use visualization::{camera::Camera, viewer2d::run_2d};

pub use headless::headless::{run_headless, RunSummary};
