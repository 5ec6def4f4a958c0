//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed step size and how fast simulated time runs against wall time,
//! - cap on steps per rendered frame,
//! - softening and gravitational constant (`eps2`, `G`),
//! - optional end time

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64, // step size
    pub time_scale: f64, // simulated seconds per real second
    pub max_steps_per_frame: u32, // backlog cap for the frame clock
    pub eps2: f64, // softening
    pub G: f64, // gravitational constant
    pub t_end: Option<f64>, // stop time, None -> run forever
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: 0.01,
            time_scale: 1.0,
            max_steps_per_frame: 64,
            eps2: 0.0,
            G: 1.0,
            t_end: None,
        }
    }
}
