//! Wall-clock to fixed-step conversion.

use tracing::warn;

/// Tolerance (in steps) used when flooring the accumulated time, so that
/// rounding noise does not lose a whole step.
const STEP_EPSILON: f64 = 1e-9;

/// Turns variable real frame times into a whole number of fixed simulation
/// steps.
///
/// Each call to [FixedClock::advance] adds `real_dt * time_scale` simulated
/// seconds to an internal accumulator and returns how many steps of `h0` fit
/// into it. The residual fraction is carried over to the next frame. If a
/// frame would need more than `max_steps` steps (for example after the window
/// was dragged or the process was suspended), the extra backlog is dropped
/// instead of freezing the viewer while it catches up.
#[derive(Debug, Clone)]
pub struct FixedClock {
    h0: f64,
    time_scale: f64,
    max_steps: u32,

    /// Simulated seconds that have been requested but not yet stepped.
    accumulated: f64,

    /// Total simulated seconds thrown away by the step cap.
    dropped: f64,
}

/// Result of a single [FixedClock::advance] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Number of fixed steps to run this frame.
    pub steps: u32,

    /// Simulated seconds discarded this frame because of the step cap.
    pub dropped: f64,
}

impl FixedClock {
    pub fn new(h0: f64, time_scale: f64, max_steps: u32) -> Self {
        Self {
            h0,
            time_scale,
            max_steps,
            accumulated: 0.0,
            dropped: 0.0,
        }
    }

    /// Advance by `real_dt` wall-clock seconds.
    pub fn advance(&mut self, real_dt: f64) -> Tick {
        // NaN fails the comparison and counts as zero too
        let real_dt = if real_dt > 0.0 { real_dt } else { 0.0 };
        self.accumulated += real_dt * self.time_scale;

        let wanted = (self.accumulated / self.h0 + STEP_EPSILON).floor();
        let steps = if wanted > self.max_steps as f64 {
            self.max_steps
        } else {
            wanted as u32
        };

        self.accumulated = (self.accumulated - steps as f64 * self.h0).max(0.0);

        let mut dropped = 0.0;
        if steps == self.max_steps && self.accumulated >= self.h0 {
            // keep only the sub-step remainder
            let whole = (self.accumulated / self.h0 + STEP_EPSILON).floor();
            dropped = whole * self.h0;
            self.accumulated = (self.accumulated - dropped).max(0.0);
            self.dropped += dropped;
            warn!(dropped, max_steps = self.max_steps, "simulation fell behind, dropping backlog");
        }

        Tick { steps, dropped }
    }

    /// Simulated seconds waiting for the next step.
    pub fn pending(&self) -> f64 {
        self.accumulated
    }

    /// Total simulated seconds dropped so far.
    pub fn total_dropped(&self) -> f64 {
        self.dropped
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale.is_finite() && time_scale >= 0.0 {
            self.time_scale = time_scale;
        }
    }
}
