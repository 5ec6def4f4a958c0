//! Core state types for the 2D n-body sandbox.
//!
//! A `System` holds the list of bodies and the current simulation time `t`.
//! Every body carries its collision bounds and, optionally, the sprite it is
//! drawn with.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Collision / drawing shape of a body, centred on its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Box { w: f64, h: f64 },
    Circle { r: f64 },
}

impl Bounds {
    /// Radius used for gravitational softening
    /// (half the shorter side for boxes)
    pub fn radius(&self) -> f64 {
        match *self {
            Bounds::Box { w, h } => 0.5 * w.min(h),
            Bounds::Circle { r } => r,
        }
    }

    /// Half extents of the axis-aligned box enclosing the shape
    pub fn half_extents(&self) -> NVec2 {
        match *self {
            Bounds::Box { w, h } => NVec2::new(0.5 * w, 0.5 * h),
            Bounds::Circle { r } => NVec2::new(r, r),
        }
    }

    pub fn area(&self) -> f64 {
        match *self {
            Bounds::Box { w, h } => w * h,
            Bounds::Circle { r } => std::f64::consts::PI * r * r,
        }
    }

    /// Same shape, uniformly scaled by `k`
    pub fn scaled(&self, k: f64) -> Bounds {
        match *self {
            Bounds::Box { w, h } => Bounds::Box { w: w * k, h: h * k },
            Bounds::Circle { r } => Bounds::Circle { r: r * k },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: u32, // stable identifier, survives merges
    pub name: String,
    pub m: f64, // mass
    pub rot: f64, // heading in radians, counter-clockwise from +x
    pub x: NVec2, // position (centre)
    pub v: NVec2, // velocity
    pub a: NVec2, // acceleration used by the last step
    pub f: NVec2, // net force of the last step
    pub thrust: NVec2, // external force requested for the next step
    pub bounds: Bounds,
    pub sprite: Option<String>, // asset path, None -> flat quad
}

impl Body {
    /// Body at rest at `x` with no sprite
    pub fn new(id: u32, name: impl Into<String>, m: f64, x: NVec2, bounds: Bounds) -> Self {
        Self {
            id,
            name: name.into(),
            m,
            rot: 0.0,
            x,
            v: NVec2::zeros(),
            a: NVec2::zeros(),
            f: NVec2::zeros(),
            thrust: NVec2::zeros(),
            bounds,
            sprite: None,
        }
    }

    /// Unit vector the body is facing
    pub fn heading(&self) -> NVec2 {
        NVec2::new(self.rot.cos(), self.rot.sin())
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies
    pub t: f64, // time
}

impl System {
    /// Current position of body `id` in `bodies`, merges shift it
    pub fn body_index(&self, id: u32) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.body_index(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.body_index(id).map(move |i| &mut self.bodies[i])
    }
}
