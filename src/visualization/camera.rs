//! View transform for the 2D viewer
//!
//! Kept free of Bevy types so the pan/zoom/culling rules can be tested
//! without a window. World space is y-up; screen space is pixels with the
//! origin at the top-left corner and y pointing down

use crate::configuration::config::CameraConfig;
use crate::simulation::states::{Body, Bounds, NVec2};

/// Axis-aligned rectangle in screen pixels, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: NVec2, // world point shown at the viewport centre
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub scale: f64, // screen pixels per world unit
    pan_step: f64,
    zoom_in_step: f64,
    zoom_out_factor: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Camera {
    pub fn new(cfg: &CameraConfig, viewport_w: f64, viewport_h: f64) -> Self {
        let min_scale = (cfg.min_scale as f64).max(f64::MIN_POSITIVE);
        let max_scale = (cfg.max_scale as f64).max(min_scale);
        Self {
            pos: NVec2::new(cfg.x as f64, cfg.y as f64),
            viewport_w,
            viewport_h,
            scale: (cfg.scale as f64).clamp(min_scale, max_scale),
            pan_step: cfg.pan_step as f64,
            zoom_in_step: cfg.zoom_in_step as f64,
            zoom_out_factor: (cfg.zoom_out_factor as f64).max(1.0),
            min_scale,
            max_scale,
        }
    }

    /// Move the view by one pan step per unit of `dx`/`dy`
    /// The step is in screen pixels, so it covers fewer world units when zoomed in
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let step = self.pan_step / self.scale;
        self.pos.x += dx * step;
        self.pos.y += dy * step;
    }

    /// Wheel up zooms in additively, wheel down zooms out geometrically
    pub fn zoom(&mut self, wheel: f64) {
        if wheel > 0.0 {
            self.scale += self.zoom_in_step;
        } else if wheel < 0.0 {
            self.scale /= self.zoom_out_factor;
        }
        self.scale = self.scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn resize(&mut self, viewport_w: f64, viewport_h: f64) {
        self.viewport_w = viewport_w;
        self.viewport_h = viewport_h;
    }

    pub fn world_to_screen(&self, p: NVec2) -> NVec2 {
        NVec2::new(
            (p.x - self.pos.x) * self.scale + 0.5 * self.viewport_w,
            0.5 * self.viewport_h - (p.y - self.pos.y) * self.scale,
        )
    }

    pub fn screen_to_world(&self, s: NVec2) -> NVec2 {
        NVec2::new(
            (s.x - 0.5 * self.viewport_w) / self.scale + self.pos.x,
            (0.5 * self.viewport_h - s.y) / self.scale + self.pos.y,
        )
    }

    /// Screen rectangle enclosing the body's (possibly rotated) bounds
    pub fn screen_rect(&self, body: &Body) -> ScreenRect {
        let half = match body.bounds {
            Bounds::Box { w, h } => {
                let (s, c) = body.rot.sin_cos();
                NVec2::new(
                    0.5 * (c.abs() * w + s.abs() * h),
                    0.5 * (s.abs() * w + c.abs() * h),
                )
            }
            Bounds::Circle { .. } => body.bounds.half_extents(),
        } * self.scale;

        let centre = self.world_to_screen(body.x);
        ScreenRect {
            x: centre.x - half.x,
            y: centre.y - half.y,
            w: 2.0 * half.x,
            h: 2.0 * half.y,
        }
    }

    /// A body is drawn only if its screen rectangle overlaps the viewport
    pub fn is_visible(&self, body: &Body) -> bool {
        let r = self.screen_rect(body);
        r.x + r.w > 0.0 && r.x < self.viewport_w && r.y + r.h > 0.0 && r.y < self.viewport_h
    }
}
