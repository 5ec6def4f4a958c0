pub mod camera;
pub mod viewer2d;
