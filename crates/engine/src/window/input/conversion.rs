//! Input Conversion Utilities
//!
//! Winit reports physical pixels; the shell works in logical pixels. Both keep
//! winit's top-left origin, any further flip is the view frame's job.

use touch_input::{Point, Size};
use winit::dpi::{PhysicalPosition, PhysicalSize};

pub fn to_logical_point(position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
    let logical = position.to_logical::<f64>(scale_factor);
    Point::new(logical.x, logical.y)
}

pub fn to_logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Size {
    let logical = size.to_logical::<f64>(scale_factor);
    Size::new(logical.width, logical.height)
}
