mod curve;
mod line;

pub use {curve::ray_curve_length, line::LineSeg};
