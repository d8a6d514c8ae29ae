//! # Acoustic Propagation Path Geometry
//!
//! `raypath` computes the geometric quantities of a single
//! sound-propagation ray path between a source and a receiver, as
//! required by outdoor noise attenuation standards: ray-path length,
//! ground-projected distance, meteorologically curved distance,
//! effective source/receiver heights above the mean ground plane, and
//! the ground-absorption mixing coefficient.
//!
//! The ordered point and segment sequences are produced by an upstream
//! obstruction/ray tracer; the augmented output feeds a downstream
//! attenuation-formula evaluator.

mod error;
mod math;
mod path;
mod point;
mod ray;
mod segment;

pub use crate::{
    error::PathError,
    math::{ray_curve_length, LineSeg},
    path::{AugmentedPath, PropagationPath, PropagationPathBuilder},
    point::{PathPoint, PointRole},
    ray::{Ray, RayGeometry},
    segment::{Segment, SegmentGeometry},
};
