use crate::math::LineSeg;

/// A whole-path ray prior to augmentation: the true source-receiver
/// reference line over the path's mean ground plane.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub line: LineSeg,
}

impl Ray {
    pub fn new(line: LineSeg) -> Self {
        Self { line }
    }
}

/// One global ray alternative after augmentation.
///
/// Augmentation produces three alternatives per path: the true
/// source-receiver ray, the ray to the mirror-image receiver, and the
/// ray from the mirror-image source.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayGeometry {
    /// Reference line between the (possibly mirrored) endpoints.
    pub line: LineSeg,

    /// Direct distance between the endpoints.
    pub d: f64,

    /// Meteorologically curved distance.
    pub dc: f64,

    /// Distance between the ground-projected source and receiver,
    /// identical for all alternatives of one path.
    pub dp: f64,

    /// Total traversed length through the diffraction points.
    pub d_path: f64,

    /// Length of the diffraction legs strictly between the endpoints;
    /// absent when the path carries no more points than the minimum.
    pub e_length: Option<f64>,

    /// Path-length excess over the curved direct ray.
    pub delta: f64,
}
