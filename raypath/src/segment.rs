use crate::math::LineSeg;

/// A straight ground sub-path between two consecutive path points, as
/// supplied by the upstream tracer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Ground-path absorption coefficient.
    pub g_path: f64,

    /// Local mean ground line under the sub-path.
    pub mean_ground: LineSeg,
}

impl Segment {
    pub fn new(g_path: f64, mean_ground: LineSeg) -> Self {
        Self { g_path, mean_ground }
    }
}

/// Geometric quantities of one segment after augmentation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    /// Indices of the spanned points in the path's point sequence.
    pub start: usize,
    pub end: usize,

    /// Local mean ground line, as supplied.
    pub mean_ground: LineSeg,

    /// Effective source/receiver heights above the mean ground plane.
    pub zs: f64,
    pub zr: f64,

    /// Heights after the second-order meteorological correction.
    pub zs_prime: f64,
    pub zr_prime: f64,

    /// Wavefront-curvature test ratio, before and after the height
    /// correction.
    pub test_form: f64,
    pub test_form_prime: f64,

    /// Ground-path absorption coefficient, as supplied.
    pub g_path: f64,

    /// Ground-mixing coefficient: `g_path` blended with the source
    /// point's ground porosity when the curvature test allows it.
    pub g_path_prime: f64,

    /// Direct distance between the segment's endpoints.
    pub d: f64,

    /// Meteorologically curved distance.
    pub dc: f64,

    /// Distance between the ground-projected endpoints.
    pub dp: f64,

    /// Ground factors filled in by the downstream attenuation
    /// evaluator.
    pub gw: Option<f64>,
    pub gm: Option<f64>,
}
