use nalgebra::Point3;

/// Role of a point along a propagation path.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    Source,
    Reflection,
    VerticalDiffraction,
    HorizontalDiffraction,
    Receiver,
}

/// A point along a propagation path, as emitted by the upstream
/// obstruction/ray tracer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    /// Absolute position.
    pub coord: Point3<f64>,

    /// Ground floor altitude under the point.
    pub altitude: f64,

    /// Ground porosity coefficient.
    pub gs: f64,

    /// Sound absorption coefficient of the wall this point lies on.
    pub alpha_wall: f64,

    pub role: PointRole,
}

impl PathPoint {
    pub fn new(
        coord: Point3<f64>,
        altitude: f64,
        gs: f64,
        alpha_wall: f64,
        role: PointRole,
    ) -> Self {
        Self {
            coord,
            altitude,
            gs,
            alpha_wall,
            role,
        }
    }
}
