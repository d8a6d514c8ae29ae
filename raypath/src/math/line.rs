use nalgebra::{Point3, Vector3};

/// A reference line in 3D space defined by two points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSeg {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
}

impl LineSeg {
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self { a, b }
    }

    /// Distance between the two endpoints.
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.a, &self.b)
    }

    /// Projects `p` onto the infinite line through `a` and `b`.
    ///
    /// A degenerate line (coincident endpoints) projects every point
    /// onto `a`.
    pub fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        let dir: Vector3<f64> = self.b - self.a;
        let len_sq = dir.norm_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = (p - self.a).dot(&dir) / len_sq;
        self.a + dir * t
    }

    /// Reflects `p` through its projection on the line.
    pub fn mirror(&self, p: &Point3<f64>) -> Point3<f64> {
        let ground = self.project(p);
        Point3::new(
            2.0 * ground.x - p.x,
            2.0 * ground.y - p.y,
            2.0 * ground.z - p.z,
        )
    }
}
