use crate::{
    error::PathError,
    math::{ray_curve_length, LineSeg},
    point::PathPoint,
    ray::{Ray, RayGeometry},
    segment::{Segment, SegmentGeometry},
};
use log::debug;
use nalgebra::{distance, Point3};

/// A single source-to-receiver propagation path, as handed over by the
/// upstream obstruction/ray tracer.
///
/// Construct one through [`PropagationPath::builder`], then call
/// [`augment`](PropagationPath::augment) to compute the geometric
/// quantities the attenuation evaluator consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationPath {
    favorable: bool,
    points: Vec<PathPoint>,
    segments: Vec<Segment>,
    ray: Ray,
}

/// A fully augmented propagation path.
///
/// All quantities are computed once by [`PropagationPath::augment`];
/// the value is immutable apart from the `gw`/`gm` slots on each
/// segment, which the downstream evaluator fills in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedPath {
    /// Downward-refracting atmosphere: rays curve toward the ground.
    pub favorable: bool,

    /// The path's points, source first, receiver last.
    pub points: Vec<PathPoint>,

    /// Per-segment geometry, one entry per consecutive point pair.
    pub segments: Vec<SegmentGeometry>,

    /// The three global ray alternatives, in order: true
    /// source-receiver, mirrored receiver, mirrored source.
    pub rays: Vec<RayGeometry>,
}

/// Output of the segment phase; the only way into the point phase.
struct SegmentPass {
    segments: Vec<SegmentGeometry>,
}

/// Output of the point phase; the only way into the global ray phase.
struct PointPass {
    segments: Vec<SegmentGeometry>,
}

impl PropagationPath {
    pub fn builder() -> PropagationPathBuilder {
        PropagationPathBuilder {
            favorable: false,
            points: None,
            segments: None,
            ray: None,
        }
    }

    pub fn favorable(&self) -> bool {
        self.favorable
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Runs the three augmentation phases (segments, then points, then
    /// global rays) and returns the fully populated result.
    ///
    /// The input is not modified; augmenting the same path twice
    /// returns identical results.
    ///
    /// # Errors
    ///
    /// [`PathError::GroundedSegment`] if some segment has
    /// `zs + zr == 0`, which leaves the wavefront-curvature test ratio
    /// undefined.
    pub fn augment(&self) -> Result<AugmentedPath, PathError> {
        let segments = self.augment_segments()?;
        let points = self.augment_points(segments);
        let rays = self.augment_rays(&points);

        debug!(
            "augmented path; points: {}, segments: {}, rays: {}, favorable: {}",
            self.points.len(),
            points.segments.len(),
            rays.len(),
            self.favorable,
        );

        Ok(AugmentedPath {
            favorable: self.favorable,
            points: self.points.clone(),
            segments: points.segments,
            rays,
        })
    }

    fn augment_segments(&self) -> Result<SegmentPass, PathError> {
        // The blend in step 9 always uses the ground porosity at the
        // path's source, not at the segment's own start point.
        let gs = self.points[0].gs;

        let mut segments = Vec::with_capacity(self.segments.len());
        for (i, segment) in self.segments.iter().enumerate() {
            let src = &self.points[i];
            let rcv = &self.points[i + 1];

            let zs = src.altitude + src.coord.z;
            let zr = rcv.altitude + rcv.coord.z;
            if zs + zr == 0.0 {
                return Err(PathError::GroundedSegment { index: i });
            }

            // Ground-projected copies; the original coordinates stay
            // untouched.
            let src_ground = Point3::new(src.coord.x, src.coord.y, src.coord.z - zs);
            let rcv_ground = Point3::new(rcv.coord.x, rcv.coord.y, rcv.coord.z - zr);

            let dp = distance(&src_ground, &rcv_ground);
            let d = distance(&src.coord, &rcv.coord);
            let dc = if self.favorable {
                ray_curve_length(d)
            } else {
                d
            };

            let test_form = dp / (30.0 * (zs + zr));

            let (zs_prime, zr_prime) = corrected_heights(zs, zr, dp);
            let test_form_prime = dp / (30.0 * (zs_prime + zr_prime));

            let g_path_prime = if test_form <= 1.0 {
                test_form * segment.g_path + (1.0 - test_form) * gs
            } else {
                segment.g_path
            };

            segments.push(SegmentGeometry {
                start: i,
                end: i + 1,
                mean_ground: segment.mean_ground,
                zs,
                zr,
                zs_prime,
                zr_prime,
                test_form,
                test_form_prime,
                g_path: segment.g_path,
                g_path_prime,
                d,
                dc,
                dp,
                gw: None,
                gm: None,
            });
        }

        Ok(SegmentPass { segments })
    }

    /// Per-point derived attributes. Nothing is computed yet; the
    /// phase exists so that additions (local impedance, ...) slot in
    /// without reordering the pipeline.
    fn augment_points(&self, pass: SegmentPass) -> PointPass {
        PointPass {
            segments: pass.segments,
        }
    }

    fn augment_rays(&self, _pass: &PointPass) -> Vec<RayGeometry> {
        let points = &self.points;
        let n = points.len();
        let s = points[0].coord;
        let r = points[n - 1].coord;

        // Source and receiver projected onto the path's mean ground
        // line, and their images reflected through it.
        let s_ground = self.ray.line.project(&s);
        let r_ground = self.ray.line.project(&r);
        let s_mirror = self.ray.line.mirror(&s);
        let r_mirror = self.ray.line.mirror(&r);

        let dp = distance(&s_ground, &r_ground);

        let curve = |leg: f64| {
            if self.favorable {
                ray_curve_length(leg)
            } else {
                leg
            }
        };

        // Legs between consecutive interior diffraction points.
        let mut inner = 0.0;
        for i in 2..n - 1 {
            inner += curve(distance(&points[i - 1].coord, &points[i].coord));
        }
        let min_points = if self.favorable { 2 } else { 3 };
        let e_length = (n > min_points).then_some(inner);

        let first = points[1].coord;
        let last = points[n - 2].coord;

        let alternatives = [
            (self.ray.line, s, r),
            (LineSeg::new(s, r_mirror), s, r_mirror),
            (LineSeg::new(s_mirror, r), s_mirror, r),
        ];

        alternatives
            .into_iter()
            .map(|(line, near, far)| {
                let d = distance(&near, &far);
                let dc = curve(d);
                let d_path = inner + curve(distance(&near, &first)) + curve(distance(&last, &far));
                RayGeometry {
                    line,
                    d,
                    dc,
                    dp,
                    d_path,
                    e_length,
                    delta: d_path - dc,
                }
            })
            .collect()
    }
}

/// Second-order meteorological height correction under a constant
/// vertical sound-speed gradient.
fn corrected_heights(zs: f64, zr: f64, dp: f64) -> (f64, f64) {
    const ALPHA0: f64 = 2e-4;
    let sum = zs + zr;
    let delta_zt = 6e-3 * dp / sum;
    let delta_zs = ALPHA0 * (zs / sum).powi(2) * dp.powi(2) / 2.0;
    let delta_zr = ALPHA0 * (zr / sum).powi(2) * dp.powi(2) / 2.0;
    (zs + delta_zs + delta_zt, zr + delta_zr + delta_zt)
}

pub struct PropagationPathBuilder {
    favorable: bool,
    points: Option<Vec<PathPoint>>,
    segments: Option<Vec<Segment>>,
    ray: Option<Ray>,
}

impl PropagationPathBuilder {
    /// Downward-refracting ("favorable") atmosphere: rays curve toward
    /// the ground (defaults to false).
    #[must_use]
    pub fn favorable(mut self, favorable: bool) -> Self {
        self.favorable = favorable;
        self
    }

    /// Ordered point sequence, source first, receiver last (required).
    #[must_use]
    pub fn points(mut self, points: Vec<PathPoint>) -> Self {
        self.points = Some(points);
        self
    }

    /// Ordered ground segments, one per consecutive point pair
    /// (required).
    #[must_use]
    pub fn segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// True source-receiver ray over the path's mean ground line
    /// (required).
    #[must_use]
    pub fn ray(mut self, ray: Ray) -> Self {
        self.ray = Some(ray);
        self
    }

    /// Validates the structural contract and returns the path.
    ///
    /// # Errors
    ///
    /// [`PathError::Builder`] for a missing required parameter,
    /// [`PathError::TooFewPoints`] and [`PathError::SegmentCount`] for
    /// sequences that violate the point/segment invariant.
    pub fn build(self) -> Result<PropagationPath, PathError> {
        let points = self.points.ok_or(PathError::Builder("points"))?;
        let segments = self.segments.ok_or(PathError::Builder("segments"))?;
        let ray = self.ray.ok_or(PathError::Builder("ray"))?;

        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }
        if segments.len() != points.len() - 1 {
            return Err(PathError::SegmentCount {
                points: points.len(),
                segments: segments.len(),
            });
        }

        Ok(PropagationPath {
            favorable: self.favorable,
            points,
            segments,
            ray,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::PointRole;
    use approx::assert_relative_eq;

    fn flat_ground() -> LineSeg {
        LineSeg::new(Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0))
    }

    fn source(x: f64, z: f64) -> PathPoint {
        PathPoint::new(Point3::new(x, 0.0, z), 0.0, 1.0, 0.0, PointRole::Source)
    }

    fn receiver(x: f64, z: f64) -> PathPoint {
        PathPoint::new(Point3::new(x, 0.0, z), 0.0, 0.0, 0.0, PointRole::Receiver)
    }

    fn diffraction(x: f64, z: f64) -> PathPoint {
        PathPoint::new(
            Point3::new(x, 0.0, z),
            0.0,
            0.0,
            0.0,
            PointRole::VerticalDiffraction,
        )
    }

    fn path_over_flat_ground(points: Vec<PathPoint>, favorable: bool) -> PropagationPath {
        let segments = points
            .windows(2)
            .map(|_| Segment::new(0.5, flat_ground()))
            .collect();
        PropagationPath::builder()
            .favorable(favorable)
            .points(points)
            .segments(segments)
            .ray(Ray::new(flat_ground()))
            .build()
            .unwrap()
    }

    fn direct_path(favorable: bool) -> PropagationPath {
        path_over_flat_ground(vec![source(0.0, 1.0), receiver(100.0, 1.0)], favorable)
    }

    #[test]
    fn test_builder_missing_ray() {
        let err = PropagationPath::builder()
            .points(vec![source(0.0, 1.0), receiver(100.0, 1.0)])
            .segments(vec![Segment::new(0.5, flat_ground())])
            .build()
            .unwrap_err();
        assert!(matches!(err, PathError::Builder("ray")));
    }

    #[test]
    fn test_builder_too_few_points() {
        let err = PropagationPath::builder()
            .points(vec![source(0.0, 1.0)])
            .segments(vec![])
            .ray(Ray::new(flat_ground()))
            .build()
            .unwrap_err();
        assert!(matches!(err, PathError::TooFewPoints(1)));
    }

    #[test]
    fn test_builder_segment_count_mismatch() {
        let err = PropagationPath::builder()
            .points(vec![source(0.0, 1.0), receiver(100.0, 1.0)])
            .segments(vec![])
            .ray(Ray::new(flat_ground()))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            PathError::SegmentCount {
                points: 2,
                segments: 0
            }
        ));
    }

    #[test]
    fn test_direct_path_homogeneous() {
        let augmented = direct_path(false).augment().unwrap();

        assert_eq!(augmented.segments.len(), 1);
        let segment = &augmented.segments[0];
        assert_eq!(segment.start, 0);
        assert_eq!(segment.end, 1);
        assert_relative_eq!(segment.zs, 1.0);
        assert_relative_eq!(segment.zr, 1.0);
        assert_relative_eq!(segment.d, 100.0);
        assert_relative_eq!(segment.dp, 100.0);
        assert_relative_eq!(segment.dc, segment.d);
        assert_relative_eq!(segment.test_form, 100.0 / 60.0);
        // test_form > 1, so the supplied coefficient passes through.
        assert_relative_eq!(segment.g_path_prime, 0.5);
        assert_relative_eq!(segment.zs_prime, 1.55, epsilon = 1e-12);
        assert_relative_eq!(segment.zr_prime, 1.55, epsilon = 1e-12);
        assert_relative_eq!(segment.test_form_prime, 100.0 / 93.0, epsilon = 1e-12);
        assert_eq!(segment.gw, None);
        assert_eq!(segment.gm, None);

        assert_eq!(augmented.rays.len(), 3);
        for ray in &augmented.rays {
            assert_relative_eq!(ray.dc, ray.d);
            assert_relative_eq!(ray.dp, 100.0);
            assert_eq!(ray.e_length, None);
        }
        let direct = &augmented.rays[0];
        assert_eq!(direct.line, flat_ground());
        assert_relative_eq!(direct.d, 100.0);
        // A 2-point path has no interior diffraction points and both
        // endpoint legs run the full source-receiver distance.
        assert_relative_eq!(direct.d_path, 200.0);
        assert_relative_eq!(direct.delta, 100.0);
    }

    #[test]
    fn test_direct_path_favorable() {
        let homogeneous = direct_path(false).augment().unwrap();
        let augmented = direct_path(true).augment().unwrap();

        let segment = &augmented.segments[0];
        assert_relative_eq!(segment.d, 100.0);
        assert_relative_eq!(segment.dc, ray_curve_length(100.0));
        assert!(segment.dc > homogeneous.segments[0].d);

        for ray in &augmented.rays {
            assert_relative_eq!(ray.dc, ray_curve_length(ray.d));
            assert!(ray.dc >= ray.d);
        }
    }

    #[test]
    fn test_mirrored_alternatives() {
        let augmented = direct_path(false).augment().unwrap();

        // S = (0, 0, 1) and R = (100, 0, 1) mirror through the ground
        // plane at z = 0.
        let mirrored_receiver = &augmented.rays[1];
        assert_eq!(
            mirrored_receiver.line,
            LineSeg::new(Point3::new(0.0, 0.0, 1.0), Point3::new(100.0, 0.0, -1.0))
        );
        let mirrored_source = &augmented.rays[2];
        assert_eq!(
            mirrored_source.line,
            LineSeg::new(Point3::new(0.0, 0.0, -1.0), Point3::new(100.0, 0.0, 1.0))
        );

        let image_distance = (100.0_f64.powi(2) + 2.0_f64.powi(2)).sqrt();
        assert_relative_eq!(mirrored_receiver.d, image_distance);
        assert_relative_eq!(mirrored_source.d, image_distance);
    }

    #[test]
    fn test_grounded_segment_is_rejected() {
        let path = path_over_flat_ground(vec![source(0.0, 0.0), receiver(100.0, 0.0)], false);
        let err = path.augment().unwrap_err();
        assert!(matches!(err, PathError::GroundedSegment { index: 0 }));
    }

    #[test]
    fn test_ground_mixing_blend() {
        // zs = zr = 5 and dp = 100 give test_form = 1/3, low enough to
        // mix the segment's ground with the source's.
        let path = path_over_flat_ground(vec![source(0.0, 5.0), receiver(100.0, 5.0)], false);
        let segment = path.augment().unwrap().segments[0];
        assert_relative_eq!(segment.test_form, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            segment.g_path_prime,
            1.0 / 3.0 * 0.5 + 2.0 / 3.0 * 1.0,
            epsilon = 1e-12
        );
        assert!(segment.g_path_prime >= segment.g_path.min(1.0));
        assert!(segment.g_path_prime <= segment.g_path.max(1.0));
    }

    #[test]
    fn test_heights_use_original_coordinates() {
        // The ground projection of segment 0's end point must not leak
        // into segment 1's start height.
        let points = vec![
            source(0.0, 1.0),
            PathPoint::new(
                Point3::new(50.0, 0.0, 10.0),
                2.0,
                0.0,
                0.0,
                PointRole::VerticalDiffraction,
            ),
            receiver(100.0, 1.0),
        ];
        let augmented = path_over_flat_ground(points, false).augment().unwrap();

        assert_relative_eq!(augmented.segments[0].zs, 1.0);
        assert_relative_eq!(augmented.segments[0].zr, 12.0);
        assert_relative_eq!(augmented.segments[1].zs, 12.0);
        assert_relative_eq!(augmented.segments[1].zr, 1.0);
        assert_eq!(augmented.points[1].coord, Point3::new(50.0, 0.0, 10.0));
    }

    #[test]
    fn test_augment_is_idempotent() {
        let path = path_over_flat_ground(
            vec![source(0.0, 2.0), diffraction(40.0, 8.0), receiver(100.0, 3.0)],
            true,
        );
        assert_eq!(path.augment().unwrap(), path.augment().unwrap());
    }

    #[test]
    fn test_diffraction_path_homogeneous() {
        let points = vec![
            source(0.0, 2.0),
            diffraction(30.0, 10.0),
            diffraction(60.0, 12.0),
            receiver(100.0, 3.0),
        ];
        let augmented = path_over_flat_ground(points, false).augment().unwrap();

        let direct = &augmented.rays[0];
        assert_relative_eq!(direct.d, 100.004_999_875_006_25, epsilon = 1e-9);
        assert_relative_eq!(direct.d_path, 102.114_942_149_265_86, epsilon = 1e-9);
        assert_eq!(direct.e_length, Some(30.066_592_756_745_816));
        assert_relative_eq!(direct.delta, direct.d_path - direct.d, epsilon = 1e-9);
    }

    #[test]
    fn test_diffraction_path_favorable() {
        let points = vec![
            source(0.0, 2.0),
            diffraction(30.0, 10.0),
            diffraction(60.0, 12.0),
            receiver(100.0, 3.0),
        ];
        let augmented = path_over_flat_ground(points, true).augment().unwrap();

        let direct = &augmented.rays[0];
        assert_relative_eq!(direct.d_path, 102.120_194_268_298_75, epsilon = 1e-9);
        assert_relative_eq!(
            direct.e_length.unwrap(),
            ray_curve_length(30.066_592_756_745_816),
            epsilon = 1e-9
        );
        assert_relative_eq!(direct.dc, ray_curve_length(direct.d), epsilon = 1e-9);
    }

    #[test]
    fn test_e_length_thresholds() {
        let points = vec![source(0.0, 2.0), diffraction(50.0, 9.0), receiver(100.0, 3.0)];

        // A single diffraction point leaves no leg strictly between
        // the endpoints under homogeneous conditions.
        let homogeneous = path_over_flat_ground(points.clone(), false).augment().unwrap();
        assert_eq!(homogeneous.rays[0].e_length, None);

        let favorable = path_over_flat_ground(points, true).augment().unwrap();
        assert_eq!(favorable.rays[0].e_length, Some(0.0));
    }

    #[test]
    fn test_point_phase_passes_segments_through() {
        let path = direct_path(false);
        let pass = path.augment_segments().unwrap();
        let expected = pass.segments.clone();
        let pass = path.augment_points(pass);
        assert_eq!(pass.segments, expected);
    }

    #[test]
    fn test_dp_is_shared_across_alternatives() {
        let points = vec![
            source(0.0, 2.0),
            diffraction(30.0, 10.0),
            receiver(100.0, 3.0),
        ];
        let augmented = path_over_flat_ground(points, false).augment().unwrap();

        let dp = augmented.rays[0].dp;
        for ray in &augmented.rays {
            assert_relative_eq!(ray.dp, dp);
        }
    }
}
