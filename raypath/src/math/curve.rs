/// Length of the circular arc a sound ray of chord length `d` follows
/// under a downward-refracting atmosphere.
///
/// The radius floor of 1000 m bounds curvature for very short rays;
/// the `8d` scaling keeps `d / 2γ ≤ 1/16`, inside asin's domain.
pub fn ray_curve_length(d: f64) -> f64 {
    let gamma = 1000_f64.max(8.0 * d);
    2.0 * gamma * (d / (2.0 * gamma)).asin()
}
