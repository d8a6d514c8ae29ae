mod options;

use anyhow::Error as AnyErr;
use clap::Parser;
use nalgebra::Point3;
use options::{Cli, Xyz};
use raypath::{LineSeg, PathPoint, PointRole, PropagationPath, Ray, Segment};

// Example for a receiver 100 m from a 1 m high source, favorable
// atmosphere.
// ```
// cargo run --example augment -- --source=0,0,1 --receiver=100,0,1 --g-path=0.5 --gs=1 --favorable
// ```
fn main() -> Result<(), AnyErr> {
    env_logger::init();

    let Cli {
        source: Xyz(source),
        receiver: Xyz(receiver),
        g_path,
        gs,
        favorable,
    } = Cli::parse();

    let ground = LineSeg::new(
        Point3::new(source.x, source.y, 0.0),
        Point3::new(receiver.x, receiver.y, 0.0),
    );

    let path = PropagationPath::builder()
        .favorable(favorable)
        .points(vec![
            PathPoint::new(source, 0.0, gs, 0.0, PointRole::Source),
            PathPoint::new(receiver, 0.0, 0.0, 0.0, PointRole::Receiver),
        ])
        .segments(vec![Segment::new(g_path, ground)])
        .ray(Ray::new(ground))
        .build()?;
    let augmented = path.augment()?;

    for segment in &augmented.segments {
        println!(
            "segment {}-{}: d = {:.3} m, dc = {:.3} m, dp = {:.3} m, zs = {:.2} m, zr = {:.2} m, g_path' = {:.3}",
            segment.start,
            segment.end,
            segment.d,
            segment.dc,
            segment.dp,
            segment.zs,
            segment.zr,
            segment.g_path_prime,
        );
    }
    for (n, ray) in augmented.rays.iter().enumerate() {
        println!(
            "ray {n}: d = {:.3} m, dc = {:.3} m, dp = {:.3} m, d_path = {:.3} m, delta = {:.3} m",
            ray.d, ray.dc, ray.dp, ray.d_path, ray.delta,
        );
    }

    Ok(())
}
