use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use nalgebra::Point3;
use std::str::FromStr;

/// Augment a direct source-to-receiver propagation path over flat
/// ground and print its geometric quantities.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Source "x,y,z" (meters).
    #[arg(long)]
    pub source: Xyz,

    /// Receiver "x,y,z" (meters).
    #[arg(long)]
    pub receiver: Xyz,

    /// Ground-path absorption coefficient.
    #[arg(long, default_value_t = 0.0)]
    pub g_path: f64,

    /// Ground porosity at the source.
    #[arg(long, default_value_t = 0.0)]
    pub gs: f64,

    /// Assume a downward-refracting (favorable) atmosphere.
    #[arg(long)]
    pub favorable: bool,
}

#[derive(Clone, Debug, Copy)]
pub struct Xyz(pub Point3<f64>);

impl FromStr for Xyz {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let mut parts = s.split(',').map(f64::from_str);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Ok(Self(Point3::new(x, y, z))),
            _ => Err(anyhow!("not a valid x,y,z")),
        }
    }
}
