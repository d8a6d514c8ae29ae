use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("a propagation path needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("expected one segment per point pair, got {segments} segments for {points} points")]
    SegmentCount { points: usize, segments: usize },

    #[error("segment {index} has a grounded source and receiver (zs + zr == 0)")]
    GroundedSegment { index: usize },
}
