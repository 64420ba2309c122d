use thiserror::Error;

/// Top-level error type for the curvis spline engine.
#[derive(Debug, Error)]
pub enum CurvisError {
    #[error(transparent)]
    Knot(#[from] KnotError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Subdivision(#[from] SubdivisionError),
}

/// Errors related to knot vector queries and mutations.
#[derive(Debug, Error)]
pub enum KnotError {
    #[error("knot with no. {0} does not exist")]
    KnotNotFound(usize),

    #[error("segment with no. {0} does not exist")]
    SegmentNotFound(usize),

    #[error("cannot insert knot at no. {no}, valid range is 0..={knot_count}")]
    InvalidInsertion { no: usize, knot_count: usize },

    #[error("cannot set segment length {0} on uniform knots, only length 1 is allowed")]
    UniformSegmentLength(f64),

    #[error("segment length {0} must not be negative")]
    NegativeSegmentLength(f64),

    #[error("knot with no. {0} has no adjacent segment on the requested side")]
    NoAdjacentSegment(usize),
}

/// Errors related to evaluating a spline outside its parameter domain.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("knots define an empty domain, at least two knots are required")]
    EmptyDomain,

    #[error("parameter {t} smaller than first knot {t_start}")]
    BelowDomain { t: f64, t_start: f64 },

    #[error("parameter {t} greater than last knot {t_end}")]
    AboveDomain { t: f64, t_end: f64 },
}

/// Errors related to adaptive subdivision.
#[derive(Debug, Error)]
pub enum SubdivisionError {
    #[error(
        "segment {segment_no} still exceeds max distance {max_dist} after {max_depth} splits"
    )]
    MaxDepthExceeded {
        segment_no: usize,
        max_dist: f64,
        max_depth: usize,
    },
}

/// Convenience type alias for results using [`CurvisError`].
pub type Result<T> = std::result::Result<T, CurvisError>;
