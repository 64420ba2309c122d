//! Approximation of splines by sequences of lines.

mod polyline;
mod subdivide;

pub use polyline::PolylineSpline;
pub use subdivide::{subdivide_all, subdivide_segment};

use crate::math::Point;

/// Number of splits a segment may take before subdivision gives up.
pub const DEFAULT_MAX_DEPTH: usize = 24;

/// Controls when adaptive subdivision accepts a curve piece as flat.
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionParams {
    /// Maximum distance of the inner control points to the chord.
    pub max_dist: f64,
    /// Maximum number of splits per segment.
    pub max_depth: usize,
}

impl SubdivisionParams {
    #[must_use]
    pub fn new(max_dist: f64) -> Self {
        Self {
            max_dist,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for SubdivisionParams {
    fn default() -> Self {
        Self::new(0.01)
    }
}

/// Line approximating the curve piece between the parameters `t_start` and
/// `t_end` of a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub segment_no: usize,
    pub t_start: f64,
    pub t_end: f64,
    pub p_start: Point,
    pub p_end: Point,
}

/// Sink for the lines produced by subdivision, fed start to end in
/// consecutive order.
pub trait LineCollector {
    fn collect_line(
        &mut self,
        segment_no: usize,
        t_start: f64,
        t_end: f64,
        p_start: &Point,
        p_end: &Point,
    );
}

impl<F: FnMut(usize, f64, f64, &Point, &Point)> LineCollector for F {
    fn collect_line(
        &mut self,
        segment_no: usize,
        t_start: f64,
        t_end: f64,
        p_start: &Point,
        p_end: &Point,
    ) {
        self(segment_no, t_start, t_end, p_start, p_end);
    }
}

/// Collector keeping every line in a vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    pub lines: Vec<Line>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineCollector for LineBuffer {
    fn collect_line(
        &mut self,
        segment_no: usize,
        t_start: f64,
        t_end: f64,
        p_start: &Point,
        p_end: &Point,
    ) {
        self.lines.push(Line {
            segment_no,
            t_start,
            t_end,
            p_start: p_start.clone(),
            p_end: p_end.clone(),
        });
    }
}
