use crate::error::{DomainError, Result};
use crate::knots::Knots;
use crate::math::Point;
use crate::spline::{Spline, SplineBuilder};
use crate::tessellation::{subdivide_all, Line, LineBuffer, SubdivisionParams};

/// Spline approximated by consecutive lines, evaluated by interpolating
/// within the line covering `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSpline {
    knots: Knots,
    lines: Vec<Line>,
}

impl PolylineSpline {
    /// Creates the spline from lines that must cover the domain in
    /// consecutive order.
    #[must_use]
    pub fn new(knots: Knots, lines: Vec<Line>) -> Self {
        Self { knots, lines }
    }

    /// Builds the spline by subdividing every segment of `builder`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SubdivisionError::MaxDepthExceeded`] if a
    /// segment does not flatten within the depth limit.
    pub fn from_builder(builder: &dyn SplineBuilder, params: &SubdivisionParams) -> Result<Self> {
        let mut buffer = LineBuffer::new();
        subdivide_all(builder, params, &mut buffer)?;
        Ok(Self::new(builder.knots().clone(), buffer.lines))
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

impl Spline for PolylineSpline {
    fn knots(&self) -> &Knots {
        &self.knots
    }

    #[allow(clippy::float_cmp)]
    fn at(&self, t: f64) -> Result<Point> {
        if self.lines.is_empty() {
            return Err(DomainError::EmptyDomain.into());
        }
        let t_start = self.lines[0].t_start;
        if t < t_start {
            return Err(DomainError::BelowDomain { t, t_start }.into());
        }
        let t_end = self.lines[self.lines.len() - 1].t_end;
        if t > t_end {
            return Err(DomainError::AboveDomain { t, t_end }.into());
        }

        // first line whose end parameter reaches t
        let idx = self.lines.partition_point(|line| line.t_end < t);
        let line = &self.lines[idx];
        let span = line.t_end - line.t_start;
        if span == 0.0 {
            return Ok(line.p_start.clone());
        }
        let fac = (t - line.t_start) / span;
        Ok(line.p_start.lerp(&line.p_end, fac))
    }
}
