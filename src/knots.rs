use crate::error::{DomainError, KnotError, Result};

/// Knot vector of a spline, mapping the global parameter to segments.
///
/// Uniform knots are purely structural: knot no. `i` sits at parameter `i`
/// and every segment has length 1. Non-uniform knots carry explicit,
/// monotonically non-decreasing parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Knots {
    Uniform { knot_count: usize },
    NonUniform { ts: Vec<f64> },
}

impl Knots {
    /// Creates uniform knots `0, 1, ..., knot_count - 1`.
    #[must_use]
    pub fn uniform(knot_count: usize) -> Self {
        Self::Uniform { knot_count }
    }

    /// Creates non-uniform knots from explicit parameter values.
    ///
    /// # Panics
    ///
    /// Panics if the values are not monotonically non-decreasing.
    #[must_use]
    pub fn non_uniform(ts: Vec<f64>) -> Self {
        assert!(
            ts.windows(2).all(|w| w[0] <= w[1]),
            "knots must be monotonically non-decreasing"
        );
        Self::NonUniform { ts }
    }

    #[must_use]
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform { .. })
    }

    #[must_use]
    pub fn knot_count(&self) -> usize {
        match self {
            Self::Uniform { knot_count } => *knot_count,
            Self::NonUniform { ts } => ts.len(),
        }
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.knot_count().saturating_sub(1)
    }

    #[must_use]
    pub fn knot_exists(&self, knot_no: usize) -> bool {
        knot_no < self.knot_count()
    }

    #[must_use]
    pub fn segment_exists(&self, segment_no: usize) -> bool {
        segment_no < self.segment_count()
    }

    /// First parameter of the domain.
    #[must_use]
    pub fn t_start(&self) -> f64 {
        match self {
            Self::Uniform { .. } => 0.0,
            Self::NonUniform { ts } => ts.first().copied().unwrap_or(0.0),
        }
    }

    /// Last parameter of the domain.
    ///
    /// For empty uniform knots this is -1, so an empty domain shows up as
    /// `t_start() > t_end()`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn t_end(&self) -> f64 {
        match self {
            Self::Uniform { knot_count } => *knot_count as f64 - 1.0,
            Self::NonUniform { ts } => ts.last().copied().unwrap_or(0.0),
        }
    }

    /// Parameter value of knot no. `knot_no`.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::KnotNotFound`] if the knot does not exist.
    #[allow(clippy::cast_precision_loss)]
    pub fn knot(&self, knot_no: usize) -> Result<f64> {
        if !self.knot_exists(knot_no) {
            return Err(KnotError::KnotNotFound(knot_no).into());
        }
        match self {
            Self::Uniform { .. } => Ok(knot_no as f64),
            Self::NonUniform { ts } => Ok(ts[knot_no]),
        }
    }

    /// Length of segment no. `segment_no` in parameter space.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::SegmentNotFound`] if the segment does not exist.
    pub fn segment_len(&self, segment_no: usize) -> Result<f64> {
        let (t_start, t_end) = self.segment_range(segment_no)?;
        Ok(t_end - t_start)
    }

    /// Parameter range `(t_start, t_end)` of segment no. `segment_no`.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::SegmentNotFound`] if the segment does not exist.
    #[allow(clippy::cast_precision_loss)]
    pub fn segment_range(&self, segment_no: usize) -> Result<(f64, f64)> {
        if !self.segment_exists(segment_no) {
            return Err(KnotError::SegmentNotFound(segment_no).into());
        }
        match self {
            Self::Uniform { .. } => Ok((segment_no as f64, (segment_no + 1) as f64)),
            Self::NonUniform { ts } => Ok((ts[segment_no], ts[segment_no + 1])),
        }
    }

    /// Maps a global parameter to `(segment_no, u)` with `u` in `[0, 1]`.
    ///
    /// The last knot maps to the end of the final segment, every other
    /// parameter to the half-open segment containing it.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the domain is empty or `t` lies outside
    /// of it.
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn map_to_segment(&self, t: f64) -> Result<(usize, f64)> {
        let segment_count = self.segment_count();
        if segment_count == 0 {
            return Err(DomainError::EmptyDomain.into());
        }
        let t_start = self.t_start();
        if t < t_start {
            return Err(DomainError::BelowDomain { t, t_start }.into());
        }
        let t_end = self.t_end();
        if t > t_end {
            return Err(DomainError::AboveDomain { t, t_end }.into());
        }
        if t == t_end {
            return Ok((segment_count - 1, 1.0));
        }

        match self {
            Self::Uniform { .. } => Ok((t.trunc() as usize, t.fract())),
            Self::NonUniform { ts } => {
                for segment_no in 0..segment_count {
                    if t < ts[segment_no + 1] {
                        let len = ts[segment_no + 1] - ts[segment_no];
                        let u = if len == 0.0 { 0.0 } else { (t - ts[segment_no]) / len };
                        return Ok((segment_no, u));
                    }
                }
                // Not reached for finite t, but NaN falls through to here.
                Err(DomainError::AboveDomain { t, t_end }.into())
            }
        }
    }

    /// Inserts a knot at position `knot_no`, valid from 0 (prepend) through
    /// `knot_count()` (append).
    ///
    /// Uniform knots only grow by one. Non-uniform knots duplicate the
    /// neighboring value, creating a zero-length segment.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::InvalidInsertion`] if `knot_no` is out of range.
    pub fn add_knot(&mut self, knot_no: usize) -> Result<()> {
        let knot_count = self.knot_count();
        if knot_no > knot_count {
            return Err(KnotError::InvalidInsertion { no: knot_no, knot_count }.into());
        }
        match self {
            Self::Uniform { knot_count } => *knot_count += 1,
            Self::NonUniform { ts } => {
                let t = if ts.is_empty() { 0.0 } else { ts[knot_no.min(ts.len() - 1)] };
                ts.insert(knot_no, t);
            }
        }
        Ok(())
    }

    /// Removes the knot at position `knot_no`.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::KnotNotFound`] if the knot does not exist.
    pub fn delete_knot(&mut self, knot_no: usize) -> Result<()> {
        if !self.knot_exists(knot_no) {
            return Err(KnotError::KnotNotFound(knot_no).into());
        }
        match self {
            Self::Uniform { knot_count } => *knot_count -= 1,
            Self::NonUniform { ts } => {
                ts.remove(knot_no);
            }
        }
        Ok(())
    }

    /// Sets the length of segment no. `segment_no`, shifting all subsequent
    /// knots so their segment lengths stay unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::SegmentNotFound`] if the segment does not exist,
    /// [`KnotError::UniformSegmentLength`] on uniform knots for any length
    /// other than 1, and [`KnotError::NegativeSegmentLength`] for negative
    /// lengths.
    #[allow(clippy::float_cmp)]
    pub fn set_segment_len(&mut self, segment_no: usize, len: f64) -> Result<()> {
        if !self.segment_exists(segment_no) {
            return Err(KnotError::SegmentNotFound(segment_no).into());
        }
        match self {
            Self::Uniform { .. } => {
                if len != 1.0 {
                    return Err(KnotError::UniformSegmentLength(len).into());
                }
            }
            Self::NonUniform { ts } => {
                if len < 0.0 {
                    return Err(KnotError::NegativeSegmentLength(len).into());
                }
                let delta = ts[segment_no] + len - ts[segment_no + 1];
                for t in ts.iter_mut().skip(segment_no + 1) {
                    *t += delta;
                }
            }
        }
        Ok(())
    }

    /// Segment range `(from_segment_no, to_segment_no)` around knot no.
    /// `knot_no`, restricted to the requested sides.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::KnotNotFound`] if the knot does not exist and
    /// [`KnotError::NoAdjacentSegment`] if a requested side has no segment
    /// or neither side is requested.
    pub fn adjacent_segments(
        &self,
        knot_no: usize,
        with_before: bool,
        with_after: bool,
    ) -> Result<(usize, usize)> {
        if !self.knot_exists(knot_no) {
            return Err(KnotError::KnotNotFound(knot_no).into());
        }
        let no_adjacent = || KnotError::NoAdjacentSegment(knot_no);
        let from = if with_before {
            knot_no.checked_sub(1).ok_or_else(no_adjacent)?
        } else {
            knot_no
        };
        let to = if with_after {
            knot_no
        } else {
            knot_no.checked_sub(1).ok_or_else(no_adjacent)?
        };
        if from > to || !self.segment_exists(to) {
            return Err(no_adjacent().into());
        }
        Ok((from, to))
    }

    /// Explicit parameter values, `None` for uniform knots.
    #[must_use]
    pub fn external(&self) -> Option<Vec<f64>> {
        match self {
            Self::Uniform { .. } => None,
            Self::NonUniform { ts } => Some(ts.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    // ── uniform knots ──

    #[test]
    fn uniform_queries_and_mapping() {
        let knots = Knots::uniform(4);
        assert!(knots.is_uniform());
        assert!(knots.external().is_none());
        assert_eq!(knots.knot_count(), 4);
        assert_eq!(knots.segment_count(), 3);
        assert!((knots.t_start() - 0.0).abs() < TOL);
        assert!((knots.t_end() - 3.0).abs() < TOL);
        assert!((knots.knot(1).unwrap() - 1.0).abs() < TOL);
        assert!((knots.segment_len(2).unwrap() - 1.0).abs() < TOL);

        let (segment_no, u) = knots.map_to_segment(2.0).unwrap();
        assert_eq!(segment_no, 2);
        assert!(u.abs() < TOL, "u={u}");
        let (segment_no, u) = knots.map_to_segment(2.5).unwrap();
        assert_eq!(segment_no, 2);
        assert!((u - 0.5).abs() < TOL, "u={u}");

        // The last knot belongs to the end of the final segment.
        let (segment_no, u) = knots.map_to_segment(3.0).unwrap();
        assert_eq!(segment_no, 2);
        assert!((u - 1.0).abs() < TOL, "u={u}");
    }

    #[test]
    fn uniform_mutation() {
        let mut knots = Knots::uniform(3);
        assert!(knots.add_knot(10).is_err());
        knots.add_knot(3).unwrap();
        knots.delete_knot(1).unwrap();
        knots.add_knot(0).unwrap();
        assert_eq!(knots.knot_count(), 4);
        assert!((knots.t_end() - 3.0).abs() < TOL);

        assert!(knots.set_segment_len(1, 0.5).is_err());
        knots.set_segment_len(1, 1.0).unwrap();
        assert!((knots.segment_len(1).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn uniform_domain_errors() {
        let knots = Knots::uniform(4);
        assert!(knots.map_to_segment(-0.1).is_err());
        assert!(knots.map_to_segment(3.1).is_err());
        assert!(knots.knot(4).is_err());
        assert!(knots.segment_len(3).is_err());
    }

    // ── non-uniform knots ──

    #[test]
    fn non_uniform_queries_and_mapping() {
        let ts = vec![0.0, 0.8, 2.5, 3.0];
        let knots = Knots::non_uniform(ts.clone());
        assert!(!knots.is_uniform());
        assert_eq!(knots.external().unwrap(), ts);
        assert_eq!(knots.knot_count(), 4);
        assert!((knots.t_start() - 0.0).abs() < TOL);
        assert!((knots.t_end() - 3.0).abs() < TOL);
        assert!((knots.knot(1).unwrap() - 0.8).abs() < TOL);
        assert!((knots.segment_len(2).unwrap() - 0.5).abs() < TOL);

        // A knot value maps to the start of the segment it opens.
        let (segment_no, u) = knots.map_to_segment(2.5).unwrap();
        assert_eq!(segment_no, 2);
        assert!(u.abs() < TOL, "u={u}");
        let (segment_no, u) = knots.map_to_segment(2.8).unwrap();
        assert_eq!(segment_no, 2);
        assert!((u - 3.0 / 5.0).abs() < TOL, "u={u}");
        let (segment_no, u) = knots.map_to_segment(3.0).unwrap();
        assert_eq!(segment_no, 2);
        assert!((u - 1.0).abs() < TOL, "u={u}");
    }

    #[test]
    fn non_uniform_mutation() {
        let ts = vec![0.0, 0.8, 2.5, 3.0];
        let mut knots = Knots::non_uniform(ts.clone());

        assert!(knots.add_knot(10).is_err());
        knots.add_knot(2).unwrap();
        assert_eq!(knots.external().unwrap(), vec![0.0, 0.8, 2.5, 2.5, 3.0]);
        knots.delete_knot(2).unwrap();
        knots.delete_knot(3).unwrap();
        knots.add_knot(3).unwrap();
        knots.set_segment_len(2, 0.5).unwrap();
        assert_eq!(knots.external().unwrap(), ts);

        // Move knot no. 1 from 0.8 to 0.5, later knots keep their lengths.
        knots.set_segment_len(0, 0.5).unwrap();
        knots.set_segment_len(1, 2.0).unwrap();
        assert_eq!(knots.external().unwrap(), vec![0.0, 0.5, 2.5, 3.0]);
        assert!((knots.knot(1).unwrap() - 0.5).abs() < TOL);
        assert!((knots.segment_len(2).unwrap() - 0.5).abs() < TOL);
        assert!((knots.t_end() - 3.0).abs() < TOL);

        assert!(knots.set_segment_len(1, -0.5).is_err());
    }

    #[test]
    fn non_uniform_zero_length_segment() {
        let knots = Knots::non_uniform(vec![0.0, 1.0, 1.0, 2.0]);
        assert!((knots.segment_len(1).unwrap() - 0.0).abs() < TOL);

        // The shared knot value maps past the zero-length segment.
        let (segment_no, u) = knots.map_to_segment(1.0).unwrap();
        assert_eq!(segment_no, 2);
        assert!(u.abs() < TOL, "u={u}");
        let (segment_no, u) = knots.map_to_segment(1.5).unwrap();
        assert_eq!(segment_no, 2);
        assert!((u - 0.5).abs() < TOL, "u={u}");
    }

    // ── empty domains ──

    #[test]
    fn empty_domains_reject_mapping() {
        assert!(Knots::uniform(0).map_to_segment(0.0).is_err());
        assert!(Knots::uniform(1).map_to_segment(0.0).is_err());
        assert!(Knots::non_uniform(vec![]).map_to_segment(0.0).is_err());
        assert!(Knots::non_uniform(vec![2.0]).map_to_segment(2.0).is_err());
    }

    #[test]
    fn empty_uniform_domain_is_inverted() {
        let knots = Knots::uniform(0);
        assert!(knots.t_start() > knots.t_end());
    }

    // ── adjacent segments ──

    #[test]
    fn adjacent_segments_around_inner_knot() {
        let knots = Knots::uniform(4);
        assert_eq!(knots.adjacent_segments(2, true, true).unwrap(), (1, 2));
        assert_eq!(knots.adjacent_segments(2, true, false).unwrap(), (1, 1));
        assert!(knots.adjacent_segments(0, true, false).is_err());
        assert!(knots.adjacent_segments(3, false, true).is_err());
        assert!(knots.adjacent_segments(2, false, false).is_err());
    }

    #[test]
    fn adjacent_segments_on_degenerate_knots() {
        assert!(Knots::uniform(0).adjacent_segments(0, true, true).is_err());
        assert!(Knots::uniform(1).adjacent_segments(0, true, true).is_err());
    }
}
