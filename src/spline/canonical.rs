use nalgebra::DMatrix;

use crate::error::Result;
use crate::knots::Knots;
use crate::math::Point;
use crate::spline::basis;
use crate::spline::bezier::BezierVertexBuilder;
use crate::spline::Spline;
use crate::tessellation::{LineCollector, SubdivisionParams};

/// Cubic polynomial `a + b*u + c*u^2 + d*u^3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPoly {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl CubicPoly {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    #[must_use]
    pub fn at(&self, u: f64) -> f64 {
        self.a + u * (self.b + u * (self.c + self.d * u))
    }
}

/// Cubic polynomials of one segment, one per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicPolys {
    polys: Vec<CubicPoly>,
}

impl CubicPolys {
    #[must_use]
    pub fn new(polys: Vec<CubicPoly>) -> Self {
        Self { polys }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.polys.len()
    }

    #[must_use]
    pub fn at(&self, u: f64) -> Point {
        Point::from_iterator(self.polys.len(), self.polys.iter().map(|poly| poly.at(u)))
    }
}

/// Spline in canonical power-basis form, one [`CubicPolys`] per segment
/// evaluated in the segment-local parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSpline {
    knots: Knots,
    cubics: Vec<CubicPolys>,
}

impl CanonicalSpline {
    /// Creates a spline from per-segment polynomials, `ts` of `None` meaning
    /// uniform knots.
    ///
    /// # Panics
    ///
    /// Panics if the number of knots does not fit the number of segments.
    #[must_use]
    pub fn new(ts: Option<Vec<f64>>, cubics: Vec<CubicPolys>) -> Self {
        let knots = match ts {
            None => {
                let knot_count = if cubics.is_empty() { 0 } else { cubics.len() + 1 };
                Knots::uniform(knot_count)
            }
            Some(ts) => {
                if cubics.is_empty() {
                    assert!(ts.is_empty(), "knots must be empty if no cubics are given");
                } else {
                    assert!(
                        ts.len() == cubics.len() + 1,
                        "there must be one more knot than cubics"
                    );
                }
                Knots::non_uniform(ts)
            }
        };
        Self { knots, cubics }
    }

    /// Creates the constant spline through a single vertex, its domain being
    /// the knot value `t0` only.
    #[must_use]
    pub fn single_vertex(loc: &Point, t0: f64) -> Self {
        let polys = loc
            .iter()
            .map(|&coord| CubicPoly::new(coord, 0.0, 0.0, 0.0))
            .collect();
        Self::new(Some(vec![t0, t0]), vec![CubicPolys::new(polys)])
    }

    /// Creates a spline from coefficient rows `[a, b, c, d]`, one row per
    /// dimension per segment.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero or the knots do not fit the matrix size.
    #[must_use]
    pub fn from_matrix(ts: Option<Vec<f64>>, dim: usize, coefs: &DMatrix<f64>) -> Self {
        let segment_count = coefs.nrows() / dim;
        let mut cubics = Vec::with_capacity(segment_count);
        for segment_no in 0..segment_count {
            let polys = (0..dim)
                .map(|d| {
                    let row = segment_no * dim + d;
                    CubicPoly::new(
                        coefs[(row, 0)],
                        coefs[(row, 1)],
                        coefs[(row, 2)],
                        coefs[(row, 3)],
                    )
                })
                .collect();
            cubics.push(CubicPolys::new(polys));
        }
        Self::new(ts, cubics)
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.cubics.first().map_or(0, CubicPolys::dim)
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.cubics.len()
    }

    /// Converts to a Bezier builder holding the same curve.
    ///
    /// # Panics
    ///
    /// Panics for non-uniform knots, where the conversion is not
    /// implemented yet.
    #[must_use]
    pub fn to_bezier(&self) -> BezierVertexBuilder {
        if self.cubics.is_empty() {
            return BezierVertexBuilder::uniform(vec![]);
        }
        if !self.knots.is_uniform() {
            unimplemented!("canonical to bezier conversion for non-uniform knots");
        }

        let segment_count = self.knots.segment_count();
        let dim = self.dim();
        let mut samples = Vec::with_capacity(segment_count * dim * 4);
        for cubic in &self.cubics {
            for poly in &cubic.polys {
                samples.extend_from_slice(&[poly.a, poly.b, poly.c, poly.d]);
            }
        }
        let samples = DMatrix::from_row_slice(segment_count * dim, 4, &samples);
        let coefs = samples * basis::canonical_to_bezier();
        BezierVertexBuilder::from_matrix(self.knots.external(), dim, &coefs)
    }

    /// Approximates segments `from_segment_no..=to_segment_no` with lines,
    /// going through the Bezier form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SubdivisionError::MaxDepthExceeded`] if a
    /// segment does not flatten within the depth limit.
    pub fn subdivide(
        &self,
        from_segment_no: usize,
        to_segment_no: usize,
        params: &SubdivisionParams,
        collector: &mut dyn LineCollector,
    ) -> Result<()> {
        use crate::spline::SplineBuilder;
        self.to_bezier()
            .subdivide(from_segment_no, to_segment_no, params, collector)
    }
}

impl Spline for CanonicalSpline {
    fn knots(&self) -> &Knots {
        &self.knots
    }

    fn at(&self, t: f64) -> Result<Point> {
        let (segment_no, u) = self.knots.map_to_segment(t)?;
        Ok(self.cubics[segment_no].at(u))
    }
}
