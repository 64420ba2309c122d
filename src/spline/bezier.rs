use nalgebra::DMatrix;

use crate::error::{KnotError, Result};
use crate::knots::Knots;
use crate::math::{Point, Vector};
use crate::spline::basis;
use crate::spline::canonical::CanonicalSpline;
use crate::spline::vertex::{BezierVertex, Vertex};
use crate::spline::{Spline, SplineBuilder, SplineVertexBuilder};
use crate::tessellation::{subdivide_segment, LineCollector, SubdivisionParams};

fn expect_bezier(vertex: Vertex) -> BezierVertex {
    match vertex {
        Vertex::Bezier(vertex) => vertex,
        Vertex::Hermite(_) => panic!("bezier builder requires bezier vertices"),
    }
}

/// Builder for cubic Bezier splines from vertices holding absolute control
/// points.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierVertexBuilder {
    knots: Knots,
    vertices: Vec<BezierVertex>,
}

impl BezierVertexBuilder {
    #[must_use]
    pub fn uniform(vertices: Vec<BezierVertex>) -> Self {
        Self {
            knots: Knots::uniform(vertices.len()),
            vertices,
        }
    }

    /// # Panics
    ///
    /// Panics if `ts` and `vertices` differ in length or `ts` is not
    /// monotonically increasing.
    #[must_use]
    pub fn non_uniform(ts: Vec<f64>, vertices: Vec<BezierVertex>) -> Self {
        assert!(
            ts.len() == vertices.len(),
            "knots and vertices must have the same length"
        );
        Self {
            knots: Knots::non_uniform(ts),
            vertices,
        }
    }

    /// Creates a builder from control rows `[start, exit, entry, end]`, one
    /// row per dimension per segment, `ts` of `None` meaning uniform knots.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero or the matrix does not hold at least one
    /// segment of `dim` rows.
    #[must_use]
    pub fn from_matrix(ts: Option<Vec<f64>>, dim: usize, coefs: &DMatrix<f64>) -> Self {
        assert!(dim > 0, "dimension must not be zero");
        let segment_count = coefs.nrows() / dim;
        assert!(segment_count > 0, "matrix must hold at least one segment");
        let column = |row: usize, col: usize| {
            Point::from_iterator(dim, (0..dim).map(|d| coefs[(row + d, col)]))
        };

        let mut vertices = Vec::with_capacity(segment_count + 1);

        // Start vertex, its entry control unused.
        vertices.push(BezierVertex::new(
            column(0, 0),
            Some(Vector::zeros(dim)),
            Some(column(0, 1)),
        ));
        for segment_no in 1..segment_count {
            let row = segment_no * dim;
            vertices.push(BezierVertex::new(
                column(row, 0),
                Some(column(row - dim, 2)),
                Some(column(row, 1)),
            ));
        }
        let last_row = (segment_count - 1) * dim;
        vertices.push(BezierVertex::new(
            column(last_row, 3),
            Some(column(last_row, 2)),
            Some(Vector::zeros(dim)),
        ));

        match ts {
            None => Self::uniform(vertices),
            Some(ts) => Self::non_uniform(ts, vertices),
        }
    }

    #[must_use]
    pub fn bezier_vertex(&self, knot_no: usize) -> Option<&BezierVertex> {
        self.vertices.get(knot_no)
    }

    fn uniform_canonical(&self) -> CanonicalSpline {
        // precondition: at least one segment, uniform knots
        let segment_count = self.knots.segment_count();
        let dim = self.dim();

        let mut samples = Vec::with_capacity(segment_count * dim * 4);
        for segment_no in 0..segment_count {
            let v_start = &self.vertices[segment_no];
            let v_end = &self.vertices[segment_no + 1];
            for d in 0..dim {
                samples.extend_from_slice(&[
                    v_start.loc()[d],
                    v_start.exit()[d],
                    v_end.entry()[d],
                    v_end.loc()[d],
                ]);
            }
        }
        let samples = DMatrix::from_row_slice(segment_count * dim, 4, &samples);
        let coefs = samples * basis::bezier_to_canonical();

        CanonicalSpline::from_matrix(self.knots.external(), dim, &coefs)
    }

    /// Builds a spline evaluating by the De Casteljau algorithm instead of
    /// canonical polynomials.
    #[must_use]
    pub fn to_de_casteljau(&self) -> DeCasteljauSpline {
        let segment_count = self.knots.segment_count();
        let mut controls = Vec::with_capacity(segment_count * 4);
        for segment_no in 0..segment_count {
            let v_start = &self.vertices[segment_no];
            let v_end = &self.vertices[segment_no + 1];
            controls.push(v_start.loc().clone());
            controls.push(v_start.exit().clone());
            controls.push(v_end.entry().clone());
            controls.push(v_end.loc().clone());
        }
        DeCasteljauSpline::new(self.knots.clone(), controls)
    }
}

impl SplineBuilder for BezierVertexBuilder {
    fn knots(&self) -> &Knots {
        &self.knots
    }

    fn dim(&self) -> usize {
        self.vertices.first().map_or(0, |vertex| vertex.loc().len())
    }

    /// Converts to canonical form.
    ///
    /// # Panics
    ///
    /// Panics for non-uniform knots with more than one vertex, where the
    /// conversion is not implemented yet.
    fn to_canonical(&self) -> CanonicalSpline {
        match self.vertices.len() {
            0 => CanonicalSpline::new(self.knots.external(), vec![]),
            1 => CanonicalSpline::single_vertex(self.vertices[0].loc(), self.knots.t_start()),
            _ => {
                if self.knots.is_uniform() {
                    self.uniform_canonical()
                } else {
                    unimplemented!("bezier to canonical conversion for non-uniform knots")
                }
            }
        }
    }

    fn subdivide(
        &self,
        from_segment_no: usize,
        to_segment_no: usize,
        params: &SubdivisionParams,
        collector: &mut dyn LineCollector,
    ) -> Result<()> {
        let segment_count = self.knots.segment_count();
        if segment_count == 0 {
            return Ok(());
        }
        for segment_no in from_segment_no..=to_segment_no.min(segment_count - 1) {
            let (t_start, t_end) = self.knots.segment_range(segment_no)?;
            let v_start = &self.vertices[segment_no];
            let v_end = &self.vertices[segment_no + 1];
            subdivide_segment(
                segment_no,
                t_start,
                t_end,
                v_start.loc(),
                v_start.exit(),
                v_end.entry(),
                v_end.loc(),
                params,
                collector,
            )?;
        }
        Ok(())
    }
}

impl SplineVertexBuilder for BezierVertexBuilder {
    fn vertex(&self, knot_no: usize) -> Option<Vertex> {
        self.vertices.get(knot_no).cloned().map(Vertex::from)
    }

    fn add_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        self.knots.add_knot(knot_no)?;
        self.vertices.insert(knot_no, expect_bezier(vertex));
        Ok(())
    }

    fn update_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        if !self.knots.knot_exists(knot_no) {
            return Err(KnotError::KnotNotFound(knot_no).into());
        }
        self.vertices[knot_no] = expect_bezier(vertex);
        Ok(())
    }

    fn delete_vertex(&mut self, knot_no: usize) -> Result<()> {
        self.knots.delete_knot(knot_no)?;
        self.vertices.remove(knot_no);
        Ok(())
    }
}

/// Bezier spline evaluating by repeated linear interpolation of the
/// control points.
#[derive(Debug, Clone, PartialEq)]
pub struct DeCasteljauSpline {
    knots: Knots,
    // bezier controls, 4 per segment in consecutive order
    controls: Vec<Point>,
}

impl DeCasteljauSpline {
    #[must_use]
    pub fn new(knots: Knots, controls: Vec<Point>) -> Self {
        Self { knots, controls }
    }
}

impl Spline for DeCasteljauSpline {
    fn knots(&self) -> &Knots {
        &self.knots
    }

    fn at(&self, t: f64) -> Result<Point> {
        let (segment_no, u) = self.knots.map_to_segment(t)?;

        let idx = segment_no * 4;
        let (start, exit, entry, end) = (
            &self.controls[idx],
            &self.controls[idx + 1],
            &self.controls[idx + 2],
            &self.controls[idx + 3],
        );
        let b01 = start.lerp(exit, u);
        let b11 = exit.lerp(entry, u);
        let b21 = entry.lerp(end, u);
        let b02 = b01.lerp(&b11, u);
        let b12 = b11.lerp(&b21, u);
        Ok(b02.lerp(&b12, u))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    const TOL: f64 = 1e-10;

    fn assert_at(spline: &impl Spline, t: f64, x: f64, y: f64) {
        let p = spline.at(t).unwrap();
        assert!(
            (p[0] - x).abs() < TOL && (p[1] - y).abs() < TOL,
            "at({t}) = ({}, {}), expected ({x}, {y})",
            p[0],
            p[1]
        );
    }

    // Straight line from (0,0) to (1,1) with evenly spaced controls.
    fn diagonal() -> BezierVertexBuilder {
        BezierVertexBuilder::uniform(vec![
            BezierVertex::new(
                dvector![0.0, 0.0],
                None,
                Some(dvector![1.0 / 3.0, 1.0 / 3.0]),
            ),
            BezierVertex::new(
                dvector![1.0, 1.0],
                Some(dvector![2.0 / 3.0, 2.0 / 3.0]),
                None,
            ),
        ])
    }

    // S-formed slope from (0,0) to (1,1).
    fn s_curve() -> BezierVertexBuilder {
        BezierVertexBuilder::uniform(vec![
            BezierVertex::new(dvector![0.0, 0.0], None, Some(dvector![1.0, 0.0])),
            BezierVertex::new(dvector![1.0, 1.0], Some(dvector![0.0, 1.0]), None),
        ])
    }

    // Two consecutive S-formed slopes from (0,0) over (1,1) to (2,2).
    fn double_s_curve() -> BezierVertexBuilder {
        BezierVertexBuilder::uniform(vec![
            BezierVertex::new(dvector![0.0, 0.0], None, Some(dvector![1.0, 0.0])),
            BezierVertex::new(dvector![1.0, 1.0], None, Some(dvector![2.0, 1.0])),
            BezierVertex::new(dvector![2.0, 2.0], Some(dvector![1.0, 2.0]), None),
        ])
    }

    #[test]
    fn evaluates_straight_diagonal() {
        let spline = diagonal().to_canonical();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_at(&spline, t, t, t);
        }
    }

    #[test]
    fn evaluates_consecutive_segments() {
        let spline = double_s_curve().to_canonical();
        assert_at(&spline, 0.0, 0.0, 0.0);
        assert_at(&spline, 0.5, 0.5, 0.5);
        assert_at(&spline, 1.0, 1.0, 1.0);
        assert_at(&spline, 1.5, 1.5, 1.5);
        assert_at(&spline, 2.0, 2.0, 2.0);
    }

    #[test]
    fn single_vertex_keeps_its_knot_as_domain() {
        let builder =
            BezierVertexBuilder::uniform(vec![BezierVertex::new(dvector![1.0, 2.0], None, None)]);
        assert_at(&builder.to_canonical(), 0.0, 1.0, 2.0);

        let builder = BezierVertexBuilder::non_uniform(
            vec![0.0],
            vec![BezierVertex::new(dvector![1.0, 2.0], None, None)],
        );
        assert_at(&builder.to_canonical(), 0.0, 1.0, 2.0);
    }

    #[test]
    fn empty_builder_has_empty_domain() {
        let spline = BezierVertexBuilder::uniform(vec![]).to_canonical();
        assert!(spline.at(0.0).is_err());
        let spline = BezierVertexBuilder::non_uniform(vec![], vec![]).to_canonical();
        assert!(spline.at(0.0).is_err());
    }

    #[test]
    fn de_casteljau_matches_canonical() {
        let builder = s_curve();
        let canonical = builder.to_canonical();
        let de_casteljau = builder.to_de_casteljau();
        for i in 0..=10 {
            let t = f64::from(i) * 0.1;
            let p = canonical.at(t).unwrap();
            let q = de_casteljau.at(t).unwrap();
            let d = (&p - &q).norm();
            assert!(d < TOL, "representations differ at {t}, d={d}");
        }
    }

    #[test]
    fn add_vertex_shifts_later_vertices() {
        let mut builder = diagonal();
        let vertex = BezierVertex::new(dvector![2.0, 2.0], Some(dvector![1.5, 1.5]), None);
        assert!(builder.add_vertex(3, vertex.clone().into()).is_err());
        assert_eq!(builder.knots().knot_count(), 2);

        builder.add_vertex(2, vertex.into()).unwrap();
        assert_eq!(builder.knots().knot_count(), 3);

        let vertex = BezierVertex::new(dvector![-1.0, -1.0], Some(dvector![-2.0, -2.0]), None);
        builder.add_vertex(0, vertex.into()).unwrap();
        assert_eq!(builder.knots().knot_count(), 4);
        assert_eq!(builder.vertex(1), diagonal().vertex(0));
        assert_eq!(builder.vertex(2), diagonal().vertex(1));
    }

    #[test]
    fn update_vertex_replaces_and_checks_bounds() {
        let mut builder = diagonal();
        let vertex = BezierVertex::new(dvector![1.0, 0.0], None, None);
        assert!(builder.update_vertex(2, vertex.clone().into()).is_err());

        builder.update_vertex(1, vertex.into()).unwrap();
        assert_eq!(*builder.bezier_vertex(1).unwrap().loc(), dvector![1.0, 0.0]);
    }

    #[test]
    fn delete_vertex_shrinks_spline() {
        let mut builder = diagonal();
        assert!(builder.delete_vertex(2).is_err());

        builder.delete_vertex(1).unwrap();
        assert_eq!(builder.knots().knot_count(), 1);
        assert_eq!(builder.vertex(0), diagonal().vertex(0));

        builder.delete_vertex(0).unwrap();
        assert_eq!(builder.knots().knot_count(), 0);
    }
}
