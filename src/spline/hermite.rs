use nalgebra::DMatrix;

use crate::error::{KnotError, Result};
use crate::knots::Knots;
use crate::spline::basis;
use crate::spline::bezier::BezierVertexBuilder;
use crate::spline::canonical::{CanonicalSpline, CubicPoly, CubicPolys};
use crate::spline::vertex::{BezierVertex, HermiteVertex, Vertex};
use crate::spline::{SplineBuilder, SplineVertexBuilder};
use crate::tangents::TangentFinder;
use crate::tessellation::{LineCollector, SubdivisionParams};

fn expect_hermite(vertex: Vertex) -> HermiteVertex {
    match vertex {
        Vertex::Hermite(vertex) => vertex,
        Vertex::Bezier(_) => panic!("hermite builder requires hermite vertices"),
    }
}

fn bezier_with_knots(ts: Option<Vec<f64>>, vertices: Vec<BezierVertex>) -> BezierVertexBuilder {
    match ts {
        None => BezierVertexBuilder::uniform(vertices),
        Some(ts) => BezierVertexBuilder::non_uniform(ts, vertices),
    }
}

/// Builder for cubic Hermite splines from vertices holding entry and exit
/// tangents.
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteVertexBuilder {
    knots: Knots,
    vertices: Vec<HermiteVertex>,
}

impl HermiteVertexBuilder {
    #[must_use]
    pub fn uniform(vertices: Vec<HermiteVertex>) -> Self {
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
    pub fn non_uniform(ts: Vec<f64>, vertices: Vec<HermiteVertex>) -> Self {
        assert!(
            ts.len() == vertices.len(),
            "knots and vertices must have the same length"
        );
        Self {
            knots: Knots::non_uniform(ts),
            vertices,
        }
    }

    #[must_use]
    pub fn hermite_vertex(&self, knot_no: usize) -> Option<&HermiteVertex> {
        self.vertices.get(knot_no)
    }

    /// Overwrites the vertex tangents with the ones the finder derives from
    /// the current locations and knots.
    pub fn find_tangents(&mut self, finder: &dyn TangentFinder) {
        finder.find(&self.knots, &mut self.vertices);
    }

    /// Sample rows `[start loc, end loc, start exit tangent, end entry
    /// tangent]`, one row per dimension per segment.
    fn sample_matrix(&self) -> DMatrix<f64> {
        let segment_count = self.knots.segment_count();
        let dim = self.dim();

        let mut samples = Vec::with_capacity(segment_count * dim * 4);
        for segment_no in 0..segment_count {
            let v_start = &self.vertices[segment_no];
            let v_end = &self.vertices[segment_no + 1];
            for d in 0..dim {
                samples.extend_from_slice(&[
                    v_start.loc()[d],
                    v_end.loc()[d],
                    v_start.exit()[d],
                    v_end.entry()[d],
                ]);
            }
        }
        DMatrix::from_row_slice(segment_count * dim, 4, &samples)
    }

    fn uniform_canonical(&self) -> CanonicalSpline {
        // precondition: at least one segment, uniform knots
        let coefs = self.sample_matrix() * basis::hermite_to_canonical();
        CanonicalSpline::from_matrix(self.knots.external(), self.dim(), &coefs)
    }

    fn non_uniform_canonical(&self) -> CanonicalSpline {
        // precondition: at least one segment
        let segment_count = self.knots.segment_count();
        let dim = self.dim();
        let mut cubics = Vec::with_capacity(segment_count);

        for segment_no in 0..segment_count {
            let v_start = &self.vertices[segment_no];
            let v_end = &self.vertices[segment_no + 1];
            let mut samples = Vec::with_capacity(dim * 4);
            for d in 0..dim {
                samples.extend_from_slice(&[
                    v_start.loc()[d],
                    v_end.loc()[d],
                    v_start.exit()[d],
                    v_end.entry()[d],
                ]);
            }
            let samples = DMatrix::from_row_slice(dim, 4, &samples);
            let len = self.knots.segment_len(segment_no).unwrap_or(0.0);
            let coefs = samples * basis::hermite_to_canonical_scaled(len);

            let polys = (0..dim)
                .map(|d| {
                    CubicPoly::new(coefs[(d, 0)], coefs[(d, 1)], coefs[(d, 2)], coefs[(d, 3)])
                })
                .collect();
            cubics.push(CubicPolys::new(polys));
        }

        CanonicalSpline::new(self.knots.external(), cubics)
    }

    fn uniform_bezier(&self) -> BezierVertexBuilder {
        // precondition: at least one segment, uniform knots
        let coefs = self.sample_matrix() * basis::hermite_to_bezier();
        BezierVertexBuilder::from_matrix(self.knots.external(), self.dim(), &coefs)
    }

    /// Converts to a Bezier builder holding the same curve, the tangents
    /// turned into absolute control points.
    ///
    /// # Panics
    ///
    /// Panics for non-uniform knots with more than one vertex, where the
    /// conversion is not implemented yet.
    #[must_use]
    pub fn to_bezier(&self) -> BezierVertexBuilder {
        match self.vertices.len() {
            0 => bezier_with_knots(self.knots.external(), vec![]),
            1 => {
                let vertex = BezierVertex::new(self.vertices[0].loc().clone(), None, None);
                bezier_with_knots(self.knots.external(), vec![vertex])
            }
            _ => {
                if self.knots.is_uniform() {
                    self.uniform_bezier()
                } else {
                    unimplemented!("hermite to bezier conversion for non-uniform knots")
                }
            }
        }
    }
}

impl SplineBuilder for HermiteVertexBuilder {
    fn knots(&self) -> &Knots {
        &self.knots
    }

    fn dim(&self) -> usize {
        self.vertices.first().map_or(0, |vertex| vertex.loc().len())
    }

    fn to_canonical(&self) -> CanonicalSpline {
        match self.vertices.len() {
            0 => CanonicalSpline::new(self.knots.external(), vec![]),
            1 => CanonicalSpline::single_vertex(self.vertices[0].loc(), self.knots.t_start()),
            _ => {
                if self.knots.is_uniform() {
                    self.uniform_canonical()
                } else {
                    self.non_uniform_canonical()
                }
            }
        }
    }

    /// Approximates with lines, going through the Bezier form.
    ///
    /// # Panics
    ///
    /// Panics for non-uniform knots, where the Bezier conversion is not
    /// implemented yet.
    fn subdivide(
        &self,
        from_segment_no: usize,
        to_segment_no: usize,
        params: &SubdivisionParams,
        collector: &mut dyn LineCollector,
    ) -> Result<()> {
        self.to_bezier()
            .subdivide(from_segment_no, to_segment_no, params, collector)
    }
}

impl SplineVertexBuilder for HermiteVertexBuilder {
    fn vertex(&self, knot_no: usize) -> Option<Vertex> {
        self.vertices.get(knot_no).cloned().map(Vertex::from)
    }

    fn add_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        self.knots.add_knot(knot_no)?;
        self.vertices.insert(knot_no, expect_hermite(vertex));
        Ok(())
    }

    fn update_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        if !self.knots.knot_exists(knot_no) {
            return Err(KnotError::KnotNotFound(knot_no).into());
        }
        self.vertices[knot_no] = expect_hermite(vertex);
        Ok(())
    }

    fn delete_vertex(&mut self, knot_no: usize) -> Result<()> {
        self.knots.delete_knot(knot_no)?;
        self.vertices.remove(knot_no);
        Ok(())
    }
}
