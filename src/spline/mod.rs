//! Cubic spline representations and the builders producing them.

mod basis;
mod bezier;
mod canonical;
mod hermite;
mod vertex;

pub use bezier::{BezierVertexBuilder, DeCasteljauSpline};
pub use canonical::{CanonicalSpline, CubicPoly, CubicPolys};
pub use hermite::HermiteVertexBuilder;
pub use vertex::{BezierVertex, Dependence, HermiteVertex, Vertex};

use crate::error::Result;
use crate::knots::Knots;
use crate::math::Point;
use crate::tessellation::{LineCollector, SubdivisionParams};

/// Parametric curve over the domain spanned by its knots.
pub trait Spline {
    fn knots(&self) -> &Knots;

    /// Evaluates the curve point at `t`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DomainError`] if `t` lies outside the domain.
    fn at(&self, t: f64) -> Result<Point>;
}

/// Spline under construction, convertible to evaluable representations.
pub trait SplineBuilder {
    fn knots(&self) -> &Knots;

    /// Dimension of the vertex locations, 0 for an empty builder.
    fn dim(&self) -> usize;

    /// Builds the spline in canonical polynomial form.
    fn to_canonical(&self) -> CanonicalSpline;

    /// Approximates segments `from_segment_no..=to_segment_no` with lines,
    /// feeding each accepted line to `collector`. Segment numbers beyond the
    /// last segment are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SubdivisionError::MaxDepthExceeded`] if a
    /// segment does not flatten within the depth limit.
    fn subdivide(
        &self,
        from_segment_no: usize,
        to_segment_no: usize,
        params: &SubdivisionParams,
        collector: &mut dyn LineCollector,
    ) -> Result<()>;
}

/// Builder whose control vertices can be inspected and edited one by one,
/// each vertex sitting at the knot of the same number.
pub trait SplineVertexBuilder: SplineBuilder {
    /// Returns a copy of the vertex at `knot_no`, `None` if it does not
    /// exist.
    fn vertex(&self, knot_no: usize) -> Option<Vertex>;

    /// Inserts a vertex at `knot_no`, shifting later vertices up.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::KnotError::InvalidInsertion`] if `knot_no` is
    /// beyond the insertable range.
    fn add_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()>;

    /// Replaces the vertex at `knot_no`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::KnotError::KnotNotFound`] if `knot_no` does
    /// not exist.
    fn update_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()>;

    /// Removes the vertex at `knot_no` together with its knot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::KnotError::KnotNotFound`] if `knot_no` does
    /// not exist.
    fn delete_vertex(&mut self, knot_no: usize) -> Result<()>;
}

/// Collects a copy of every vertex of the builder in knot order.
#[must_use]
pub fn vertices(builder: &dyn SplineVertexBuilder) -> Vec<Vertex> {
    (0..builder.knots().knot_count())
        .filter_map(|knot_no| builder.vertex(knot_no))
        .collect()
}
