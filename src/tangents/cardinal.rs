use crate::error::Result;
use crate::knots::Knots;
use crate::math::Vector;
use crate::spline::{
    CanonicalSpline, HermiteVertex, HermiteVertexBuilder, SplineBuilder, SplineVertexBuilder,
    Vertex,
};
use crate::tangents::TangentFinder;
use crate::tessellation::{LineCollector, SubdivisionParams};

/// Cardinal tangents scale the vector between the two neighbors of a
/// vertex, the endpoints using their single neighbor instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalTangents {
    tension: f64,
}

impl CardinalTangents {
    #[must_use]
    pub fn new(tension: f64) -> Self {
        Self { tension }
    }

    /// Catmull-Rom tangents, the zero-tension special case.
    #[must_use]
    pub fn catmull_rom() -> Self {
        Self::new(0.0)
    }

    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tension
    }
}

impl TangentFinder for CardinalTangents {
    #[allow(clippy::float_cmp)]
    fn find(&self, knots: &Knots, vertices: &mut [HermiteVertex]) {
        let n = vertices.len();
        if n < 2 {
            return;
        }

        // tension transformed to a scale factor of the neighbor distance
        let scale = (1.0 - self.tension) / 2.0;
        let tangent = |start: &HermiteVertex, end: &HermiteVertex| -> Vector {
            (end.loc() - start.loc()) * scale
        };

        let mut tangents = Vec::with_capacity(n);
        tangents.push(tangent(&vertices[0], &vertices[1]));
        for i in 1..n - 1 {
            tangents.push(tangent(&vertices[i - 1], &vertices[i + 1]));
        }
        tangents.push(tangent(&vertices[n - 2], &vertices[n - 1]));

        // entry and exit are equal for uniform knots
        let mut entries = tangents.clone();
        let mut exits = tangents;

        // non-uniform knots rescale the tangents at each segment boundary to
        // the segment length, keeping the direction
        if !knots.is_uniform() {
            for i in 0..n - 1 {
                if let Ok(len) = knots.segment_len(i) {
                    if len != 0.0 {
                        exits[i] /= len;
                        entries[i + 1] /= len;
                    }
                }
            }
        }

        for ((vertex, entry), exit) in vertices.iter_mut().zip(entries).zip(exits) {
            vertex.set_tangents(entry, exit);
        }
    }
}

/// Hermite builder over location-only vertices whose tangents follow the
/// cardinal rule, recomputed after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalVertexBuilder {
    inner: HermiteVertexBuilder,
    tangents: CardinalTangents,
}

impl CardinalVertexBuilder {
    #[must_use]
    pub fn uniform(tension: f64, vertices: Vec<HermiteVertex>) -> Self {
        let mut builder = Self {
            inner: HermiteVertexBuilder::uniform(vertices),
            tangents: CardinalTangents::new(tension),
        };
        builder.refresh_tangents();
        builder
    }

    /// # Panics
    ///
    /// Panics if `ts` and `vertices` differ in length or `ts` is not
    /// monotonically increasing.
    #[must_use]
    pub fn non_uniform(ts: Vec<f64>, tension: f64, vertices: Vec<HermiteVertex>) -> Self {
        let mut builder = Self {
            inner: HermiteVertexBuilder::non_uniform(ts, vertices),
            tangents: CardinalTangents::new(tension),
        };
        builder.refresh_tangents();
        builder
    }

    /// Catmull-Rom builder, cardinal with tension 0.
    #[must_use]
    pub fn catmull_rom(vertices: Vec<HermiteVertex>) -> Self {
        Self::uniform(0.0, vertices)
    }

    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tangents.tension()
    }

    pub fn set_tension(&mut self, tension: f64) {
        self.tangents = CardinalTangents::new(tension);
        self.refresh_tangents();
    }

    #[must_use]
    pub fn hermite_vertex(&self, knot_no: usize) -> Option<&HermiteVertex> {
        self.inner.hermite_vertex(knot_no)
    }

    fn refresh_tangents(&mut self) {
        self.inner.find_tangents(&self.tangents);
    }
}

impl SplineBuilder for CardinalVertexBuilder {
    fn knots(&self) -> &Knots {
        self.inner.knots()
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn to_canonical(&self) -> CanonicalSpline {
        self.inner.to_canonical()
    }

    fn subdivide(
        &self,
        from_segment_no: usize,
        to_segment_no: usize,
        params: &SubdivisionParams,
        collector: &mut dyn LineCollector,
    ) -> Result<()> {
        self.inner
            .subdivide(from_segment_no, to_segment_no, params, collector)
    }
}

impl SplineVertexBuilder for CardinalVertexBuilder {
    fn vertex(&self, knot_no: usize) -> Option<Vertex> {
        self.inner.vertex(knot_no)
    }

    fn add_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        self.inner.add_vertex(knot_no, vertex)?;
        self.refresh_tangents();
        Ok(())
    }

    fn update_vertex(&mut self, knot_no: usize, vertex: Vertex) -> Result<()> {
        self.inner.update_vertex(knot_no, vertex)?;
        self.refresh_tangents();
        Ok(())
    }

    fn delete_vertex(&mut self, knot_no: usize) -> Result<()> {
        self.inner.delete_vertex(knot_no)?;
        self.refresh_tangents();
        Ok(())
    }
}
