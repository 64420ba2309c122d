use crate::error::Result;
use crate::knots::Knots;
use crate::math::Vector;
use crate::spline::{
    CanonicalSpline, HermiteVertex, HermiteVertexBuilder, SplineBuilder, SplineVertexBuilder,
    Vertex,
};
use crate::tangents::TangentFinder;
use crate::tessellation::{LineCollector, SubdivisionParams};

/// Natural tangents make the spline twice continuously differentiable at
/// every interior vertex, solved from a tridiagonal system per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalTangents;

impl TangentFinder for NaturalTangents {
    fn find(&self, knots: &Knots, vertices: &mut [HermiteVertex]) {
        let n = vertices.len();
        if n < 2 {
            return;
        }
        let dim = vertices[0].loc().len();

        let lens: Option<Vec<f64>> = if knots.is_uniform() {
            None
        } else {
            Some(
                (0..n - 1)
                    .map(|segment_no| knots.segment_len(segment_no).unwrap_or(0.0))
                    .collect(),
            )
        };

        // solve per dimension
        let mut solved = Vec::with_capacity(dim);
        for d in 0..dim {
            let p: Vec<f64> = vertices.iter().map(|vertex| vertex.loc()[d]).collect();
            solved.push(match &lens {
                None => solve_uniform(&p),
                Some(lens) => solve_non_uniform(&p, lens),
            });
        }

        for (i, vertex) in vertices.iter_mut().enumerate() {
            let tangent = Vector::from_iterator(dim, solved.iter().map(|m| m[i]));
            vertex.set_tangents(tangent.clone(), tangent);
        }
    }
}

// Tridiagonal system for uniform knots, unknowns m[0..n-1]:
//   2 1           = 3*(p1 - p0)
//   1 4 1         = 3*(p2 - p0)
//     1 4 1       = 3*(p3 - p1)
//         ...     = ...
//         1 2     = 3*(p[n-1] - p[n-2])
// Forward elimination drops the subdiagonal, keeping the running diagonal
// in r, then back-substitution yields the tangents.
fn solve_uniform(p: &[f64]) -> Vec<f64> {
    let n = p.len();
    let mut r = vec![0.0; n];
    let mut m = vec![0.0; n];

    r[0] = 2.0;
    m[0] = 3.0 * (p[1] - p[0]);
    for i in 1..n - 1 {
        let scale = 1.0 / r[i - 1];
        r[i] = 4.0 - scale;
        m[i] = 3.0 * (p[i + 1] - p[i - 1]) - scale * m[i - 1];
    }
    let scale = 1.0 / r[n - 2];
    r[n - 1] = 2.0 - scale;
    m[n - 1] = 3.0 * (p[n - 1] - p[n - 2]) - scale * m[n - 2];

    m[n - 1] /= r[n - 1];
    for i in (0..n - 1).rev() {
        m[i] = (m[i] - m[i + 1]) / r[i];
    }
    m
}

// Segment-length weighted variant, lens[i] the length of segment i:
//   2     1                     = 3*(p1 - p0) / lens[0]
//   l1    2*(l1+l0)  l0         = 3*(p2/s + (s - 1/s)*p1 - s*p0), s = l1/l0
//         l2         ...
//                    1       2  = 3*(p[n-1] - p[n-2]) / lens[n-2]
fn solve_non_uniform(p: &[f64], lens: &[f64]) -> Vec<f64> {
    let n = p.len();
    let mut r = vec![0.0; n];
    let mut m = vec![0.0; n];

    r[0] = 2.0;
    m[0] = 3.0 * (p[1] - p[0]) / lens[0];
    for i in 1..n - 1 {
        let scale = lens[i] / r[i - 1];
        let s = lens[i] / lens[i - 1];
        r[i] = 2.0 * (lens[i] + lens[i - 1]);
        r[i] -= if i == 1 { scale } else { scale * lens[i - 2] };
        m[i] = 3.0 * (p[i + 1] / s + (s - 1.0 / s) * p[i] - s * p[i - 1]) - scale * m[i - 1];
    }
    let scale = 1.0 / r[n - 2];
    r[n - 1] = 2.0 - scale;
    m[n - 1] = 3.0 * (p[n - 1] - p[n - 2]) / lens[n - 2] - scale * m[n - 2];

    m[n - 1] /= r[n - 1];
    for i in (1..n - 1).rev() {
        m[i] = (m[i] - m[i + 1] * lens[i - 1]) / r[i];
    }
    m[0] = (m[0] - m[1]) / r[0];
    m
}

/// Hermite builder over location-only vertices whose tangents stay natural,
/// recomputed after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalVertexBuilder {
    inner: HermiteVertexBuilder,
}

impl NaturalVertexBuilder {
    #[must_use]
    pub fn uniform(vertices: Vec<HermiteVertex>) -> Self {
        let mut builder = Self {
            inner: HermiteVertexBuilder::uniform(vertices),
        };
        builder.refresh_tangents();
        builder
    }

    /// # Panics
    ///
    /// Panics if `ts` and `vertices` differ in length or `ts` is not
    /// monotonically increasing.
    #[must_use]
    pub fn non_uniform(ts: Vec<f64>, vertices: Vec<HermiteVertex>) -> Self {
        let mut builder = Self {
            inner: HermiteVertexBuilder::non_uniform(ts, vertices),
        };
        builder.refresh_tangents();
        builder
    }

    #[must_use]
    pub fn hermite_vertex(&self, knot_no: usize) -> Option<&HermiteVertex> {
        self.inner.hermite_vertex(knot_no)
    }

    fn refresh_tangents(&mut self) {
        self.inner.find_tangents(&NaturalTangents);
    }
}

impl SplineBuilder for NaturalVertexBuilder {
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

impl SplineVertexBuilder for NaturalVertexBuilder {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::spline::Spline;
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

    fn vase_locations() -> Vec<HermiteVertex> {
        vec![
            HermiteVertex::raw(dvector![-1.0, 1.0]),
            HermiteVertex::raw(dvector![0.0, 0.0]),
            HermiteVertex::raw(dvector![1.0, 1.0]),
        ]
    }

    #[test]
    fn diagonal_is_parameterized_linearly() {
        let builder = NaturalVertexBuilder::uniform(vec![
            HermiteVertex::raw(dvector![0.0, 0.0]),
            HermiteVertex::raw(dvector![1.0, 1.0]),
        ]);
        let spline = builder.to_canonical();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_at(&spline, t, t, t);
        }
    }

    #[test]
    fn vase_tangents_solve_the_tridiagonal_system() {
        let builder = NaturalVertexBuilder::uniform(vase_locations());
        let expected = [
            dvector![1.0, -1.5],
            dvector![1.0, 0.0],
            dvector![1.0, 1.5],
        ];
        for (knot_no, tangent) in expected.iter().enumerate() {
            let vertex = builder.hermite_vertex(knot_no).unwrap();
            assert!((vertex.entry() - tangent).norm() < TOL, "entry {knot_no}");
            assert!((vertex.exit() - tangent).norm() < TOL, "exit {knot_no}");
        }
    }

    #[test]
    fn vase_interpolates_and_stays_bounded() {
        let spline = NaturalVertexBuilder::uniform(vase_locations()).to_canonical();
        assert_at(&spline, 0.0, -1.0, 1.0);
        assert_at(&spline, 1.0, 0.0, 0.0);
        assert_at(&spline, 2.0, 1.0, 1.0);

        for i in 0..=20 {
            let t = f64::from(i) * 0.1;
            let p = spline.at(t).unwrap();
            assert!(
                (-1.0 - TOL..=1.0 + TOL).contains(&p[0]),
                "point[0] at {t} must be in -1..1"
            );
            assert!(
                (-TOL..=1.0 + TOL).contains(&p[1]),
                "point[1] at {t} must be in 0..1"
            );
        }
    }

    #[test]
    fn equally_spaced_non_uniform_matches_uniform() {
        let uniform = NaturalVertexBuilder::uniform(vase_locations()).to_canonical();
        let non_uniform =
            NaturalVertexBuilder::non_uniform(vec![0.0, 1.0, 2.0], vase_locations()).to_canonical();
        for i in 0..=20 {
            let t = f64::from(i) * 0.1;
            let d = (&uniform.at(t).unwrap() - &non_uniform.at(t).unwrap()).norm();
            assert!(d < TOL, "splines differ at {t}, d={d}");
        }
    }

    #[test]
    fn non_uniform_spacing_changes_parameterization() {
        let builder = NaturalVertexBuilder::non_uniform(vec![0.0, 2.0], vec![
            HermiteVertex::raw(dvector![0.0, 0.0]),
            HermiteVertex::raw(dvector![1.0, 1.0]),
        ]);
        let spline = builder.to_canonical();
        for t in [0.0, 0.5, 1.0, 1.5, 2.0] {
            assert_at(&spline, t, t / 2.0, t / 2.0);
        }
    }

    #[test]
    fn fewer_than_two_vertices_keep_raw_tangents() {
        let builder = NaturalVertexBuilder::uniform(vec![HermiteVertex::raw(dvector![1.0, 2.0])]);
        let vertex = builder.hermite_vertex(0).unwrap();
        assert_eq!(*vertex.entry(), dvector![0.0, 0.0]);
        assert_eq!(*vertex.exit(), dvector![0.0, 0.0]);
    }

    #[test]
    fn mutations_recompute_tangents() {
        let mut builder = NaturalVertexBuilder::uniform(vec![
            HermiteVertex::raw(dvector![0.0, 0.0]),
            HermiteVertex::raw(dvector![1.0, 1.0]),
        ]);
        assert_eq!(*builder.hermite_vertex(0).unwrap().exit(), dvector![1.0, 1.0]);

        builder
            .add_vertex(2, HermiteVertex::raw(dvector![2.0, 0.0]).into())
            .unwrap();
        let vase = NaturalVertexBuilder::uniform(vec![
            HermiteVertex::raw(dvector![0.0, 0.0]),
            HermiteVertex::raw(dvector![1.0, 1.0]),
            HermiteVertex::raw(dvector![2.0, 0.0]),
        ]);
        assert_eq!(builder, vase);
    }
}
