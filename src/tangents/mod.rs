//! Strategies deriving Hermite tangents from vertex locations.

mod cardinal;
mod natural;

pub use cardinal::{CardinalTangents, CardinalVertexBuilder};
pub use natural::{NaturalTangents, NaturalVertexBuilder};

use crate::knots::Knots;
use crate::spline::HermiteVertex;

/// Strategy computing the tangents of Hermite vertices from their locations
/// and the knots.
pub trait TangentFinder {
    /// Overwrites the entry and exit tangents of every vertex. Fewer than
    /// two vertices are left untouched.
    fn find(&self, knots: &Knots, vertices: &mut [HermiteVertex]);
}
