/// Point in curve space, one coordinate per dimension.
pub type Point = nalgebra::DVector<f64>;

/// Vector in curve space, one coordinate per dimension.
pub type Vector = nalgebra::DVector<f64>;

/// Global tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the perpendicular distance from the tip of `v` to the line
/// spanned by `w`, both anchored at the same origin.
///
/// This is the parallelogram area |v × w| divided by |w|.
///
/// # Panics
///
/// Panics if the dimension is anything other than 2 or 3.
#[must_use]
pub fn projected_vec_dist(v: &Vector, w: &Vector) -> f64 {
    match v.len() {
        2 => (v[0] * w[1] - v[1] * w[0]).abs() / w.norm(),
        3 => {
            let cx = v[1] * w[2] - v[2] * w[1];
            let cy = v[2] * w[0] - v[0] * w[2];
            let cz = v[0] * w[1] - v[1] * w[0];
            (cx * cx + cy * cy + cz * cz).sqrt() / w.norm()
        }
        dim => panic!("projected distance not implemented for dimension {dim}"),
    }
}
