use nalgebra::DMatrix;

/// Maps Bezier sample rows `[loc_s, exit_s, entry_e, loc_e]` to canonical
/// coefficient rows `[a, b, c, d]`.
pub(crate) fn bezier_to_canonical() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, -3.0, 3.0, -1.0, //
            0.0, 3.0, -6.0, 3.0, //
            0.0, 0.0, 3.0, -3.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
}

/// Maps canonical coefficient rows `[a, b, c, d]` to Bezier sample rows
/// `[loc_s, exit_s, entry_e, loc_e]`. Inverse of [`bezier_to_canonical`],
/// valid for unit-length segments only.
pub(crate) fn canonical_to_bezier() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 1.0, 1.0, 1.0, //
            0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, //
            0.0, 0.0, 1.0 / 3.0, 1.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
}

/// Maps Hermite sample rows `[loc_s, loc_e, exit_s, entry_e]` to canonical
/// coefficient rows `[a, b, c, d]`, valid for unit-length segments.
pub(crate) fn hermite_to_canonical() -> DMatrix<f64> {
    hermite_to_canonical_scaled(1.0)
}

/// Hermite basis for a segment of length `len`. The tangents are derivatives
/// with respect to the global parameter, so they enter scaled by the segment
/// length.
pub(crate) fn hermite_to_canonical_scaled(len: f64) -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 0.0, -3.0, 2.0, //
            0.0, 0.0, 3.0, -2.0, //
            0.0, len, -2.0 * len, len, //
            0.0, 0.0, -len, len,
        ],
    )
}

/// Maps Hermite sample rows `[loc_s, loc_e, exit_s, entry_e]` to Bezier
/// sample rows `[loc_s, exit_s, entry_e, loc_e]`, valid for unit-length
/// segments.
pub(crate) fn hermite_to_bezier() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 1.0, //
            0.0, 1.0 / 3.0, 0.0, 0.0, //
            0.0, 0.0, -1.0 / 3.0, 0.0,
        ],
    )
}
