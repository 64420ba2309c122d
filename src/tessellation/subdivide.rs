use crate::error::{Result, SubdivisionError};
use crate::math::{projected_vec_dist, Point};
use crate::spline::SplineBuilder;
use crate::tessellation::{LineCollector, SubdivisionParams};

/// Approximates one Bezier segment with lines by recursively splitting at
/// the parameter midpoint until every piece is flat.
///
/// # Errors
///
/// Returns [`SubdivisionError::MaxDepthExceeded`] if a piece still exceeds
/// `params.max_dist` after `params.max_depth` splits.
#[allow(clippy::too_many_arguments)]
pub fn subdivide_segment(
    segment_no: usize,
    t_start: f64,
    t_end: f64,
    v0: &Point,
    v1: &Point,
    v2: &Point,
    v3: &Point,
    params: &SubdivisionParams,
    collector: &mut dyn LineCollector,
) -> Result<()> {
    subdivide_rec(
        segment_no,
        t_start,
        t_end,
        v0,
        v1,
        v2,
        v3,
        params,
        params.max_depth,
        collector,
    )
}

/// Approximates every segment of `builder`, in order.
///
/// # Errors
///
/// Returns [`SubdivisionError::MaxDepthExceeded`] if a segment does not
/// flatten within the depth limit.
pub fn subdivide_all(
    builder: &dyn SplineBuilder,
    params: &SubdivisionParams,
    collector: &mut dyn LineCollector,
) -> Result<()> {
    let last_segment_no = builder.knots().segment_count().saturating_sub(1);
    builder.subdivide(0, last_segment_no, params, collector)
}

/// A piece is flat when both inner controls project close enough to the
/// chord.
fn is_flat(v0: &Point, v1: &Point, v2: &Point, v3: &Point, max_dist: f64) -> bool {
    let v03 = v3 - v0;
    projected_vec_dist(&(v1 - v0), &v03) <= max_dist
        && projected_vec_dist(&(v2 - v0), &v03) <= max_dist
}

#[allow(clippy::too_many_arguments)]
fn subdivide_rec(
    segment_no: usize,
    t_start: f64,
    t_end: f64,
    v0: &Point,
    v1: &Point,
    v2: &Point,
    v3: &Point,
    params: &SubdivisionParams,
    depth_left: usize,
    collector: &mut dyn LineCollector,
) -> Result<()> {
    if is_flat(v0, v1, v2, v3, params.max_dist) {
        collector.collect_line(segment_no, t_start, t_end, v0, v3);
        return Ok(());
    }
    if depth_left == 0 {
        return Err(SubdivisionError::MaxDepthExceeded {
            segment_no,
            max_dist: params.max_dist,
            max_depth: params.max_depth,
        }
        .into());
    }

    let t_mid = 0.5 * (t_start + t_end);
    let v01 = (v0 + v1) * 0.5;
    let v11 = (v1 + v2) * 0.5;
    let v21 = (v2 + v3) * 0.5;
    let v02 = (&v01 + &v11) * 0.5;
    let v12 = (&v11 + &v21) * 0.5;
    let v03 = (&v02 + &v12) * 0.5;

    subdivide_rec(
        segment_no,
        t_start,
        t_mid,
        v0,
        &v01,
        &v02,
        &v03,
        params,
        depth_left - 1,
        collector,
    )?;
    subdivide_rec(
        segment_no,
        t_mid,
        t_end,
        &v03,
        &v12,
        &v21,
        v3,
        params,
        depth_left - 1,
        collector,
    )
}
