pub mod error;
pub mod knots;
pub mod math;
pub mod spline;
pub mod tangents;
pub mod tessellation;

pub use error::{CurvisError, Result};
