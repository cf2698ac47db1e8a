pub mod curve;
pub mod transform;

pub use curve::{Curve, CurveDomain, PolynomialCurve};
pub use transform::Transform;
