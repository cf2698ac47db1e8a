pub mod orient;
pub mod query;
pub mod scatter;

pub use orient::TrackedObjects;
pub use query::{ClosestParameter, ClosestPointResult};
pub use scatter::{PlacedProp, ScatterParams, ScatterProps};
