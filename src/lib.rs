pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod motion;
pub mod operations;
pub mod pool;
pub mod registry;
pub mod session;
pub mod tessellation;

pub use config::SessionConfig;
pub use error::{Result, TrackwayError};
pub use session::{Frame, PathSession};
