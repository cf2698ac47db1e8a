use thiserror::Error;

/// Top-level error type for the path engine.
#[derive(Debug, Error)]
pub enum TrackwayError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to curve evaluation and derived geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("curve needs at least {required} control points, found {found}")]
    InsufficientControlPoints { required: usize, found: usize },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base segment length is missing or not positive")]
    MissingSegmentLength,

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Convenience type alias for results using [`TrackwayError`].
pub type Result<T> = std::result::Result<T, TrackwayError>;
