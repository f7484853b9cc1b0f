use thiserror::Error;

use crate::types::{JointId, LegId};

/// Top-level error type for ambler-core.
#[derive(Debug, Error)]
pub enum AmblerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("action error: {0}")]
    Action(#[from] ActionError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Sensor snapshot validation errors.
///
/// Copy + static shapes for cheap propagation in the per-tick hot path.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SensorError {
    #[error("non-finite joint reading at {leg:?}/{joint:?}")]
    NonFiniteJointState { leg: LegId, joint: JointId },

    #[error("orientation quaternion contains non-finite components")]
    NonFiniteOrientation,

    #[error("orientation quaternion norm {norm} is too close to zero")]
    DegenerateOrientation { norm: f32 },

    #[error("velocity goal contains non-finite components")]
    NonFiniteGoal,
}

/// Policy action validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action contains NaN")]
    ContainsNan,

    #[error("action contains Inf")]
    ContainsInf,

    #[error("action too short: expected at least {expected} values, got {got}")]
    TooShort { expected: usize, got: usize },
}
