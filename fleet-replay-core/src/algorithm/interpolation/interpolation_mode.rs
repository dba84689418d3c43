use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// how positions are blended between keyframes. orientation is always
/// slerped and scale always lerped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// straight-line blend of the two positions
    #[default]
    Lerp,
    /// cubic Hermite spline using each keyframe's velocity as its tangent
    Hermite,
}
