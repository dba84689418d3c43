use serde::Serialize;

/// playback progress of an [`super::InterpolationBuffer`]. a buffer only ever
/// moves forward through these states; [`super::InterpolationBuffer::reset`]
/// returns it to `Initializing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    /// no keyframe has been taken as the origin yet
    Initializing,
    /// origin taken, waiting for the buffer delay to elapse
    Buffering,
    /// interpolating between origin and target keyframes
    Playing,
}
