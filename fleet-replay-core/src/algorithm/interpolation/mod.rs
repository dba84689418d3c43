mod buffer_state;
mod interpolation_buffer;
mod interpolation_mode;
mod interpolation_ops;
mod keyframe;

pub use buffer_state::BufferState;
pub use interpolation_buffer::InterpolationBuffer;
pub use interpolation_mode::InterpolationMode;
pub use keyframe::{Keyframe, KeyframeUpdate};
