pub mod decode;
pub mod interpolation;
pub mod reconstruct;
pub mod tail;
