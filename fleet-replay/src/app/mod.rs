pub mod broadcast;
pub mod config;
pub mod playback;
pub mod session;
