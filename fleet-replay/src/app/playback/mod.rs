mod vehicle_playback;

pub use vehicle_playback::VehiclePlayback;
