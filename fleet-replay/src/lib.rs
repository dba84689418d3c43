//! `fleet_replay` wires the [`fleet_replay_core`] pipeline into a running
//! replay: configuration, the session that owns one run of the pipeline, the
//! broadcasters that fan notifications out to viewers and the smoothed
//! per-vehicle playback.
pub mod app;
