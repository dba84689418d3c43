//! `fleet_replay_core` turns the append-only dataout log written by a running
//! ridesharing simulation into a stream of renderable state changes.
//!
//! # Module layout
//! - [`model::network`]: ids, edge weights and node positions of the road network
//! - [`model::instance`]: problem instance rosters and the customer appearance schedule
//! - [`algorithm::tail`]: follows the dataout log as it grows
//! - [`algorithm::decode`]: one log line to one [`algorithm::decode::Event`]
//! - [`algorithm::reconstruct`]: folds events into per-vehicle state and notifications
//! - [`algorithm::interpolation`]: keyframe smoothing for continuously animated entities
//! - [`config`]: configuration errors and file path helpers
pub mod algorithm;
pub mod config;
pub mod model;
pub mod util;
