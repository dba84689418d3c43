use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// discrete simulation time step. every dataout line leads with the tick it
/// was written at, and ticks never decrease across a run.
#[derive(
    Copy,
    Clone,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Default,
    Display,
    From,
    FromStr,
    Serialize,
    Deserialize,
)]
pub struct Tick(pub u64);
