use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// simulation vehicle identifier. vehicles are numbered from 1
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
pub struct VehicleId(pub u64);
