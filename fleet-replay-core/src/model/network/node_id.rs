use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// opaque road network node identifier, resolved to a coordinate by [`super::NodePositionTable`]
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
pub struct NodeId(pub i64);
