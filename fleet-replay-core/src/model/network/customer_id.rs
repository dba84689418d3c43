use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// simulation customer identifier. customers are numbered after the last vehicle
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
pub struct CustomerId(pub u64);
