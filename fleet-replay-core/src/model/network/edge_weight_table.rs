use super::{NetworkError, NodeId};
use crate::util::fs::read_utils;
use kdam::Bar;
use std::collections::HashMap;
use std::path::Path;
use uom::si::f64::Length;
use uom::si::length::meter;

/// travel cost between adjacent road network nodes.
///
/// each edge is stored once, in the orientation it was provided. lookups
/// try both orientations, so `weight(u, v) == weight(v, u)` regardless of
/// how the table was built. weights are recorded in meters.
#[derive(Debug, Clone, Default)]
pub struct EdgeWeightTable {
    weights: HashMap<(NodeId, NodeId), f64>,
}

impl EdgeWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// loads an edge list file. the first line is a header; each following
    /// line holds `origin destination weight`, separated by single spaces.
    pub fn from_file(path: &Path) -> Result<Self, NetworkError> {
        let rows: Box<[(NodeId, NodeId, f64)]> = read_utils::from_delimited(
            path,
            b' ',
            true,
            Some(Bar::builder().desc("edge weights")),
        )
        .map_err(|e| NetworkError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut table = Self::new();
        for (u, v, w) in rows.iter() {
            table.insert(*u, *v, *w)?;
        }
        log::debug!("loaded {} edge weights from {:?}", table.len(), path);
        Ok(table)
    }

    /// records the weight of edge `u_v`, replacing any previous weight
    /// stored under that exact orientation.
    pub fn insert(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<(), NetworkError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetworkError::InvalidWeight(u, v, weight));
        }
        self.weights.insert((u, v), weight);
        Ok(())
    }

    /// weight of the edge between `u` and `v` in either orientation. a pair
    /// with no recorded edge has weight 0 and is treated as a zero-length
    /// (same node) edge.
    pub fn weight(&self, u: NodeId, v: NodeId) -> f64 {
        self.weights
            .get(&(u, v))
            .or_else(|| self.weights.get(&(v, u)))
            .copied()
            .unwrap_or(0.0)
    }

    /// [`EdgeWeightTable::weight`] as a length.
    pub fn length(&self, u: NodeId, v: NodeId) -> Length {
        Length::new::<meter>(self.weight(u, v))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl FromIterator<(NodeId, NodeId, f64)> for EdgeWeightTable {
    /// builds a table from trusted triples. invalid weights are skipped.
    fn from_iter<T: IntoIterator<Item = (NodeId, NodeId, f64)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (u, v, w) in iter {
            if let Err(e) = table.insert(u, v, w) {
                log::warn!("{e}");
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_weight_is_symmetric() {
        let forward: EdgeWeightTable = [(NodeId(11), NodeId(12), 8.0)].into_iter().collect();
        let backward: EdgeWeightTable = [(NodeId(12), NodeId(11), 8.0)].into_iter().collect();
        for table in [&forward, &backward] {
            assert_eq!(table.weight(NodeId(11), NodeId(12)), 8.0);
            assert_eq!(table.weight(NodeId(12), NodeId(11)), 8.0);
        }
    }

    #[test]
    fn test_unknown_pair_is_zero() {
        let table: EdgeWeightTable = [(NodeId(1), NodeId(2), 3.0)].into_iter().collect();
        assert_eq!(table.weight(NodeId(1), NodeId(3)), 0.0);
        assert_eq!(table.weight(NodeId(7), NodeId(7)), 0.0);
        assert_eq!(table.length(NodeId(2), NodeId(1)).get::<meter>(), 3.0);
    }

    #[test]
    fn test_insert_rejects_negative_weight() {
        let mut table = EdgeWeightTable::new();
        let result = table.insert(NodeId(1), NodeId(2), -1.0);
        assert!(matches!(result, Err(NetworkError::InvalidWeight(..))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ORIG DEST WEIGHT").unwrap();
        writeln!(file, "10 11 5").unwrap();
        writeln!(file, "12 11 8").unwrap();
        let table = EdgeWeightTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.weight(NodeId(11), NodeId(12)), 8.0);
        assert_eq!(table.weight(NodeId(11), NodeId(10)), 5.0);
    }
}
