use super::{NetworkError, NodeId};
use crate::util::fs::read_utils;
use kdam::Bar;
use nalgebra::Point2;
use std::collections::HashMap;
use std::path::Path;

/// row of a node file: `edge_id origin destination origin_lng origin_lat dest_lng dest_lat`
type NodeRecord = (i64, NodeId, NodeId, f64, f64, f64, f64);

/// planar (lng, lat) coordinates of road network nodes, used to place
/// vehicles and customers in rendering space.
#[derive(Debug, Clone, Default)]
pub struct NodePositionTable {
    positions: HashMap<NodeId, Point2<f64>>,
}

impl NodePositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// loads a node file. every row describes one edge and carries the
    /// coordinates of both of its endpoints.
    pub fn from_file(path: &Path) -> Result<Self, NetworkError> {
        let rows: Box<[NodeRecord]> = read_utils::from_delimited(
            path,
            b' ',
            false,
            Some(Bar::builder().desc("node positions")),
        )
        .map_err(|e| NetworkError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut table = Self::new();
        for (_, origin, destination, ox, oy, dx, dy) in rows.iter() {
            table.insert(*origin, Point2::new(*ox, *oy));
            table.insert(*destination, Point2::new(*dx, *dy));
        }
        log::debug!("loaded {} node positions from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn insert(&mut self, node: NodeId, position: Point2<f64>) {
        self.positions.insert(node, position);
    }

    pub fn position(&self, node: NodeId) -> Option<Point2<f64>> {
        self.positions.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
