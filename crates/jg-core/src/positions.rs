//! Live node positions.
//!
//! The graph records where the builder put each node; the store records
//! where the node is now. The renderer bridge and the drag sessions both go
//! through this store instead of mutating node records directly.

use crate::id::NodeId;
use crate::model::{JsonGraph, Position, PositionUpdate};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    positions: HashMap<NodeId, Position>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with the built position of every node.
    pub fn from_graph(graph: &JsonGraph) -> Self {
        Self {
            positions: graph.nodes.iter().map(|n| (n.id, n.position)).collect(),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    pub fn set(&mut self, id: NodeId, position: Position) {
        self.positions.insert(id, position);
    }

    /// Bulk write. Later updates for the same id win.
    pub fn apply(&mut self, updates: &[PositionUpdate]) {
        for update in updates {
            self.positions.insert(update.id, update.position);
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Position> {
        self.positions.remove(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Copy live positions into the node records of `graph`.
    /// Nodes without a live position keep their built position.
    pub fn snapshot_into(&self, graph: &mut JsonGraph) {
        for node in &mut graph.nodes {
            if let Some(p) = self.positions.get(&node.id) {
                node.position = *p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use serde_json::json;

    #[test]
    fn seeded_from_graph() {
        let g = build(&json!({"a": 1}));
        let store = PositionStore::from_graph(&g);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(g.nodes[1].id), Some(g.nodes[1].position));
    }

    #[test]
    fn apply_is_last_writer_wins() {
        let id = NodeId::from_seq(1);
        let mut store = PositionStore::new();
        store.apply(&[
            PositionUpdate {
                id,
                position: Position::new(1.0, 1.0),
            },
            PositionUpdate {
                id,
                position: Position::new(2.0, 3.0),
            },
        ]);
        assert_eq!(store.get(id), Some(Position::new(2.0, 3.0)));
    }

    #[test]
    fn snapshot_writes_back() {
        let mut g = build(&json!([1]));
        let mut store = PositionStore::from_graph(&g);
        let leaf = g.nodes[1].id;
        store.set(leaf, Position::new(9.0, 9.0));
        store.snapshot_into(&mut g);
        assert_eq!(g.nodes[1].position, Position::new(9.0, 9.0));
        assert_eq!(g.nodes[0].position, Position::new(0.0, 0.0));
    }
}
