//! Parent → children relation index.
//!
//! Stored as a `petgraph` directed graph so subtree walks can use the stock
//! traversal visitors. Child order is link order: `children()` sorts by edge
//! index, not by whatever order the adjacency list happens to iterate in.

use crate::id::NodeId;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Bfs, EdgeRef};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Mapping from a node id to its ordered list of direct child ids.
///
/// A child is linked to at most one parent and links never form a cycle,
/// so the index is always a forest.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    graph: StableDiGraph<NodeId, ()>,
    id_index: HashMap<NodeId, NodeIndex>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.id_index.insert(id, idx);
        idx
    }

    /// Record `child` as the next child of `parent`.
    ///
    /// Returns `false` without changing anything if `child` already has a
    /// parent or the link would close a cycle.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || self.parent(child).is_some() || self.is_ancestor_of(child, parent) {
            log::warn!("refusing relation {parent}->{child}: would break the tree");
            return false;
        }
        let p = self.ensure(parent);
        let c = self.ensure(child);
        self.graph.add_edge(p, c, ());
        true
    }

    /// Direct children of `id` in link order. Unknown ids have no children.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.id_index.get(&id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, t)| self.graph[t]).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let idx = *self.id_index.get(&id)?;
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .map(|p| self.graph[p])
    }

    /// Every transitive descendant of `id`, breadth-first, excluding `id`.
    ///
    /// A parent always precedes its children in the result.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&start) = self.id_index.get(&id) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                out.push(self.graph[idx]);
            }
        }
        out
    }

    pub fn has_edge(&self, parent: NodeId, child: NodeId) -> bool {
        match (self.id_index.get(&parent), self.id_index.get(&child)) {
            (Some(&p), Some(&c)) => self.graph.contains_edge(p, c),
            _ => false,
        }
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut current = descendant;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Number of ids that have at least one child.
    pub fn len(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Parent → children pairs, ordered by when each parent was first linked.
    pub fn entries(&self) -> Vec<(NodeId, Vec<NodeId>)> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx])
            .map(|id| (id, self.children(id)))
            .filter(|(_, children)| !children.is_empty())
            .collect()
    }
}

impl Serialize for RelationIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (parent, children) in &entries {
            map.serialize_entry(parent, children)?;
        }
        map.end()
    }
}
