//! Core data model for JSON graphs.
//!
//! A `JsonGraph` is a tree: every JSON container and every entry of a
//! container becomes a `GraphNode`, and parent→child links are recorded twice,
//! once as a renderable `GraphEdge` and once in the `RelationIndex`. Both are
//! written by the same call so they never disagree.

use crate::id::NodeId;
use crate::relation::RelationIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Add, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point on the diagram canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Translation between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Sub for Position {
    type Output = Delta;

    fn sub(self, origin: Position) -> Delta {
        Delta {
            dx: self.x - origin.x,
            dy: self.y - origin.y,
        }
    }
}

impl Add<Delta> for Position {
    type Output = Position;

    fn add(self, delta: Delta) -> Position {
        self.offset(delta.dx, delta.dy)
    }
}

/// One entry of a bulk "set positions for these node ids" write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: NodeId,
    pub position: Position,
}

// ─── Nodes & Edges ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Object,
    Array,
}

impl ContainerKind {
    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Object => "Object",
            ContainerKind::Array => "Array",
        }
    }
}

/// What a node stands for. Renderers may style on it; layout ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "container")]
pub enum NodeKind {
    /// A JSON object or array value.
    Container(ContainerKind),
    /// One key/value or index/value pair of a container.
    Entry,
    /// A primitive value that is the root of the document.
    Scalar,
}

/// A single node of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
    pub draggable: bool,
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: NodeId, label: impl Into<String>, position: Position, kind: NodeKind) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            draggable: true,
            kind,
        }
    }
}

/// Directed parent → child link. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl GraphEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: edge_id(source, target),
            source,
            target,
        }
    }
}

/// Deterministic edge id: `e<source>-<target>`.
pub fn edge_id(source: NodeId, target: NodeId) -> String {
    format!("e{source}-{target}")
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// The output of one build: nodes, edges, and the derived relation index.
///
/// Replaced wholesale on every rebuild; nothing in it survives an edit to
/// the source JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub relations: RelationIndex,

    /// Index from NodeId → position in `nodes`.
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
}

impl JsonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Ids are unique within a build, so a repeated id
    /// replaces the index entry but the caller is expected never to do that.
    pub fn add_node(&mut self, node: GraphNode) {
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Link `parent → child`, writing the edge and the relation together.
    ///
    /// Returns `false` (and records nothing) if either endpoint is missing
    /// or `child` already has a parent.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.node_index.contains_key(&parent) || !self.node_index.contains_key(&child) {
            log::warn!("refusing edge {parent}->{child}: endpoint not in graph");
            return false;
        }
        if !self.relations.link(parent, child) {
            return false;
        }
        self.edges.push(GraphEdge::new(parent, child));
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// The first node of the build, if any.
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }

    /// Find the first node carrying `label` (build order).
    pub fn find_by_label(&self, label: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.label == label)
    }
}
