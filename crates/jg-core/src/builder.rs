//! JSON value → positioned node/edge graph.
//!
//! One deterministic depth-first, pre-order pass. Object entries are visited
//! in insertion order (`serde_json` is built with `preserve_order`), array
//! entries in index order, so the same input always produces the same ids,
//! labels, and positions.

use crate::id::{IdAllocator, NodeId};
use crate::layout::LayoutPolicy;
use crate::model::{ContainerKind, GraphNode, JsonGraph, NodeKind, Position};
use serde_json::Value;

/// Build a graph with the default layout policy.
pub fn build(value: &Value) -> JsonGraph {
    build_with_policy(value, &LayoutPolicy::default())
}

/// Build a graph with an explicit layout policy.
pub fn build_with_policy(value: &Value, policy: &LayoutPolicy) -> JsonGraph {
    let graph = GraphBuilder::new(*policy).build(value);
    log::debug!(
        "built graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Single-use builder. Owns the id counter and the graph under construction,
/// so nothing leaks between builds.
pub struct GraphBuilder {
    policy: LayoutPolicy,
    ids: IdAllocator,
    graph: JsonGraph,
}

impl GraphBuilder {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            policy,
            ids: IdAllocator::new(),
            graph: JsonGraph::new(),
        }
    }

    /// Consume the builder and lay out `value` starting at the origin.
    pub fn build(mut self, value: &Value) -> JsonGraph {
        self.visit(value, 0, 0.0, None);
        self.graph
    }

    fn visit(&mut self, value: &Value, depth: u32, center_x: f64, parent: Option<NodeId>) {
        let id = self.ids.allocate();
        let (label, kind) = match container_kind(value) {
            Some(container) => (container.label().to_string(), NodeKind::Container(container)),
            None => (scalar_label(value), NodeKind::Scalar),
        };
        let position = Position::new(center_x, self.policy.row_y(depth));
        self.graph.add_node(GraphNode::new(id, label, position, kind));

        if let Some(parent) = parent {
            let linked = self.graph.link(parent, id);
            debug_assert!(linked, "fresh node {id} failed to link under {parent}");
        }

        let pairs = entries(value);
        if pairs.is_empty() {
            return;
        }

        let entry_y = self.policy.row_y(self.policy.entry_depth(depth));
        let count = pairs.len();
        for (i, (key, child)) in pairs.into_iter().enumerate() {
            let x = self.policy.slot_x(center_x, count, i);
            let entry_id = self.ids.allocate();
            let nested = container_kind(child).is_some();
            let label = if nested {
                key
            } else {
                format!("{key}: {}", scalar_label(child))
            };
            self.graph.add_node(GraphNode::new(
                entry_id,
                label,
                Position::new(x, entry_y),
                NodeKind::Entry,
            ));
            let linked = self.graph.link(id, entry_id);
            debug_assert!(linked, "fresh entry {entry_id} failed to link under {id}");

            if nested {
                self.visit(child, self.policy.nested_depth(depth), x, Some(entry_id));
            }
        }
    }
}

fn container_kind(value: &Value) -> Option<ContainerKind> {
    match value {
        Value::Object(_) => Some(ContainerKind::Object),
        Value::Array(_) => Some(ContainerKind::Array),
        _ => None,
    }
}

/// Key/value pairs of a container; array keys are their indices.
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// String form of a primitive. Strings are shown without quotes.
pub fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(graph: &JsonGraph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn empty_array_is_single_node() {
        let g = build(&json!([]));
        assert_eq!(labels(&g), vec!["Array"]);
        assert_eq!(g.edge_count(), 0);
        assert!(g.relations.is_empty());
    }

    #[test]
    fn bare_primitive_root() {
        let g = build(&json!("hello"));
        assert_eq!(labels(&g), vec!["hello"]);
        assert_eq!(g.nodes[0].kind, NodeKind::Scalar);
        assert_eq!(g.nodes[0].position, Position::new(0.0, 0.0));
    }

    #[test]
    fn primitive_labels() {
        let g = build(&json!([null, true, 1.5, "x"]));
        assert_eq!(
            labels(&g),
            vec!["Array", "0: null", "1: true", "2: 1.5", "3: x"]
        );
    }

    #[test]
    fn ids_follow_preorder() {
        let g = build(&json!({"a": [1], "b": 2}));
        let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(labels(&g), vec!["Object", "a", "Array", "0: 1", "b: 2"]);
    }

    #[test]
    fn entries_sit_one_row_below_centered() {
        let g = build(&json!({"a": 1, "b": 2}));
        assert_eq!(g.nodes[1].position, Position::new(-75.0, 100.0));
        assert_eq!(g.nodes[2].position, Position::new(75.0, 100.0));
    }

    #[test]
    fn nested_container_sits_under_its_entry() {
        let g = build(&json!({"a": 1, "b": {"c": 2}}));
        let b = g.find_by_label("b").unwrap();
        let inner = &g.nodes[3];
        assert_eq!(inner.label, "Object");
        assert_eq!(inner.position, Position::new(b.position.x, 200.0));
        let c = g.find_by_label("c: 2").unwrap();
        assert_eq!(c.position, Position::new(b.position.x, 300.0));
    }

    #[test]
    fn custom_policy_is_honored() {
        let policy = LayoutPolicy {
            row_height: 10.0,
            spacing: 20.0,
            ..LayoutPolicy::default()
        };
        let g = build_with_policy(&json!([1, 2]), &policy);
        assert_eq!(g.nodes[1].position, Position::new(-10.0, 10.0));
        assert_eq!(g.nodes[2].position, Position::new(10.0, 10.0));
    }

    #[test]
    fn every_non_root_node_is_linked() {
        let g = build(&json!({"a": {"b": [1, 2, {"c": null}]}, "d": []}));
        assert_eq!(g.edge_count(), g.node_count() - 1);
        for node in g.nodes.iter().skip(1) {
            assert!(g.relations.parent(node.id).is_some(), "{} is orphaned", node.id);
        }
    }

    #[test]
    fn all_nodes_draggable() {
        let g = build(&json!({"a": {"b": [1, 2, {"c": null}]}}));
        assert!(g.nodes.iter().all(|n| n.draggable));
    }
}
