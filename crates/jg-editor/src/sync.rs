//! Sync engine: JSON text ↔ diagram.
//!
//! The engine is the single owner of everything the presentation shell
//! needs between events:
//!
//! - **Text → Graph**: every accepted edit is parsed with `serde_json` and,
//!   while visualizing, rebuilt into a fresh `JsonGraph`. The rebuild is a
//!   full replace: live positions and active drags from the old graph are
//!   discarded because they refer to ids that no longer mean the same nodes.
//!
//! - **Graph → Renderer**: drag events are routed to `DragSessions`, which
//!   write into the `PositionStore`; `render_nodes()` reports nodes at their
//!   live positions.

use crate::drag::DragSessions;
use crate::input::DragEvent;
use jg_core::builder::build_with_policy;
use jg_core::layout::LayoutPolicy;
use jg_core::model::{GraphEdge, GraphNode, JsonGraph, PositionUpdate};
use jg_core::positions::PositionStore;
use jg_core::relation::RelationIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors surfaced to the shell. The core itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Which view the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    /// Text editing only. The last graph stays readable but is neither
    /// rebuilt nor draggable.
    #[default]
    Edit,
    /// Text is mirrored as a diagram.
    Visualize,
}

pub struct SyncEngine {
    /// The current JSON source text.
    pub text: String,

    /// The current display mode.
    mode: DisplayMode,

    /// The graph from the most recent build, if any.
    graph: Option<JsonGraph>,

    /// Live node positions for `graph`.
    positions: PositionStore,

    /// In-progress drags on `graph`.
    drags: DragSessions,

    policy: LayoutPolicy,
}

impl SyncEngine {
    /// Create an empty engine in edit mode.
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            text: String::new(),
            mode: DisplayMode::Edit,
            graph: None,
            positions: PositionStore::new(),
            drags: DragSessions::new(policy.fallback_offset),
            policy,
        }
    }

    /// Create an engine already visualizing `text`.
    pub fn from_text(text: &str, policy: LayoutPolicy) -> Result<Self, SourceError> {
        let mut engine = Self::new(policy);
        engine.mode = DisplayMode::Visualize;
        engine.set_text(text)?;
        Ok(engine)
    }

    // ─── Text → Graph ────────────────────────────────────────────────────

    /// Replace the source text.
    ///
    /// The text is always stored. Returns `Ok(true)` if the graph was
    /// rebuilt. On a parse error the previous graph stays on screen.
    pub fn set_text(&mut self, text: &str) -> Result<bool, SourceError> {
        self.text = text.to_string();
        let value: Value = serde_json::from_str(text)?;
        if self.mode != DisplayMode::Visualize {
            return Ok(false);
        }
        self.replace_graph(&value);
        Ok(true)
    }

    /// Switch display mode. Entering visualize mode rebuilds from the
    /// current text.
    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<(), SourceError> {
        if mode == self.mode {
            return Ok(());
        }
        self.mode = mode;
        match mode {
            DisplayMode::Visualize => self.rebuild(),
            DisplayMode::Edit => {
                self.drags.clear();
                Ok(())
            }
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Re-parse the current text and rebuild the graph from scratch.
    pub fn rebuild(&mut self) -> Result<(), SourceError> {
        let value: Value = serde_json::from_str(&self.text)?;
        self.replace_graph(&value);
        Ok(())
    }

    fn replace_graph(&mut self, value: &Value) {
        let graph = build_with_policy(value, &self.policy);
        self.drags.clear();
        self.positions = PositionStore::from_graph(&graph);
        self.graph = Some(graph);
    }

    /// The current text re-serialized with two-space indentation.
    pub fn formatted_text(&self) -> Result<String, SourceError> {
        let value: Value = serde_json::from_str(&self.text)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    // ─── Graph → Renderer ────────────────────────────────────────────────

    /// Route a renderer drag event. Returns the positions to write back.
    /// Ignored outside visualize mode.
    pub fn handle_drag(&mut self, event: DragEvent) -> Vec<PositionUpdate> {
        if self.mode != DisplayMode::Visualize {
            log::trace!("drag event for {} ignored in edit mode", event.node_id());
            return Vec::new();
        }
        let Some(graph) = &self.graph else {
            return Vec::new();
        };
        self.drags
            .handle(event, &graph.relations, &mut self.positions)
    }

    /// Nodes at their live positions.
    pub fn render_nodes(&self) -> Vec<GraphNode> {
        let Some(graph) = &self.graph else {
            return Vec::new();
        };
        graph
            .nodes
            .iter()
            .map(|n| {
                let mut node = n.clone();
                if let Some(p) = self.positions.get(n.id) {
                    node.position = p;
                }
                node
            })
            .collect()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        match &self.graph {
            Some(g) => &g.edges,
            None => &[],
        }
    }

    pub fn relations(&self) -> Option<&RelationIndex> {
        self.graph.as_ref().map(|g| &g.relations)
    }

    pub fn graph(&self) -> Option<&JsonGraph> {
        self.graph.as_ref()
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn drags(&self) -> &DragSessions {
        &self.drags
    }

    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(LayoutPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jg_core::id::NodeId;

    #[test]
    fn edit_mode_keeps_no_graph() {
        let mut engine = SyncEngine::default();
        assert!(!engine.set_text("[1, 2]").unwrap());
        assert!(engine.graph().is_none());
        assert!(engine.render_nodes().is_empty());
    }

    #[test]
    fn entering_visualize_builds() {
        let mut engine = SyncEngine::default();
        engine.set_text(r#"{"a": 1}"#).unwrap();
        engine.set_mode(DisplayMode::Visualize).unwrap();
        assert_eq!(engine.render_nodes().len(), 2);
        assert_eq!(engine.edges().len(), 1);
    }

    #[test]
    fn invalid_text_keeps_previous_graph() {
        let mut engine = SyncEngine::from_text("[1]", LayoutPolicy::default()).unwrap();
        let err = engine.set_text("[1,").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON"));
        assert_eq!(engine.text, "[1,");
        assert_eq!(engine.render_nodes().len(), 2);
    }

    #[test]
    fn drag_without_graph_is_noop() {
        let mut engine = SyncEngine::default();
        let updates = engine.handle_drag(DragEvent::from_drag_move(NodeId::from_seq(1), 1.0, 1.0));
        assert!(updates.is_empty());
    }

    #[test]
    fn formatted_text_is_pretty() {
        let mut engine = SyncEngine::default();
        engine.set_text(r#"{"b":1,"a":[true]}"#).unwrap();
        assert_eq!(
            engine.formatted_text().unwrap(),
            "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}"
        );
    }
}
