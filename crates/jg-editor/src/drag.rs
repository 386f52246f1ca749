//! Subtree drag sessions.
//!
//! Dragging a node moves it and every descendant as a rigid body. At drag
//! start the positions of the whole subtree are frozen into a `DragSnapshot`;
//! every move then recomputes each position as `origin + (pointer - root
//! origin)` from that snapshot. Nothing is ever derived from the previous
//! frame, so repeated or coalesced move events cannot accumulate drift.
//!
//! ## Overlapping drags
//!
//! Snapshots are keyed by root id, so drags on disjoint subtrees are
//! independent. A start whose subtree overlaps another active drag (the node
//! is inside an active subtree, or contains an active root) is rejected.

use crate::input::DragEvent;
use jg_core::id::NodeId;
use jg_core::layout::FALLBACK_OFFSET;
use jg_core::model::{Position, PositionUpdate};
use jg_core::positions::PositionStore;
use jg_core::relation::RelationIndex;
use std::collections::HashMap;

/// Frozen start positions of one dragged subtree.
#[derive(Debug, Clone)]
pub struct DragSnapshot {
    root: NodeId,
    /// Root first, then descendants breadth-first.
    origins: Vec<(NodeId, Position)>,
    lookup: HashMap<NodeId, Position>,
}

impl DragSnapshot {
    /// Capture `root` at `position` and each descendant at its live position.
    ///
    /// A descendant missing from `store` is seeded `fallback_offset` below
    /// its parent's captured position.
    pub fn capture(
        root: NodeId,
        position: Position,
        relations: &RelationIndex,
        store: &PositionStore,
        fallback_offset: f64,
    ) -> Self {
        let mut snapshot = Self {
            root,
            origins: Vec::new(),
            lookup: HashMap::new(),
        };
        snapshot.record(root, position);

        for id in relations.descendants(root) {
            let origin = match store.get(id) {
                Some(p) => p,
                None => {
                    let anchor = relations
                        .parent(id)
                        .and_then(|p| snapshot.origin(p))
                        .unwrap_or(position);
                    log::warn!("node {id} has no live position; seeding below its parent");
                    anchor.offset(0.0, fallback_offset)
                }
            };
            snapshot.record(id, origin);
        }
        snapshot
    }

    fn record(&mut self, id: NodeId, position: Position) {
        self.origins.push((id, position));
        self.lookup.insert(id, position);
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn origin(&self, id: NodeId) -> Option<Position> {
        self.lookup.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.lookup.contains_key(&id)
    }

    /// Number of captured nodes, root included.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Positions of the whole subtree with the root placed at `target`.
    pub fn translate(&self, target: Position) -> Vec<PositionUpdate> {
        let Some(root_origin) = self.origin(self.root) else {
            return Vec::new();
        };
        let delta = target - root_origin;
        self.origins
            .iter()
            .map(|&(id, origin)| PositionUpdate {
                id,
                position: origin + delta,
            })
            .collect()
    }
}

/// Outcome of a drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    /// A new snapshot was captured.
    Started { captured: usize },
    /// The node already had an active drag; its snapshot was re-captured.
    Restarted { captured: usize },
    /// The subtree overlaps the active drag rooted at `active_root`.
    Rejected { active_root: NodeId },
    /// The node has no live position, so it is not part of the current graph.
    Unknown,
}

/// Manages every in-progress drag, keyed by the dragged node.
#[derive(Debug, Clone)]
pub struct DragSessions {
    snapshots: HashMap<NodeId, DragSnapshot>,
    fallback_offset: f64,
}

impl Default for DragSessions {
    fn default() -> Self {
        Self::new(FALLBACK_OFFSET)
    }
}

impl DragSessions {
    pub fn new(fallback_offset: f64) -> Self {
        Self {
            snapshots: HashMap::new(),
            fallback_offset,
        }
    }

    /// Begin dragging `id`, which the renderer reports at `position`.
    pub fn start(
        &mut self,
        id: NodeId,
        position: Position,
        relations: &RelationIndex,
        store: &PositionStore,
    ) -> DragStart {
        if !store.contains(id) {
            log::debug!("drag on {id} rejected: not in the current graph");
            return DragStart::Unknown;
        }
        if let Some(active_root) = self.overlapping_root(id, relations) {
            log::debug!("drag on {id} rejected: overlaps active drag on {active_root}");
            return DragStart::Rejected { active_root };
        }

        let snapshot =
            DragSnapshot::capture(id, position, relations, store, self.fallback_offset);
        let captured = snapshot.len();
        match self.snapshots.insert(id, snapshot) {
            Some(_) => DragStart::Restarted { captured },
            None => DragStart::Started { captured },
        }
    }

    fn overlapping_root(&self, id: NodeId, relations: &RelationIndex) -> Option<NodeId> {
        self.snapshots
            .values()
            .filter(|s| s.root() != id)
            .find(|s| s.contains(id) || relations.is_ancestor_of(id, s.root()))
            .map(|s| s.root())
    }

    /// Move the subtree of `id` so its root lands on `position`.
    ///
    /// Writes the new positions to `store` in one bulk update and returns the
    /// same updates for the renderer. Without an active drag this is a no-op.
    pub fn move_to(
        &mut self,
        id: NodeId,
        position: Position,
        store: &mut PositionStore,
    ) -> Vec<PositionUpdate> {
        let Some(snapshot) = self.snapshots.get(&id) else {
            log::trace!("move for {id} ignored: no active drag");
            return Vec::new();
        };
        let updates = snapshot.translate(position);
        store.apply(&updates);
        updates
    }

    /// End the drag on `id`. Returns whether a drag was active.
    pub fn stop(&mut self, id: NodeId) -> bool {
        let removed = self.snapshots.remove(&id).is_some();
        if !removed {
            log::trace!("stop for {id} ignored: no active drag");
        }
        removed
    }

    /// Drop every snapshot. Called when the graph they refer to is replaced.
    pub fn clear(&mut self) {
        if !self.snapshots.is_empty() {
            log::debug!("discarding {} active drag(s)", self.snapshots.len());
        }
        self.snapshots.clear();
    }

    /// Dispatch a renderer event. Only moves produce position updates.
    pub fn handle(
        &mut self,
        event: DragEvent,
        relations: &RelationIndex,
        store: &mut PositionStore,
    ) -> Vec<PositionUpdate> {
        match event {
            DragEvent::Start { id, position } => {
                self.start(id, position, relations, store);
                Vec::new()
            }
            DragEvent::Move { id, position } => self.move_to(id, position, store),
            DragEvent::Stop { id } => {
                self.stop(id);
                Vec::new()
            }
        }
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.snapshots.contains_key(&id)
    }

    pub fn snapshot(&self, id: NodeId) -> Option<&DragSnapshot> {
        self.snapshots.get(&id)
    }

    pub fn active_roots(&self) -> Vec<NodeId> {
        self.snapshots.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
