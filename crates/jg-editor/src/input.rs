//! Drag event model.
//!
//! The renderer owns hit testing and pointer capture; what reaches us is
//! already resolved to a node id plus that node's current position.

use jg_core::id::NodeId;
use jg_core::model::Position;

/// A drag gesture event raised by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pointer pressed on a node.
    Start { id: NodeId, position: Position },

    /// Pointer moved while the node is held.
    Move { id: NodeId, position: Position },

    /// Pointer released.
    Stop { id: NodeId },
}

impl DragEvent {
    pub fn from_drag_start(id: NodeId, x: f64, y: f64) -> Self {
        Self::Start {
            id,
            position: Position::new(x, y),
        }
    }

    pub fn from_drag_move(id: NodeId, x: f64, y: f64) -> Self {
        Self::Move {
            id,
            position: Position::new(x, y),
        }
    }

    pub fn from_drag_stop(id: NodeId) -> Self {
        Self::Stop { id }
    }

    /// The node this event is about.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Start { id, .. } | Self::Move { id, .. } | Self::Stop { id } => *id,
        }
    }

    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Start { position, .. } | Self::Move { position, .. } => Some(*position),
            Self::Stop { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_id_and_position() {
        let id = NodeId::from_seq(3);
        let start = DragEvent::from_drag_start(id, 75.0, 100.0);
        let moved = DragEvent::from_drag_move(id, 80.0, 90.0);
        let stop = DragEvent::from_drag_stop(id);

        assert_eq!(start.position(), Some(Position::new(75.0, 100.0)));
        assert_eq!(moved.position(), Some(Position::new(80.0, 90.0)));
        assert_eq!(stop.position(), None);
        assert!([start, moved, stop].iter().all(|e| e.node_id() == id));
    }
}
