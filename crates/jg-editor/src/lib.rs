pub mod drag;
pub mod input;
pub mod sync;

pub use drag::{DragSessions, DragSnapshot, DragStart};
pub use input::DragEvent;
pub use sync::{DisplayMode, SourceError, SyncEngine};
