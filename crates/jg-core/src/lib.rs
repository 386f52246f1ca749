pub mod builder;
pub mod id;
pub mod layout;
pub mod model;
pub mod positions;
pub mod relation;

pub use builder::{build, build_with_policy};
pub use id::NodeId;
pub use layout::LayoutPolicy;
pub use model::*;
pub use positions::PositionStore;
pub use relation::RelationIndex;
