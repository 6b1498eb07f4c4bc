//! Core types for the match board engine

mod column;
mod drag;
mod ids;
mod item;
mod layout;

// Re-export all types
pub use column::{ColumnKey, MatchStatus};
pub use drag::{DragOver, DragPayload, DropTarget};
pub use ids::{GroupId, MatchId, UserId};
pub use item::Match;
pub use layout::ColumnLayout;
