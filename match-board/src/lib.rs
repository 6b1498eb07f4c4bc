//! Reordering and status-transition engine for a kanban match board
//!
//! The system of record stores each match's status but not where the user
//! put the card inside a lane. This crate keeps a responsive, consistent
//! board on top of that:
//!
//! - **Card order** lives per user in an [`OrderStore`] and is reconciled
//!   against every new snapshot.
//! - **Drags** run through a pure [`DragSession`] reducer, cheap enough for
//!   every pointer-move event.
//! - **Cross-lane drops** render optimistically, call the remote status
//!   change, and stay pending until authoritative data agrees, or roll back
//!   if the call fails.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use match_board::{
//!     BoardController, DragOver, DropTarget, Match, MemoryStorage, OrderStore,
//! };
//! # use match_board::{async_trait, GroupId, MatchId, MatchMutations, MatchStatus, MutationError};
//! # struct Api;
//! # #[async_trait]
//! # impl MatchMutations for Api {
//! #     async fn change_status(&self, _: &MatchId, _: &GroupId, _: MatchStatus) -> Result<(), MutationError> { Ok(()) }
//! #     async fn delete_match(&self, _: &MatchId, _: &GroupId) -> Result<(), MutationError> { Ok(()) }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let board = BoardController::new("user-1", OrderStore::new(MemoryStorage::new()), Api);
//! board.on_items_changed(vec![
//!     Match::new("m1", "g1", "applied"),
//!     Match::new("m2", "g1", "interviewing"),
//! ]);
//!
//! // Drag m1 onto m2's lane and drop it there
//! board.on_drag_start(&"m1".into());
//! board.on_drag_over(&DragOver::above("m2"));
//! board.on_drag_end(Some(&DropTarget::Match("m2".into()))).await?;
//!
//! let view = board.view_model();
//! assert_eq!(view.ids(match_board::ColumnKey::Interviewing), ["m1", "m2"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod drag;
mod error;
pub mod grouping;
pub mod mutation;
pub mod order;
pub mod pending;
pub mod types;

pub use async_trait::async_trait;

pub use config::BoardConfig;
pub use controller::{BoardController, BoardPhase, BoardView, DropOutcome, Reconciliation};
pub use drag::{DragEnd, DragSession, DropResult};
pub use error::{BoardError, MutationError, Result, StorageError};
pub use grouping::{arrange, group_by_column, sort_by_order};
pub use mutation::MatchMutations;
pub use order::{FileStorage, KeyValueStorage, MemoryStorage, OrderRecord, OrderStore};
pub use pending::{PendingDrop, PendingDropTracker};

// Re-export commonly used types
pub use types::{
    ColumnKey, ColumnLayout, DragOver, DragPayload, DropTarget, GroupId, Match, MatchId,
    MatchStatus, UserId,
};
