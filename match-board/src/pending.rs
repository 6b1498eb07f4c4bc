//! Tracking of an optimistic cross-lane move until the server agrees

use crate::types::{ColumnKey, ColumnLayout, MatchId};
use serde::Serialize;

/// A cross-lane move rendered locally but not yet reflected in
/// authoritative data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingDrop {
    /// Issued by the tracker; increases with every recorded drop
    pub token: u64,
    pub match_id: MatchId,
    pub from_column: ColumnKey,
    pub to_column: ColumnKey,
    pub to_index: usize,
}

impl PendingDrop {
    /// Whether `layout` shows the match in `to_column` at or past
    /// `to_index`.
    ///
    /// Other cards may have been inserted or removed meanwhile, so only a
    /// lower bound is checked, and it is clamped to the lane's last slot.
    pub fn is_confirmed_by(&self, layout: &ColumnLayout) -> bool {
        let ids = layout.column(self.to_column);
        match ids.iter().position(|id| id == &self.match_id) {
            Some(index) => index >= self.to_index.min(ids.len().saturating_sub(1)),
            None => false,
        }
    }
}

/// Holds at most one [`PendingDrop`].
///
/// The only transitions are [`record_pending_drop`](Self::record_pending_drop),
/// [`clear_pending_drop`](Self::clear_pending_drop) and
/// [`rollback_pending_drop`](Self::rollback_pending_drop).
#[derive(Debug, Default)]
pub struct PendingDropTracker {
    current: Option<PendingDrop>,
    next_token: u64,
}

impl PendingDropTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending drop, if any
    pub fn current(&self) -> Option<&PendingDrop> {
        self.current.as_ref()
    }

    /// Record a new pending drop, superseding any unresolved one
    pub fn record_pending_drop(
        &mut self,
        match_id: MatchId,
        from_column: ColumnKey,
        to_column: ColumnKey,
        to_index: usize,
    ) -> PendingDrop {
        self.next_token += 1;
        let pending = PendingDrop {
            token: self.next_token,
            match_id,
            from_column,
            to_column,
            to_index,
        };
        if let Some(previous) = self.current.replace(pending.clone()) {
            tracing::debug!(
                "pending drop {} for {} superseded by {}",
                previous.token,
                previous.match_id,
                pending.token
            );
        }
        pending
    }

    /// Clear the pending drop after confirmation
    pub fn clear_pending_drop(&mut self) -> Option<PendingDrop> {
        self.current.take()
    }

    /// Clear the pending drop after its mutation failed.
    ///
    /// Only the drop carrying `token` is cleared. A stale token leaves a
    /// newer pending drop untouched and returns `None`.
    pub fn rollback_pending_drop(&mut self, token: u64) -> Option<PendingDrop> {
        match &self.current {
            Some(pending) if pending.token == token => self.current.take(),
            _ => None,
        }
    }
}
