//! DragSession: the reducer behind one pointer drag
//!
//! A session is built from the rendered layout when a card is picked up and
//! replaced by a new session on every drag-over event that moves the card.
//! Sessions are immutable: [`DragSession::move_over`] returns `None` when the
//! event changes nothing, and otherwise a new session whose layout shares
//! every lane it did not touch with the old one.
//!
//! ```text
//! Idle --start--> Dragging --move_over--> Dragging --end--> Idle
//! ```

use crate::types::{ColumnKey, ColumnLayout, DragOver, DragPayload, DropTarget, MatchId};
use std::collections::HashMap;
use std::sync::Arc;

/// Column contents while one card is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    payload: DragPayload,
    /// Lane of every other card. Only the dragged card moves during a
    /// session, so this is built once at start.
    siblings: Arc<HashMap<MatchId, ColumnKey>>,
    layout: ColumnLayout,
    /// Lane currently holding the dragged card
    column: ColumnKey,
}

/// How a drag finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEnd {
    /// Released outside any valid target; the pre-drag layout stands
    Cancelled,
    /// Released over a valid target
    Dropped(DropResult),
}

/// Final placement of a dropped card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub payload: DragPayload,
    pub to_column: ColumnKey,
    pub to_index: usize,
    /// Layout to commit as the new rendered state
    pub layout: ColumnLayout,
}

impl DropResult {
    /// The card stayed in its lane
    pub fn is_reorder(&self) -> bool {
        self.payload.from_column == self.to_column
    }

    /// The card ended where it started
    pub fn is_unchanged(&self) -> bool {
        self.is_reorder() && self.payload.from_index == self.to_index
    }
}

impl DragSession {
    /// Pick up `match_id`. Returns `None` when the layout does not hold it.
    pub fn start(layout: &ColumnLayout, match_id: &MatchId) -> Option<Self> {
        let (from_column, from_index) = layout.locate(match_id)?;

        let siblings: HashMap<MatchId, ColumnKey> = layout
            .iter()
            .flat_map(|(key, ids)| ids.iter().map(move |id| (id.clone(), key)))
            .filter(|(id, _)| id != match_id)
            .collect();

        tracing::debug!("drag start {} at {}[{}]", match_id, from_column, from_index);
        Some(Self {
            payload: DragPayload {
                match_id: match_id.clone(),
                from_column,
                from_index,
            },
            siblings: Arc::new(siblings),
            layout: layout.clone(),
            column: from_column,
        })
    }

    /// What was picked up
    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    /// Column contents as they should render right now
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Current lane and index of the dragged card
    pub fn position(&self) -> (ColumnKey, usize) {
        (self.column, self.index_in_column())
    }

    fn index_in_column(&self) -> usize {
        let id = &self.payload.match_id;
        self.layout
            .column(self.column)
            .iter()
            .position(|candidate| candidate == id)
            .unwrap_or(0)
    }

    /// Apply one drag-over event.
    ///
    /// Returns `None` when the card would stay where it is, or when the
    /// hovered target is unknown. Touches at most two lanes.
    pub fn move_over(&self, over: &DragOver) -> Option<Self> {
        let id = &self.payload.match_id;
        let current = self.index_in_column();

        let (to_column, index) = match &over.target {
            DropTarget::Column(key) if *key == self.column => return None,
            DropTarget::Column(key) => (*key, self.layout.column(*key).len()),
            DropTarget::Match(sibling) if sibling == id => return None,
            DropTarget::Match(sibling) => {
                let column = *self.siblings.get(sibling)?;
                let at = self
                    .layout
                    .column(column)
                    .iter()
                    .position(|candidate| candidate == sibling)?;
                (column, at + usize::from(over.below_midpoint))
            }
        };

        let layout = if to_column == self.column {
            // Removing the card first shifts everything after it up by one.
            let index = if index > current { index - 1 } else { index };
            if index == current {
                return None;
            }
            let mut ids = self.layout.column(to_column).to_vec();
            ids.remove(current);
            let index = index.min(ids.len());
            ids.insert(index, id.clone());
            self.layout.with_column(to_column, ids)
        } else {
            let mut from = self.layout.column(self.column).to_vec();
            from.remove(current);
            let mut to = self.layout.column(to_column).to_vec();
            let index = index.min(to.len());
            to.insert(index, id.clone());
            self.layout
                .with_column(self.column, from)
                .with_column(to_column, to)
        };

        Some(Self {
            payload: self.payload.clone(),
            siblings: Arc::clone(&self.siblings),
            layout,
            column: to_column,
        })
    }

    /// Finish the drag. No target, or a target the session does not know,
    /// cancels.
    pub fn end(&self, over: Option<&DropTarget>) -> DragEnd {
        let valid = match over {
            None => false,
            Some(DropTarget::Column(_)) => true,
            Some(DropTarget::Match(target)) => {
                target == &self.payload.match_id || self.siblings.contains_key(target)
            }
        };
        if !valid {
            tracing::debug!("drag cancelled for {}", self.payload.match_id);
            return DragEnd::Cancelled;
        }

        let (to_column, to_index) = self.position();
        tracing::debug!(
            "drag end {} at {}[{}]",
            self.payload.match_id,
            to_column,
            to_index
        );
        DragEnd::Dropped(DropResult {
            payload: self.payload.clone(),
            to_column,
            to_index,
            layout: self.layout.clone(),
        })
    }
}
