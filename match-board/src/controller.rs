//! BoardController: drag events in, render-ready columns out
//!
//! The controller owns everything the board renders from: the latest
//! authoritative snapshot, the user's [`OrderRecord`], the rendered layout,
//! the active [`DragSession`] and the [`PendingDropTracker`].
//!
//! ```text
//! Idle --drag start--> Dragging --drop, same lane--> Idle (reordered)
//!                      Dragging --drop, new lane---> AwaitingConfirmation
//! AwaitingConfirmation --data shows the move-------> Idle
//! AwaitingConfirmation --mutation rejected---------> Idle (rolled back)
//! ```
//!
//! Actions take `&self`. State sits behind a mutex that is never held across
//! an `.await`, so the board stays interactive while a mutation is in flight.

use crate::drag::{DragEnd, DragSession};
use crate::error::{BoardError, Result};
use crate::grouping::arrange;
use crate::mutation::MatchMutations;
use crate::order::{KeyValueStorage, OrderRecord, OrderStore};
use crate::pending::{PendingDrop, PendingDropTracker};
use crate::types::{ColumnKey, ColumnLayout, DragOver, DropTarget, GroupId, Match, MatchId, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything the board needs to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    /// Every lane in display order, cards in render order
    pub columns: BTreeMap<ColumnKey, Vec<Match>>,
    /// A mutation is in flight; the UI should not start new drags
    pub busy: bool,
}

impl BoardView {
    /// Ids of one lane, in render order
    pub fn ids(&self, key: ColumnKey) -> Vec<&str> {
        self.columns
            .get(&key)
            .map(|matches| matches.iter().map(|m| m.id.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Coarse controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardPhase {
    Idle,
    Dragging,
    AwaitingConfirmation,
}

/// Result of [`BoardController::on_drag_end`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active
    Ignored,
    /// Released outside a valid target, or the card vanished mid-drag
    Cancelled,
    /// Moved within its lane; order saved, no remote call
    Reordered { column: ColumnKey, index: usize },
    /// Moved to another lane and the status change was accepted
    Moved(PendingDrop),
}

/// Result of one pass of the reconciliation effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// A drag is active; the rendered session was left alone
    Suppressed,
    /// A pending drop is not reflected yet; the optimistic layout stays
    AwaitingConfirmation,
    /// The pending drop was confirmed and cleared
    Confirmed,
    /// Rendered layout rebuilt from authoritative data
    Resynced,
}

struct BoardState {
    user: UserId,
    /// Latest authoritative snapshot
    items: Vec<Match>,
    record: OrderRecord,
    /// Last committed layout
    rendered: ColumnLayout,
    drag: Option<DragSession>,
    tracker: PendingDropTracker,
    /// Cards whose move was rejected while a drag was active. The drag's
    /// layout still shows them optimistically until it ends.
    rejected: Vec<MatchId>,
}

impl BoardState {
    fn group_of(&self, id: &MatchId) -> Option<GroupId> {
        self.items
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.group_id.clone())
    }
}

/// Counts a mutation as in flight until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Orchestrates drags, optimistic moves and the remote mutations
pub struct BoardController<M, S> {
    store: OrderStore<S>,
    mutations: M,
    state: Mutex<BoardState>,
    in_flight: AtomicUsize,
}

impl<M: MatchMutations, S: KeyValueStorage> BoardController<M, S> {
    /// Create a controller for `user`, loading their saved order
    pub fn new(user: impl Into<UserId>, store: OrderStore<S>, mutations: M) -> Self {
        let user = user.into();
        let record = store.load(&user);
        Self {
            store,
            mutations,
            state: Mutex::new(BoardState {
                user,
                items: Vec::new(),
                record,
                rendered: ColumnLayout::default(),
                drag: None,
                tracker: PendingDropTracker::new(),
                rejected: Vec::new(),
            }),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the order store
    pub fn order_store(&self) -> &OrderStore<S> {
        &self.store
    }

    /// Get the mutation boundary
    pub fn mutations(&self) -> &M {
        &self.mutations
    }

    /// Current user
    pub fn user(&self) -> UserId {
        self.state().user.clone()
    }

    /// Switch users: load the new user's order and resync. Cancels any drag.
    pub fn set_user(&self, user: impl Into<UserId>) -> Reconciliation {
        let mut state = self.state();
        state.user = user.into();
        state.record = self.store.load(&state.user);
        state.drag = None;
        state.rejected.clear();
        tracing::debug!("switched board to user {}", state.user);

        let BoardState {
            user, items, record, ..
        } = &mut *state;
        if record.reconcile(items) {
            self.store.save(user, record);
        }
        self.run_effect(&mut state)
    }

    /// Render-ready columns. While dragging, the session's layout is shown.
    pub fn view_model(&self) -> BoardView {
        let state = self.state();
        let layout = state
            .drag
            .as_ref()
            .map(DragSession::layout)
            .unwrap_or(&state.rendered);

        let by_id: HashMap<&MatchId, &Match> = state.items.iter().map(|m| (&m.id, m)).collect();
        let columns = layout
            .iter()
            .map(|(key, ids)| {
                let matches: Vec<Match> = ids
                    .iter()
                    .filter_map(|id| by_id.get(id).map(|m| (*m).clone()))
                    .collect();
                (key, matches)
            })
            .collect();

        BoardView {
            columns,
            busy: self.is_busy(),
        }
    }

    /// Layout currently on screen
    pub fn rendered_layout(&self) -> ColumnLayout {
        let state = self.state();
        match &state.drag {
            Some(session) => session.layout().clone(),
            None => state.rendered.clone(),
        }
    }

    /// Copy of the user's order record
    pub fn order_record(&self) -> OrderRecord {
        self.state().record.clone()
    }

    /// The unconfirmed cross-lane move, if any
    pub fn pending_drop(&self) -> Option<PendingDrop> {
        self.state().tracker.current().cloned()
    }

    /// True while any mutation is in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn phase(&self) -> BoardPhase {
        let state = self.state();
        if state.drag.is_some() {
            BoardPhase::Dragging
        } else if state.tracker.current().is_some() {
            BoardPhase::AwaitingConfirmation
        } else {
            BoardPhase::Idle
        }
    }

    /// Accept a new authoritative snapshot.
    ///
    /// The order record is garbage-collected against it and saved when it
    /// changed; then the reconciliation effect runs.
    pub fn on_items_changed(&self, items: Vec<Match>) -> Reconciliation {
        let mut state = self.state();
        state.items = items;

        let BoardState {
            user, items, record, ..
        } = &mut *state;
        if record.reconcile(items) {
            self.store.save(user, record);
        }
        self.run_effect(&mut state)
    }

    /// Pick up a card. Returns false when it is not on the board or a drag
    /// is already active.
    pub fn on_drag_start(&self, match_id: &MatchId) -> bool {
        let mut state = self.state();
        if state.drag.is_some() {
            return false;
        }
        match DragSession::start(&state.rendered, match_id) {
            Some(session) => {
                state.drag = Some(session);
                true
            }
            None => false,
        }
    }

    /// Apply a drag-over event. Returns true when the rendered layout changed.
    pub fn on_drag_over(&self, over: &DragOver) -> bool {
        let mut state = self.state();
        let next = state
            .drag
            .as_ref()
            .and_then(|session| session.move_over(over));
        match next {
            Some(session) => {
                state.drag = Some(session);
                true
            }
            None => false,
        }
    }

    /// Drop the card.
    ///
    /// The session's final layout is committed at once. A move to another
    /// lane records a pending drop and awaits the status change; if that
    /// rejects the move is rolled back and the error returned.
    pub async fn on_drag_end(&self, over: Option<&DropTarget>) -> Result<DropOutcome> {
        let (pending, group_id) = {
            let mut state = self.state();
            let Some(session) = state.drag.take() else {
                return Ok(DropOutcome::Ignored);
            };

            let rejected = std::mem::take(&mut state.rejected);
            let mut result = match session.end(over) {
                DragEnd::Cancelled => {
                    self.run_effect(&mut state);
                    return Ok(DropOutcome::Cancelled);
                }
                DragEnd::Dropped(result) => result,
            };

            let match_id = result.payload.match_id.clone();
            let Some(group_id) = state.group_of(&match_id) else {
                tracing::debug!("dropped match {} is gone; cancelling", match_id);
                self.run_effect(&mut state);
                return Ok(DropOutcome::Cancelled);
            };

            if rejected.contains(&match_id) {
                tracing::debug!("move of dragged match {} was rejected; cancelling", match_id);
                self.run_effect(&mut state);
                return Ok(DropOutcome::Cancelled);
            }

            // Cards rejected mid-drag go back before anything is committed.
            if !rejected.is_empty() {
                let authoritative = arrange(&state.items, &state.record);
                for id in &rejected {
                    result.layout = restore(&result.layout, &authoritative, id);
                }
                let Some((to_column, to_index)) = result.layout.locate(&match_id) else {
                    self.run_effect(&mut state);
                    return Ok(DropOutcome::Cancelled);
                };
                result.to_column = to_column;
                result.to_index = to_index;
            }

            state.rendered = result.layout.clone();

            if result.is_reorder() {
                let ids = result.layout.column(result.to_column).to_vec();
                state.record.set_column(result.to_column, &ids);
                self.store.save(&state.user, &state.record);
                tracing::info!(
                    "reordered {} to {}[{}]",
                    match_id,
                    result.to_column,
                    result.to_index
                );
                self.run_effect(&mut state);
                return Ok(DropOutcome::Reordered {
                    column: result.to_column,
                    index: result.to_index,
                });
            }

            let pending = state.tracker.record_pending_drop(
                match_id,
                result.payload.from_column,
                result.to_column,
                result.to_index,
            );
            tracing::info!(
                "moving {} from {} to {}[{}] (pending {})",
                pending.match_id,
                pending.from_column,
                pending.to_column,
                pending.to_index,
                pending.token
            );
            self.run_effect(&mut state);
            (pending, group_id)
        };

        let _in_flight = InFlight::enter(&self.in_flight);
        let status = pending.to_column.status();
        match self
            .mutations
            .change_status(&pending.match_id, &group_id, status)
            .await
        {
            Ok(()) => Ok(DropOutcome::Moved(pending)),
            Err(e) => {
                tracing::warn!(
                    "status change of {} to {} failed: {}",
                    pending.match_id,
                    status,
                    e
                );
                self.roll_back(&pending);
                Err(e.into())
            }
        }
    }

    /// Delete a match remotely, then drop it from the board
    pub async fn on_delete(&self, match_id: &MatchId) -> Result<()> {
        let group_id = self
            .state()
            .group_of(match_id)
            .ok_or_else(|| BoardError::MatchNotFound {
                id: match_id.to_string(),
            })?;

        {
            let _in_flight = InFlight::enter(&self.in_flight);
            if let Err(e) = self.mutations.delete_match(match_id, &group_id).await {
                tracing::warn!("delete of {} failed: {}", match_id, e);
                return Err(e.into());
            }
        }

        let mut state = self.state();
        state.items.retain(|m| &m.id != match_id);
        if state.record.remove(match_id) {
            self.store.save(&state.user, &state.record);
        }
        state.rendered = state.rendered.without(match_id);
        if state
            .tracker
            .current()
            .is_some_and(|pending| &pending.match_id == match_id)
        {
            state.tracker.clear_pending_drop();
        }
        tracing::info!("deleted {}", match_id);
        Ok(())
    }

    /// Undo a rejected move, unless a newer drop has superseded it
    fn roll_back(&self, pending: &PendingDrop) {
        let mut state = self.state();
        let current = state.tracker.rollback_pending_drop(pending.token).is_some();

        if state.drag.is_some() {
            // The active drag still shows the card in its target lane.
            tracing::debug!("restoring {} when the active drag ends", pending.match_id);
            state.rejected.push(pending.match_id.clone());
        } else if current {
            state.rendered = arrange(&state.items, &state.record);
        } else {
            // Put the rejected card back without disturbing the newer
            // optimistic move.
            let authoritative = arrange(&state.items, &state.record);
            state.rendered = restore(&state.rendered, &authoritative, &pending.match_id);
        }

        if current {
            tracing::info!(
                "rolled back move of {} to {}",
                pending.match_id,
                pending.to_column
            );
        } else {
            tracing::debug!(
                "pending drop {} was superseded; restoring only {}",
                pending.token,
                pending.match_id
            );
        }
    }

    /// Reconverge the rendered layout with authoritative data
    fn run_effect(&self, state: &mut BoardState) -> Reconciliation {
        if state.drag.is_some() {
            tracing::debug!("reconciliation suppressed during drag");
            return Reconciliation::Suppressed;
        }

        let Some(pending) = state.tracker.current().cloned() else {
            state.rendered = arrange(&state.items, &state.record);
            return Reconciliation::Resynced;
        };

        if !state.items.iter().any(|m| m.id == pending.match_id) {
            tracing::debug!("pending match {} disappeared", pending.match_id);
            state.tracker.clear_pending_drop();
            state.rendered = arrange(&state.items, &state.record);
            return Reconciliation::Resynced;
        }

        // Arranged as a newcomer, the card lands last in the lane its status
        // maps to, wherever the record happens to list it.
        let mut candidate = state.record.clone();
        candidate.remove(&pending.match_id);
        if !pending.is_confirmed_by(&arrange(&state.items, &candidate)) {
            tracing::debug!("pending drop {} not reflected yet", pending.token);
            return Reconciliation::AwaitingConfirmation;
        }

        state.tracker.clear_pending_drop();
        let lane = state.rendered.column(pending.to_column).to_vec();
        state.record.set_column(pending.to_column, &lane);
        if state.record.column_of(&pending.match_id) != Some(pending.to_column) {
            state
                .record
                .apply_move(&pending.match_id, pending.to_column, pending.to_index);
        }
        state.record.reconcile(&state.items);
        self.store.save(&state.user, &state.record);
        state.rendered = arrange(&state.items, &state.record);
        tracing::info!(
            "confirmed move of {} to {}",
            pending.match_id,
            pending.to_column
        );
        Reconciliation::Confirmed
    }
}

/// `layout` with `id` moved back to its lane in `authoritative`, ahead of
/// the first card that followed it there, else last
fn restore(layout: &ColumnLayout, authoritative: &ColumnLayout, id: &MatchId) -> ColumnLayout {
    let Some((column, index)) = authoritative.locate(id) else {
        return layout.without(id);
    };
    let rest = layout.without(id);
    let lane = rest.column(column);
    let at = authoritative.column(column)[index + 1..]
        .iter()
        .find_map(|next| lane.iter().position(|candidate| candidate == next))
        .unwrap_or(lane.len());
    rest.moved(id, column, at)
}
