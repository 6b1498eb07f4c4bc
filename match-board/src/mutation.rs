//! Remote mutations on the system of record

use crate::error::MutationError;
use crate::types::{GroupId, MatchId, MatchStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// The two writes the board can make against the system of record.
///
/// Implementations talk to the network; the board never retries a failed
/// call.
#[async_trait]
pub trait MatchMutations: Send + Sync {
    /// Set a match's status
    async fn change_status(
        &self,
        match_id: &MatchId,
        group_id: &GroupId,
        status: MatchStatus,
    ) -> Result<(), MutationError>;

    /// Delete a match
    async fn delete_match(&self, match_id: &MatchId, group_id: &GroupId)
        -> Result<(), MutationError>;
}

#[async_trait]
impl<T: MatchMutations + ?Sized> MatchMutations for Arc<T> {
    async fn change_status(
        &self,
        match_id: &MatchId,
        group_id: &GroupId,
        status: MatchStatus,
    ) -> Result<(), MutationError> {
        (**self).change_status(match_id, group_id, status).await
    }

    async fn delete_match(
        &self,
        match_id: &MatchId,
        group_id: &GroupId,
    ) -> Result<(), MutationError> {
        (**self).delete_match(match_id, group_id).await
    }
}
