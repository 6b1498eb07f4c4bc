//! Match: the work item rendered as a card on the board

use super::column::ColumnKey;
use super::ids::{GroupId, MatchId};
use serde::{Deserialize, Serialize};

/// A match as delivered by the system of record.
///
/// `status` is kept as the raw string so unknown values survive a round
/// trip; [`Match::column`] maps it onto a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group_id: GroupId,
    pub status: String,
    #[serde(default)]
    pub title: String,

    /// Domain fields this engine does not interpret
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Match {
    /// Create a new match with the given id, group and raw status
    pub fn new(
        id: impl Into<MatchId>,
        group_id: impl Into<GroupId>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            status: status.into(),
            title: String::new(),
            fields: serde_json::Map::new(),
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set an extra domain field
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Lane this match renders in
    pub fn column(&self) -> ColumnKey {
        ColumnKey::for_status(&self.status)
    }
}
