//! Drag payloads and drop targets, validated at the UI boundary

use super::column::ColumnKey;
use super::ids::MatchId;
use serde::{Deserialize, Serialize};

/// Prefix marking a drop target id as a lane rather than a match
const COLUMN_TARGET_PREFIX: &str = "column:";

/// What was picked up at drag start. Immutable for the gesture's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub match_id: MatchId,
    pub from_column: ColumnKey,
    pub from_index: usize,
}

/// Wire form carried through the UI's untyped drag data channel
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Transfer {
    Match {
        match_id: MatchId,
        from_column: ColumnKey,
        from_index: usize,
    },
}

impl DragPayload {
    /// Parse a payload from drag transfer data.
    ///
    /// Anything that is not a well-formed match payload yields `None`.
    pub fn from_transfer(data: &str) -> Option<Self> {
        match serde_json::from_str::<Transfer>(data) {
            Ok(Transfer::Match {
                match_id,
                from_column,
                from_index,
            }) if !match_id.as_str().is_empty() => Some(Self {
                match_id,
                from_column,
                from_index,
            }),
            Ok(_) => {
                tracing::debug!("drag payload has an empty match id");
                None
            }
            Err(e) => {
                tracing::debug!("ignoring drag payload: {}", e);
                None
            }
        }
    }

    /// Serialize for the UI's drag data channel
    pub fn to_transfer(&self) -> String {
        let transfer = Transfer::Match {
            match_id: self.match_id.clone(),
            from_column: self.from_column,
            from_index: self.from_index,
        };
        // Serializing a struct of strings and integers cannot fail.
        serde_json::to_string(&transfer).unwrap_or_default()
    }
}

/// The element under the pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A lane's empty area
    Column(ColumnKey),
    /// Another card
    Match(MatchId),
}

impl DropTarget {
    /// Parse a target id from the UI. `column:<key>` names a lane, any other
    /// non-empty id names a match.
    pub fn parse(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        match id.strip_prefix(COLUMN_TARGET_PREFIX) {
            Some(key) => ColumnKey::parse(key).map(Self::Column),
            None => Some(Self::Match(MatchId::from(id))),
        }
    }

    /// The id string the UI uses for this target
    pub fn to_id(&self) -> String {
        match self {
            Self::Column(key) => format!("{}{}", COLUMN_TARGET_PREFIX, key),
            Self::Match(id) => id.to_string(),
        }
    }
}

/// One drag-over event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOver {
    pub target: DropTarget,
    /// Pointer is below the hovered card's vertical midpoint
    pub below_midpoint: bool,
}

impl DragOver {
    /// Hovering the upper half of a card
    pub fn above(id: impl Into<MatchId>) -> Self {
        Self {
            target: DropTarget::Match(id.into()),
            below_midpoint: false,
        }
    }

    /// Hovering the lower half of a card
    pub fn below(id: impl Into<MatchId>) -> Self {
        Self {
            target: DropTarget::Match(id.into()),
            below_midpoint: true,
        }
    }

    /// Hovering a lane's empty area
    pub fn column(key: ColumnKey) -> Self {
        Self {
            target: DropTarget::Column(key),
            below_midpoint: false,
        }
    }
}
