//! ColumnLayout: ordered match ids per lane

use super::column::ColumnKey;
use super::ids::MatchId;
use std::sync::Arc;

/// Ordered match ids for every lane.
///
/// Each lane is an immutable shared list. Deriving a new layout copies only
/// the lanes that change; the rest are shared with the source, so two
/// layouts can be compared lane by lane with [`ColumnLayout::shares_column`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: [Arc<Vec<MatchId>>; ColumnKey::COUNT],
}

impl ColumnLayout {
    /// Build a layout from per-lane id lists. Lanes not mentioned are empty.
    pub fn from_columns(columns: impl IntoIterator<Item = (ColumnKey, Vec<MatchId>)>) -> Self {
        let mut layout = Self::default();
        for (key, ids) in columns {
            layout.columns[key.index()] = Arc::new(ids);
        }
        layout
    }

    /// Ids in one lane, in render order
    pub fn column(&self, key: ColumnKey) -> &[MatchId] {
        &self.columns[key.index()]
    }

    /// Lanes in display order
    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, &[MatchId])> {
        ColumnKey::ALL
            .into_iter()
            .map(move |key| (key, self.column(key)))
    }

    /// True when both layouts hold the very same list for `key`
    pub fn shares_column(&self, other: &ColumnLayout, key: ColumnKey) -> bool {
        Arc::ptr_eq(&self.columns[key.index()], &other.columns[key.index()])
    }

    /// Lane and index of a match
    pub fn locate(&self, id: &MatchId) -> Option<(ColumnKey, usize)> {
        self.iter().find_map(|(key, ids)| {
            ids.iter().position(|candidate| candidate == id).map(|i| (key, i))
        })
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.locate(id).is_some()
    }

    /// Total number of ids across lanes
    pub fn len(&self) -> usize {
        self.columns.iter().map(|ids| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|ids| ids.is_empty())
    }

    /// A copy with one lane replaced
    pub fn with_column(&self, key: ColumnKey, ids: Vec<MatchId>) -> Self {
        let mut next = self.clone();
        next.columns[key.index()] = Arc::new(ids);
        next
    }

    /// A copy without `id`. Returns a clone sharing every lane when absent.
    pub fn without(&self, id: &MatchId) -> Self {
        match self.locate(id) {
            Some((key, index)) => {
                let mut ids = self.column(key).to_vec();
                ids.remove(index);
                self.with_column(key, ids)
            }
            None => self.clone(),
        }
    }

    /// A copy with `id` moved to `to_column` at `to_index` (clamped)
    pub fn moved(&self, id: &MatchId, to_column: ColumnKey, to_index: usize) -> Self {
        let mut next = self.without(id);
        let mut ids = next.column(to_column).to_vec();
        ids.insert(to_index.min(ids.len()), id.clone());
        next.columns[to_column.index()] = Arc::new(ids);
        next
    }
}
