//! OrderRecord: a user's manual card order per lane

use crate::types::{ColumnKey, Match, MatchId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Manual order of match ids per lane.
///
/// The system of record only tracks status, so this is the only place card
/// order lives. An id is listed at most once across all lanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord {
    columns: BTreeMap<ColumnKey, Vec<MatchId>>,
}

impl Default for OrderRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderRecord {
    /// A record with every lane present and empty
    pub fn new() -> Self {
        Self {
            columns: ColumnKey::ALL.into_iter().map(|key| (key, Vec::new())).collect(),
        }
    }

    /// Ordered ids for one lane
    pub fn column(&self, key: ColumnKey) -> &[MatchId] {
        self.columns.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lanes in display order
    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, &[MatchId])> {
        ColumnKey::ALL
            .into_iter()
            .map(move |key| (key, self.column(key)))
    }

    /// Lane an id is listed in
    pub fn column_of(&self, id: &MatchId) -> Option<ColumnKey> {
        self.iter()
            .find(|(_, ids)| ids.contains(id))
            .map(|(key, _)| key)
    }

    /// Add an empty list for every lane that has none
    pub(crate) fn reconcile_columns(&mut self) {
        for key in ColumnKey::ALL {
            self.columns.entry(key).or_default();
        }
    }

    /// Bring the record in line with the live match set.
    ///
    /// Afterwards every lane has a list, every listed id is live, and every
    /// live id is listed exactly once. Unlisted matches are appended to the
    /// lane for their status in input order. Returns whether anything changed.
    pub fn reconcile(&mut self, items: &[Match]) -> bool {
        let live: HashSet<&MatchId> = items.iter().map(|m| &m.id).collect();
        let before = self.columns.clone();

        let mut listed: HashSet<MatchId> = HashSet::with_capacity(items.len());
        for key in ColumnKey::ALL {
            let ids = self.columns.entry(key).or_default();
            ids.retain(|id| live.contains(id) && listed.insert(id.clone()));
        }

        for item in items {
            if listed.insert(item.id.clone()) {
                self.columns
                    .entry(item.column())
                    .or_default()
                    .push(item.id.clone());
            }
        }

        self.columns != before
    }

    /// Replace one lane's order. The given ids are removed from every other lane.
    pub fn set_column(&mut self, key: ColumnKey, ids: &[MatchId]) {
        let incoming: HashSet<&MatchId> = ids.iter().collect();
        for (other, listed) in self.columns.iter_mut() {
            if *other != key {
                listed.retain(|id| !incoming.contains(id));
            }
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let deduped = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();
        self.columns.insert(key, deduped);
    }

    /// Move an id into `to_column` at `to_index` (clamped), removing it
    /// from wherever it was listed.
    pub fn apply_move(&mut self, id: &MatchId, to_column: ColumnKey, to_index: usize) {
        for listed in self.columns.values_mut() {
            listed.retain(|candidate| candidate != id);
        }
        let target = self.columns.entry(to_column).or_default();
        let index = to_index.min(target.len());
        target.insert(index, id.clone());
    }

    /// Remove an id from every lane. Returns whether it was listed.
    pub fn remove(&mut self, id: &MatchId) -> bool {
        let mut removed = false;
        for listed in self.columns.values_mut() {
            let len = listed.len();
            listed.retain(|candidate| candidate != id);
            removed |= listed.len() != len;
        }
        removed
    }

    /// Total number of listed ids
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<MatchId> {
        names.iter().map(|s| MatchId::from(*s)).collect()
    }

    fn item(id: &str, status: &str) -> Match {
        Match::new(id, "g1", status)
    }

    fn assert_partition(record: &OrderRecord, items: &[Match]) {
        let mut seen = HashSet::new();
        for (_, listed) in record.iter() {
            for id in listed {
                assert!(seen.insert(id.clone()), "{} listed twice", id);
                assert!(items.iter().any(|m| &m.id == id), "{} is stale", id);
            }
        }
        for m in items {
            assert!(seen.contains(&m.id), "{} is not listed", m.id);
        }
    }

    #[test]
    fn test_new_has_every_column() {
        let record = OrderRecord::new();
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ColumnKey::ALL.to_vec());
        assert!(record.is_empty());
    }

    #[test]
    fn test_reconcile_appends_unlisted_by_status() {
        let items = vec![
            item("a", "new"),
            item("b", "offer"),
            item("c", "new"),
            item("d", "mystery"),
        ];
        let mut record = OrderRecord::new();

        assert!(record.reconcile(&items));
        assert_eq!(record.column(ColumnKey::New), ids(&["a", "c", "d"]).as_slice());
        assert_eq!(record.column(ColumnKey::Offer), ids(&["b"]).as_slice());
        assert_partition(&record, &items);
    }

    #[test]
    fn test_reconcile_prunes_stale_and_keeps_order() {
        let mut record = OrderRecord::new();
        record.set_column(ColumnKey::Applied, &ids(&["x", "gone", "y"]));

        let items = vec![item("y", "applied"), item("x", "applied"), item("z", "applied")];
        record.reconcile(&items);

        assert_eq!(
            record.column(ColumnKey::Applied),
            ids(&["x", "y", "z"]).as_slice()
        );
        assert_partition(&record, &items);
    }

    #[test]
    fn test_reconcile_collapses_duplicates() {
        let mut record: OrderRecord = serde_json::from_str(
            r#"{"new":["a","b","a"],"applied":["b"],"interviewing":[],"offer":[],"closed":[]}"#,
        )
        .unwrap();
        let items = vec![item("a", "new"), item("b", "applied")];

        record.reconcile(&items);
        assert_eq!(record.column(ColumnKey::New), ids(&["a", "b"]).as_slice());
        assert!(record.column(ColumnKey::Applied).is_empty());
        assert_partition(&record, &items);
    }

    #[test]
    fn test_reconcile_fills_missing_columns() {
        let mut record: OrderRecord = serde_json::from_str(r#"{"offer":["a"]}"#).unwrap();
        record.reconcile(&[item("a", "offer")]);
        assert_eq!(record.iter().count(), ColumnKey::COUNT);
        assert_eq!(record, {
            let mut expected = OrderRecord::new();
            expected.set_column(ColumnKey::Offer, &ids(&["a"]));
            expected
        });
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let items = vec![
            item("a", "closed"),
            item("b", "interviewing"),
            item("c", "???"),
            item("d", "interviewing"),
        ];
        let mut record = OrderRecord::new();
        record.set_column(ColumnKey::Interviewing, &ids(&["d", "stale", "b"]));

        record.reconcile(&items);
        let once = record.clone();
        assert!(!record.reconcile(&items));
        assert_eq!(record, once);
    }

    #[test]
    fn test_set_column_moves_ids_out_of_other_columns() {
        let mut record = OrderRecord::new();
        record.set_column(ColumnKey::New, &ids(&["a", "b"]));
        record.set_column(ColumnKey::Offer, &ids(&["b", "c", "c"]));

        assert_eq!(record.column(ColumnKey::New), ids(&["a"]).as_slice());
        assert_eq!(record.column(ColumnKey::Offer), ids(&["b", "c"]).as_slice());
    }

    #[test]
    fn test_apply_move_clamps_index() {
        let mut record = OrderRecord::new();
        record.set_column(ColumnKey::New, &ids(&["a", "x"]));
        record.set_column(ColumnKey::Offer, &ids(&["b"]));

        record.apply_move(&"x".into(), ColumnKey::Offer, 99);
        assert_eq!(record.column(ColumnKey::New), ids(&["a"]).as_slice());
        assert_eq!(record.column(ColumnKey::Offer), ids(&["b", "x"]).as_slice());
        assert_eq!(record.column_of(&"x".into()), Some(ColumnKey::Offer));
    }

    #[test]
    fn test_remove() {
        let mut record = OrderRecord::new();
        record.set_column(ColumnKey::New, &ids(&["a", "b"]));
        assert!(record.remove(&"a".into()));
        assert!(!record.remove(&"a".into()));
        assert_eq!(record.len(), 1);
    }
}
