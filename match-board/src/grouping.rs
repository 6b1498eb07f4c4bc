//! Partition matches into lanes and apply the persisted card order

use crate::order::OrderRecord;
use crate::types::{ColumnKey, ColumnLayout, Match, MatchId};
use std::collections::{BTreeMap, HashMap};

/// Group matches by lane. Every lane is present, even when empty; input
/// order is kept within a lane.
pub fn group_by_column(items: &[Match]) -> BTreeMap<ColumnKey, Vec<&Match>> {
    let mut columns: BTreeMap<ColumnKey, Vec<&Match>> =
        ColumnKey::ALL.into_iter().map(|key| (key, Vec::new())).collect();
    for item in items {
        columns.entry(item.column()).or_default().push(item);
    }
    columns
}

/// Order matches by their position in `order_ids`.
///
/// The sort is stable: matches missing from `order_ids` go after every
/// ordered match and keep their relative input order, so new arrivals show
/// up at the bottom of their lane.
pub fn sort_by_order<'a>(mut items: Vec<&'a Match>, order_ids: &[MatchId]) -> Vec<&'a Match> {
    let rank: HashMap<&MatchId, usize> = order_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();
    items.sort_by_key(|item| rank.get(&item.id).copied().unwrap_or(usize::MAX));
    items
}

/// Authoritative layout: matches grouped by status, ordered by the record
pub fn arrange(items: &[Match], record: &OrderRecord) -> ColumnLayout {
    ColumnLayout::from_columns(group_by_column(items).into_iter().map(|(key, matches)| {
        let ids = sort_by_order(matches, record.column(key))
            .into_iter()
            .map(|m| m.id.clone())
            .collect();
        (key, ids)
    }))
}
