use std::collections::HashSet;
use tracing::info;

use super::{utils::parse_number, KeyColumns, Record};

/// Observation number as it orders: integers numerically, then any
/// non-numeric values as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberKey<'a> {
    Numeric(i64),
    Text(&'a str),
}

impl<'a> NumberKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match parse_number(raw) {
            Some(n) => NumberKey::Numeric(n),
            None => NumberKey::Text(raw),
        }
    }
}

/// Observation timestamp as it orders: recorded values as strings, blank
/// ones after every recorded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey<'a> {
    Recorded(&'a str),
    Missing,
}

impl<'a> TimeKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.trim().is_empty() {
            TimeKey::Missing
        } else {
            TimeKey::Recorded(raw)
        }
    }
}

/// Composite sort key. Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowKey<'a> {
    pub sid: &'a str,
    pub number: NumberKey<'a>,
    pub time: TimeKey<'a>,
}

impl<'a> RowKey<'a> {
    pub fn of(record: &'a Record, keys: &KeyColumns) -> Self {
        Self {
            sid: &record.fields[keys.sid],
            number: NumberKey::parse(&record.fields[keys.number]),
            time: TimeKey::parse(&record.fields[keys.time]),
        }
    }
}

/// Stable sort by storm id, then observation number, then timestamp.
pub fn sort_records(records: &mut [Record], keys: &KeyColumns) {
    records.sort_by(|a, b| RowKey::of(a, keys).cmp(&RowKey::of(b, keys)));
}

/// Keep the first record for every (storm id, number) pair, in input order.
/// Run after [`sort_records`] this keeps the earliest timestamp per pair.
pub fn dedup_first(records: Vec<Record>, keys: &KeyColumns) -> Vec<Record> {
    let keep: Vec<bool> = {
        let mut seen: HashSet<(&str, NumberKey<'_>)> = HashSet::with_capacity(records.len());
        records
            .iter()
            .map(|r| {
                let key = RowKey::of(r, keys);
                seen.insert((key.sid, key.number))
            })
            .collect()
    };

    let before = records.len();
    let out: Vec<Record> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect();

    info!(
        before,
        after = out.len(),
        "kept first observation per (SID, NUMBER)"
    );
    out
}
