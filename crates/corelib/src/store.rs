//! Per-node record store: an LWW-timestamped map from key to value/tombstone.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A stored value or tombstone, timestamped for last-write-wins arbitration.
///
/// Invariants: `tombstone` implies `value.is_none()`; `!tombstone` implies
/// `value.is_some()`; `ts >= 0.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub value: Option<String>,
    pub ts: f64,
    pub tombstone: bool,
}

impl Record {
    pub fn value(value: String, ts: f64) -> Self {
        Self {
            value: Some(value),
            ts,
            tombstone: false,
        }
    }

    pub fn tombstone(ts: f64) -> Self {
        Self {
            value: None,
            ts,
            tombstone: true,
        }
    }

    /// The canonical "key never seen" reply used by `/internal/replica/get`:
    /// a tombstone at `ts=0.0`. A real write or delete always has a strictly
    /// positive `ts` and therefore dominates this under LWW.
    pub fn absent() -> Self {
        Self::tombstone(0.0)
    }
}

/// Per-node in-memory key-value store.
///
/// Every mutation is unconditional: `put`/`delete` overwrite whatever was at
/// `key` regardless of the incoming `ts`. A stricter store would compare
/// against the existing record with `newer` before writing, rejecting
/// out-of-order replica writes; this one doesn't, so a late-arriving stale
/// write can clobber a fresher one until the next read reconciles via LWW.
/// That's a deliberate choice carried over from the reference design, not an
/// oversight. See the design notes on store semantics.
#[derive(Default)]
pub struct Store {
    data: DashMap<String, Record>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Store `(Some(value), ts, tombstone=false)` at `key`, unconditionally.
    pub fn put(&self, key: &str, value: String, ts: f64) -> Record {
        let record = Record::value(value, ts);
        self.data.insert(key.to_string(), record.clone());
        record
    }

    /// Store `(None, ts, tombstone=true)` at `key`, unconditionally.
    pub fn delete(&self, key: &str, ts: f64) -> Record {
        let record = Record::tombstone(ts);
        self.data.insert(key.to_string(), record.clone());
        record
    }

    /// The current record at `key`, or `None` if it was never written.
    pub fn get(&self, key: &str) -> Option<Record> {
        self.data.get(key).map(|r| r.clone())
    }

    /// LWW arbitration between two optional records: the one with the larger
    /// `ts` wins; ties resolve to `a`; `None` is treated as oldest.
    pub fn newer(a: Option<Record>, b: Option<Record>) -> Option<Record> {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => {
                if a.ts >= b.ts {
                    Some(a)
                } else {
                    Some(b)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let store = Store::new();
        store.put("k", "v".to_string(), 10.0);
        let rec = store.get("k").unwrap();
        assert_eq!(rec.value, Some("v".to_string()));
        assert_eq!(rec.ts, 10.0);
        assert!(!rec.tombstone);
    }

    #[test]
    fn delete_then_get_is_a_tombstone() {
        let store = Store::new();
        store.put("k", "v".to_string(), 10.0);
        store.delete("k", 20.0);
        let rec = store.get("k").unwrap();
        assert_eq!(rec.value, None);
        assert_eq!(rec.ts, 20.0);
        assert!(rec.tombstone);
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let store = Store::new();
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn newer_picks_larger_timestamp() {
        let a = Some(Record::value("a".into(), 5.0));
        let b = Some(Record::value("b".into(), 10.0));
        assert_eq!(Store::newer(a, b).unwrap().value, Some("b".to_string()));
    }

    #[test]
    fn newer_ties_favor_first_argument() {
        let a = Some(Record::value("a".into(), 5.0));
        let b = Some(Record::value("b".into(), 5.0));
        assert_eq!(Store::newer(a, b).unwrap().value, Some("a".to_string()));
    }

    #[test]
    fn newer_treats_none_as_oldest() {
        let a: Option<Record> = None;
        let b = Some(Record::value("b".into(), 1.0));
        assert_eq!(Store::newer(a.clone(), b.clone()), b);
        assert_eq!(Store::newer(b.clone(), a), b);
    }

    #[test]
    fn newer_tombstone_beats_older_value() {
        let value = Some(Record::value("v".into(), 1.0));
        let tomb = Some(Record::tombstone(2.0));
        let winner = Store::newer(value, tomb).unwrap();
        assert!(winner.tombstone);
    }

    #[test]
    fn write_overwrites_unconditionally_even_if_older() {
        let store = Store::new();
        store.put("k", "fresh".to_string(), 100.0);
        // A stale write still clobbers the fresher record: no write-time
        // arbitration (see module docs).
        store.put("k", "stale".to_string(), 1.0);
        assert_eq!(store.get("k").unwrap().value, Some("stale".to_string()));
    }
}
