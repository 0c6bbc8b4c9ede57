//! [`Table`]: in-memory rows keyed by an auto-incrementing integer id.
//!
//! Reads go through an [`ArcSwap`] snapshot and never block; inserts copy the
//! current map and swap the new one in.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use arc_swap::ArcSwap;
use lookup::{Queryset, QuerysetError};
use serde_json::Value;

/// Shared, lock-free table of `T` rows.
#[derive(Debug)]
pub struct Table<T> {
    rows: Arc<ArcSwap<BTreeMap<u64, T>>>,
    next_id: Arc<AtomicU64>,
}

// Manual impl: deriving would demand `T: Clone`.
impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Clone> Table<T> {
    /// Create an empty table whose first id is 1.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(ArcSwap::from_pointee(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Allocate an id, build the row with it, and store the row.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = build(id);
        self.rows.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.insert(id, row.clone());
            next
        });
        row
    }

    /// All rows in id order.
    pub fn all(&self) -> Vec<T> {
        self.rows.load().values().cloned().collect()
    }

    pub fn find(&self, id: u64) -> Option<T> {
        self.rows.load().get(&id).cloned()
    }
}

impl<T: Clone> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Queryset for Table<T> {
    type Object = T;

    fn get(&self, pk: &Value) -> Result<T, QuerysetError> {
        let id = coerce_id(pk)?;
        self.find(id).ok_or(QuerysetError::DoesNotExist)
    }
}

/// Accept integer keys and their decimal string form. Rejection reasons
/// never echo the key.
fn coerce_id(pk: &Value) -> Result<u64, QuerysetError> {
    match pk {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| QuerysetError::InvalidKey("expected a non-negative integer id".into())),
        Value::String(s) => s
            .parse()
            .map_err(|_| QuerysetError::InvalidKey("expected a decimal id".into())),
        _ => Err(QuerysetError::InvalidKey("expected an integer id".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_start_at_one_and_increase() {
        let table: Table<(u64, &str)> = Table::new();
        assert_eq!(table.insert_with(|id| (id, "a")).0, 1);
        assert_eq!(table.insert_with(|id| (id, "b")).0, 2);
        assert_eq!(table.all(), vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn clones_share_rows() {
        let table: Table<u64> = Table::new();
        let view = table.clone();
        table.insert_with(|id| id);
        assert_eq!(view.find(1), Some(1));
    }

    #[test]
    fn get_coerces_keys() {
        let table: Table<u64> = Table::new();
        table.insert_with(|id| id * 10);
        assert_eq!(table.get(&json!(1)).unwrap(), 10);
        assert_eq!(table.get(&json!("1")).unwrap(), 10);
        assert!(matches!(table.get(&json!(2)), Err(QuerysetError::DoesNotExist)));
    }

    #[test]
    fn get_rejects_non_integer_keys() {
        let table: Table<u64> = Table::new();
        for bad in [json!(-1), json!(1.5), json!("abc"), json!(null), json!([1])] {
            assert!(
                matches!(table.get(&bad), Err(QuerysetError::InvalidKey(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn invalid_key_reason_omits_key() {
        let table: Table<u64> = Table::new();
        for bad in [json!(-987654), json!(3.25), json!("secret-key")] {
            let Err(QuerysetError::InvalidKey(reason)) = table.get(&bad) else {
                panic!("expected InvalidKey for {bad}");
            };
            let raw = bad.as_str().map(str::to_owned).unwrap_or_else(|| bad.to_string());
            assert!(!reason.contains(&raw), "{reason}");
        }
    }
}
