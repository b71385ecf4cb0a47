//! List reconciliation: the rules for folding incoming collections into the
//! ones already stored without creating duplicates.
//!
//! Three shapes exist. Unordered unique string sets (skills, achievements,
//! technologies) dedup case-insensitively. Keyed sequences (languages and the
//! structured sub-record lists) dedup on a natural key supplied by the caller:
//! entries matching an existing key are merged into it, everything else is
//! appended at the end in input order. The key function is the extension
//! point for smarter matching later; today all keys are exact,
//! case-insensitive tuples.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Adds each non-empty incoming string that is not already present under
/// case-insensitive comparison. Existing entries keep their original casing
/// and position. Returns whether anything was added.
pub fn merge_string_set(existing: &mut Vec<String>, incoming: &[String]) -> bool {
    let mut changed = false;
    for item in incoming {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if !existing.iter().any(|e| e.trim().eq_ignore_ascii_case(item)) {
            existing.push(item.to_string());
            changed = true;
        }
    }
    changed
}

/// Folds `incoming` into `existing` under `key_fn`. Incoming entries that
/// collide on a key within the batch are collapsed first, later entry winning
/// outright; the survivors then merge against `existing` via `merge_fn` on a
/// key match and append otherwise. Returns whether `existing` changed.
///
/// `key_fn` is expected to produce already-case-folded keys.
pub fn reconcile<T, K, KF, MF>(
    existing: &mut Vec<T>,
    incoming: Vec<T>,
    key_fn: KF,
    mut merge_fn: MF,
) -> bool
where
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    MF: FnMut(&mut T, T) -> bool,
{
    // Last-write-wins within the batch.
    let mut collapsed: Vec<T> = Vec::new();
    let mut batch_index: HashMap<K, usize> = HashMap::new();
    for item in incoming {
        match batch_index.entry(key_fn(&item)) {
            Entry::Occupied(slot) => collapsed[*slot.get()] = item,
            Entry::Vacant(slot) => {
                slot.insert(collapsed.len());
                collapsed.push(item);
            }
        }
    }

    let mut existing_index: HashMap<K, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, item)| (key_fn(item), i))
        .collect();

    let mut changed = false;
    for item in collapsed {
        match existing_index.entry(key_fn(&item)) {
            Entry::Occupied(slot) => {
                changed |= merge_fn(&mut existing[*slot.get()], item);
            }
            Entry::Vacant(slot) => {
                slot.insert(existing.len());
                existing.push(item);
                changed = true;
            }
        }
    }
    changed
}

/// Case-folds an optional string for use inside a natural key. Missing and
/// empty collapse to the same key component, mirroring how the extractor
/// reports absent fields.
pub fn key_part(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_set_dedups_case_insensitively() {
        let mut existing = vec![];
        let changed = merge_string_set(
            &mut existing,
            &["Go".to_string(), "go".to_string(), "GO".to_string()],
        );
        assert!(changed);
        assert_eq!(existing, vec!["Go"]);
    }

    #[test]
    fn test_string_set_existing_item_is_noop() {
        let mut existing = vec!["Rust".to_string()];
        let changed = merge_string_set(&mut existing, &["rust".to_string()]);
        assert!(!changed);
        assert_eq!(existing, vec!["Rust"]);
    }

    #[test]
    fn test_string_set_skips_blank_entries() {
        let mut existing = vec![];
        assert!(!merge_string_set(&mut existing, &["  ".to_string()]));
        assert!(existing.is_empty());
    }

    #[test]
    fn test_reconcile_appends_new_keys_in_order() {
        let mut existing = vec![("a", 1)];
        let changed = reconcile(
            &mut existing,
            vec![("b", 2), ("c", 3)],
            |(k, _)| *k,
            |e, i| {
                let changed = e.1 != i.1;
                e.1 = i.1;
                changed
            },
        );
        assert!(changed);
        assert_eq!(existing, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_reconcile_merges_matching_key_in_place() {
        let mut existing = vec![("a", 1), ("b", 2)];
        let changed = reconcile(
            &mut existing,
            vec![("a", 9)],
            |(k, _)| *k,
            |e, i| {
                let changed = e.1 != i.1;
                e.1 = i.1;
                changed
            },
        );
        assert!(changed);
        assert_eq!(existing, vec![("a", 9), ("b", 2)]);
    }

    #[test]
    fn test_reconcile_batch_collision_last_wins() {
        let mut existing: Vec<(&str, i32)> = vec![];
        reconcile(
            &mut existing,
            vec![("a", 1), ("a", 2)],
            |(k, _)| *k,
            |e, i| {
                let changed = e.1 != i.1;
                e.1 = i.1;
                changed
            },
        );
        assert_eq!(existing, vec![("a", 2)]);
    }

    #[test]
    fn test_reconcile_identical_batch_is_noop() {
        let mut existing = vec![("a", 1)];
        let changed = reconcile(
            &mut existing,
            vec![("a", 1)],
            |(k, _)| *k,
            |e, i| {
                let changed = e.1 != i.1;
                e.1 = i.1;
                changed
            },
        );
        assert!(!changed);
    }

    #[test]
    fn test_key_part_folds_missing_and_empty() {
        assert_eq!(key_part(&None), key_part(&Some("  ".to_string())));
        assert_eq!(key_part(&Some(" Acme ".to_string())), "acme");
    }
}
