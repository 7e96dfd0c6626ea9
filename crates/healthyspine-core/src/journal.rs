//! Sequence operations shared by every journal.
//!
//! All trackers persist their records as one JSON array per storage key, and
//! every tracker mutation is some combination of these three operations. The
//! key function and the merge strategy are injected by the caller: whether a
//! colliding write replaces the existing record (sleep, mood) or folds into
//! it (sitting) is the caller's decision, never inferred here.

/// Whether an upsert found an existing record for the key.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UpsertOutcome {
    Inserted,
    Merged,
}

/// Inserts `record`, or merges it into the existing record with an equal key.
///
/// Existing-vs-new is decided by key equality alone. A merged record keeps
/// its position; the sequence is kept sorted by key ascending, so a new key
/// lands at its rank.
pub fn upsert<R, K: Ord>(
    records: &mut Vec<R>,
    record: R,
    key_of: impl Fn(&R) -> K,
    merge: impl FnOnce(R, R) -> R,
) -> UpsertOutcome {
    let key = key_of(&record);
    if let Some(index) = records.iter().position(|existing| key_of(existing) == key) {
        let existing = records.remove(index);
        records.insert(index, merge(existing, record));
        UpsertOutcome::Merged
    } else {
        let index = records.partition_point(|existing| key_of(existing) < key);
        records.insert(index, record);
        UpsertOutcome::Inserted
    }
}

/// Merge strategy that discards the existing record. Last write wins.
#[must_use]
pub fn replace<R>(_existing: R, incoming: R) -> R {
    incoming
}

/// Updates the first record matching the predicate in place.
///
/// Returns whether a record matched; an absent record is a silent no-op.
pub fn mutate<R>(
    records: &mut [R],
    matches: impl Fn(&R) -> bool,
    update: impl FnOnce(&mut R),
) -> bool {
    if let Some(record) = records.iter_mut().find(|record| matches(record)) {
        update(record);
        true
    } else {
        false
    }
}

/// Removes the first record matching the predicate.
///
/// Returns whether a record matched; an absent record is a silent no-op.
pub fn remove<R>(records: &mut Vec<R>, matches: impl Fn(&R) -> bool) -> bool {
    match records.iter().position(|record| matches(record)) {
        Some(index) => {
            records.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, Eq, PartialEq)]
    struct Sample {
        key: u8,
        value: u16,
    }

    fn accumulate(existing: Sample, incoming: Sample) -> Sample {
        Sample {
            key: existing.key,
            value: existing.value + incoming.value,
        }
    }

    #[test]
    fn upsert_replaces_in_place_for_an_existing_key() {
        let mut records = vec![
            Sample { key: 1, value: 10 },
            Sample { key: 2, value: 20 },
            Sample { key: 3, value: 30 },
        ];
        let outcome = upsert(
            &mut records,
            Sample { key: 2, value: 99 },
            |record| record.key,
            replace,
        );
        assert_eq!(outcome, UpsertOutcome::Merged);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], Sample { key: 2, value: 99 });
    }

    #[test]
    fn upsert_inserts_a_new_key_at_its_rank() {
        let mut records = vec![Sample { key: 1, value: 10 }, Sample { key: 4, value: 40 }];
        let outcome = upsert(
            &mut records,
            Sample { key: 3, value: 30 },
            |record| record.key,
            replace,
        );
        assert_eq!(outcome, UpsertOutcome::Inserted);
        let keys: Vec<u8> = records.iter().map(|record| record.key).collect();
        assert_eq!(keys, vec![1, 3, 4]);
    }

    #[test]
    fn accumulating_merge_folds_durations_together() {
        let mut records = vec![Sample { key: 7, value: 150 }];
        upsert(
            &mut records,
            Sample { key: 7, value: 60 },
            |record| record.key,
            accumulate,
        );
        assert_eq!(records, vec![Sample { key: 7, value: 210 }]);
    }

    #[test]
    fn mutate_updates_only_the_matching_record() {
        let mut records = vec![Sample { key: 1, value: 10 }, Sample { key: 2, value: 20 }];
        let touched = mutate(
            &mut records,
            |record| record.key == 2,
            |record| record.value = 21,
        );
        assert!(touched);
        assert_eq!(records[0].value, 10);
        assert_eq!(records[1].value, 21);
    }

    #[test]
    fn mutate_of_an_absent_key_is_a_silent_no_op() {
        let mut records = vec![Sample { key: 1, value: 10 }];
        let touched = mutate(&mut records, |record| record.key == 9, |record| record.value = 0);
        assert!(!touched);
        assert_eq!(records, vec![Sample { key: 1, value: 10 }]);
    }

    #[test]
    fn remove_of_an_absent_key_is_a_silent_no_op() {
        let mut records = vec![Sample { key: 1, value: 10 }];
        assert!(remove(&mut records, |record| record.key == 1));
        assert!(!remove(&mut records, |record| record.key == 1));
        assert!(records.is_empty());
    }

    proptest! {
        #[test]
        fn property_upsert_keeps_one_record_per_key_and_last_write_wins(
            writes in proptest::collection::vec((0u8..16, any::<u16>()), 0..64)
        ) {
            let mut records: Vec<Sample> = Vec::new();
            for (key, value) in &writes {
                upsert(
                    &mut records,
                    Sample { key: *key, value: *value },
                    |record| record.key,
                    replace,
                );
            }

            let keys: Vec<u8> = records.iter().map(|record| record.key).collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(&keys, &sorted);

            for record in &records {
                let last = writes
                    .iter()
                    .rev()
                    .find(|(key, _)| *key == record.key)
                    .map(|(_, value)| *value);
                prop_assert_eq!(Some(record.value), last);
            }
        }

        #[test]
        fn property_accumulating_upsert_totals_every_write(
            writes in proptest::collection::vec((0u8..8, 0u16..512), 1..48)
        ) {
            let mut records: Vec<Sample> = Vec::new();
            for (key, value) in &writes {
                upsert(
                    &mut records,
                    Sample { key: *key, value: *value },
                    |record| record.key,
                    accumulate,
                );
            }

            for record in &records {
                let total: u16 = writes
                    .iter()
                    .filter(|(key, _)| *key == record.key)
                    .map(|(_, value)| *value)
                    .sum();
                prop_assert_eq!(record.value, total);
            }
        }
    }
}
