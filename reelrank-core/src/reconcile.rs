/// Rating reconciliation: redistribute a batch's rating values according
/// to a user-submitted order.
///
/// The batch's existing values, sorted descending, are reassigned to the
/// records in the submitted order. The multiset of rating values in the
/// batch is invariant across the call — one round can promote an
/// under-rated film and demote an over-rated one without inflating or
/// deflating the catalog's overall distribution.
use thiserror::Error;

use crate::store::RecordStore;
use crate::types::FilmId;

/// Rejection reasons for a submitted ranking. The store is never touched
/// when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("ranking names {got} positions but the batch has {expected}")]
    WrongLength { expected: usize, got: usize },
    #[error("position {position} is out of range for a batch of {len}")]
    OutOfRange { position: usize, len: usize },
    #[error("position {position} appears more than once")]
    DuplicatePosition { position: usize },
}

/// Apply `ranking` to `batch`, permuting which record holds which of the
/// batch's existing rating values.
///
/// `ranking[i]` is the batch index of the record the user placed at
/// position `i`, best first. Ties among the extracted values mean two
/// compared films may legitimately share a rating afterwards. Validation
/// happens up front; a malformed ranking mutates nothing.
pub fn reconcile(
    store: &mut RecordStore,
    batch: &[FilmId],
    ranking: &[usize],
) -> Result<(), RankingError> {
    validate_ranking(ranking, batch.len())?;

    let mut values: Vec<f64> = batch.iter().map(|&id| store.get(id).rating).collect();
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    for (new_pos, &old_pos) in ranking.iter().enumerate() {
        store.set_rating(batch[old_pos], values[new_pos]);
    }
    Ok(())
}

fn validate_ranking(ranking: &[usize], len: usize) -> Result<(), RankingError> {
    if ranking.len() != len {
        return Err(RankingError::WrongLength {
            expected: len,
            got: ranking.len(),
        });
    }
    let mut seen = vec![false; len];
    for &pos in ranking {
        if pos >= len {
            return Err(RankingError::OutOfRange { position: pos, len });
        }
        if seen[pos] {
            return Err(RankingError::DuplicatePosition { position: pos });
        }
        seen[pos] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{rating_key, Film};

    fn store_with_ratings(ratings: &[f64]) -> RecordStore {
        let films = ratings
            .iter()
            .enumerate()
            .map(|(i, &rating)| Film {
                date: "2024-01-01".to_string(),
                name: format!("Film {i}"),
                year: 2000,
                uri: format!("https://boxd.it/{i}"),
                rating,
            })
            .collect();
        RecordStore::new(films)
    }

    fn rating_multiset(store: &RecordStore, batch: &[FilmId]) -> Vec<i32> {
        let mut keys: Vec<i32> = batch
            .iter()
            .map(|&id| rating_key(store.get(id).rating))
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_reconcile_moves_values_not_records() {
        // Batch in ascending display order: 1.0, 2.0, 3.0.
        let mut store = store_with_ratings(&[1.0, 2.0, 3.0]);
        let batch = vec![0, 1, 2];

        // User says: batch[0] is best, then batch[2], then batch[1].
        reconcile(&mut store, &batch, &[0, 2, 1]).unwrap();

        assert_eq!(store.get(0).rating, 3.0);
        assert_eq!(store.get(2).rating, 2.0);
        assert_eq!(store.get(1).rating, 1.0);
    }

    #[test]
    fn test_rating_multiset_is_invariant() {
        let mut store = store_with_ratings(&[0.5, 3.5, 3.5, 4.0, 5.0]);
        let batch = vec![0, 1, 2, 3, 4];
        let before = rating_multiset(&store, &batch);

        reconcile(&mut store, &batch, &[4, 1, 3, 0, 2]).unwrap();

        assert_eq!(rating_multiset(&store, &batch), before);
    }

    #[test]
    fn test_monotone_in_submitted_order() {
        let mut store = store_with_ratings(&[2.0, 4.5, 1.0, 3.0]);
        let batch = vec![0, 1, 2, 3];
        let ranking = vec![2, 0, 3, 1];

        reconcile(&mut store, &batch, &ranking).unwrap();

        for window in ranking.windows(2) {
            let higher = store.get(batch[window[0]]).rating;
            let lower = store.get(batch[window[1]]).rating;
            assert!(higher >= lower);
        }
    }

    #[test]
    fn test_identity_ranking_is_a_noop() {
        // Batch sorted ascending; keeping that order means the last
        // displayed record is best.
        let mut store = store_with_ratings(&[1.5, 2.0, 4.0]);
        let batch = vec![0, 1, 2];

        reconcile(&mut store, &batch, &[2, 1, 0]).unwrap();

        assert_eq!(store.get(0).rating, 1.5);
        assert_eq!(store.get(1).rating, 2.0);
        assert_eq!(store.get(2).rating, 4.0);
    }

    #[test]
    fn test_ties_may_end_up_shared() {
        let mut store = store_with_ratings(&[3.0, 3.0]);
        let batch = vec![0, 1];

        reconcile(&mut store, &batch, &[1, 0]).unwrap();

        assert_eq!(store.get(0).rating, 3.0);
        assert_eq!(store.get(1).rating, 3.0);
    }

    #[test]
    fn test_malformed_rankings_mutate_nothing() {
        let mut store = store_with_ratings(&[1.0, 2.0, 3.0]);
        let batch = vec![0, 1, 2];

        assert_eq!(
            reconcile(&mut store, &batch, &[0, 1]),
            Err(RankingError::WrongLength { expected: 3, got: 2 })
        );
        assert_eq!(
            reconcile(&mut store, &batch, &[0, 1, 3]),
            Err(RankingError::OutOfRange { position: 3, len: 3 })
        );
        assert_eq!(
            reconcile(&mut store, &batch, &[0, 1, 1]),
            Err(RankingError::DuplicatePosition { position: 1 })
        );

        assert_eq!(store.get(0).rating, 1.0);
        assert_eq!(store.get(1).rating, 2.0);
        assert_eq!(store.get(2).rating, 3.0);
    }
}
