/// Batch selection: pull a round's worth of records out of the bag.
///
/// Two passes. The uniqueness pass skips records whose rating already
/// appears in the batch (held aside, not discarded) so the user is not
/// asked to compare visually tied scores. If the bag runs dry before the
/// batch is full, the held records go back and the fill pass draws
/// unconditionally — duplicates are only permitted when the remaining
/// pool cannot avoid them.
use std::collections::HashSet;

use crate::bag::DrawBag;
use crate::store::RecordStore;
use crate::types::{rating_key, FilmId};

/// Select up to `n` records for one comparison round.
///
/// A session seed record (one added mid-session, never drawn from the
/// bag) takes the first slot unconditionally; it is the caller's job to
/// pass it at most once. The result is sorted ascending by rating so the
/// presentation order is stable regardless of draw order.
pub fn select_batch(
    store: &RecordStore,
    bag: &mut DrawBag,
    n: usize,
    seed: Option<FilmId>,
) -> Vec<FilmId> {
    let available = bag.size() + usize::from(seed.is_some());
    let target = n.min(available);

    let mut selected: Vec<FilmId> = Vec::with_capacity(target);
    let mut used_ratings: HashSet<i32> = HashSet::with_capacity(target);

    if let Some(id) = seed {
        used_ratings.insert(rating_key(store.get(id).rating));
        selected.push(id);
    }

    // Uniqueness pass.
    let mut held: Vec<FilmId> = Vec::new();
    while selected.len() < target {
        let Some(id) = bag.draw() else { break };
        if seed == Some(id) {
            // A stray copy of the seed leaves the cycle rather than
            // entering the batch twice.
            continue;
        }
        if used_ratings.insert(rating_key(store.get(id).rating)) {
            selected.push(id);
        } else {
            held.push(id);
        }
    }

    bag.return_held(held);

    // Fill pass.
    while selected.len() < target {
        match bag.draw() {
            Some(id) if seed == Some(id) => continue,
            Some(id) => selected.push(id),
            None => break,
        }
    }

    selected.sort_by(|&a, &b| {
        store
            .get(a)
            .rating
            .partial_cmp(&store.get(b).rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BATCH_SIZE;
    use crate::types::Film;

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

    #[test]
    fn test_batch_size_is_min_of_n_and_bag() {
        let store = store_with_ratings(&[1.0, 2.0, 3.0]);
        let mut bag = DrawBag::new(&store);
        let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);
        assert_eq!(batch.len(), 3);
        assert_eq!(bag.size(), 0);
    }

    #[test]
    fn test_full_batch_leaves_rest_in_bag() {
        let store = store_with_ratings(&[0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0]);
        let mut bag = DrawBag::new(&store);
        let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);
        assert_eq!(batch.len(), BATCH_SIZE);
        assert_eq!(bag.size(), 3);
    }

    #[test]
    fn test_unique_ratings_when_pool_allows() {
        // 5 distinct ratings plus duplicates: the batch must end up with
        // pairwise-distinct ratings.
        let store = store_with_ratings(&[3.0, 3.0, 3.0, 1.0, 2.0, 4.0, 5.0, 4.0]);
        let mut bag = DrawBag::new(&store);
        let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);

        assert_eq!(batch.len(), BATCH_SIZE);
        let keys: HashSet<i32> = batch
            .iter()
            .map(|&id| rating_key(store.get(id).rating))
            .collect();
        assert_eq!(keys.len(), BATCH_SIZE);
    }

    #[test]
    fn test_duplicates_allowed_when_unavoidable() {
        let store = store_with_ratings(&[3.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
        let mut bag = DrawBag::new(&store);
        let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);
        assert_eq!(batch.len(), BATCH_SIZE);
    }

    #[test]
    fn test_held_records_are_not_lost() {
        // Drain the store through repeated batches within one cycle: every
        // record must be seen exactly once.
        let store = store_with_ratings(&[2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0]);
        let mut bag = DrawBag::new(&store);

        let mut seen: Vec<FilmId> = Vec::new();
        while bag.size() > 0 {
            seen.extend(select_batch(&store, &mut bag, BATCH_SIZE, None));
        }
        seen.sort_unstable();
        assert_eq!(seen, store.ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_sorted_ascending_by_rating() {
        let store = store_with_ratings(&[4.5, 1.0, 3.0, 2.5, 5.0]);
        let mut bag = DrawBag::new(&store);
        let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);

        let ratings: Vec<f64> = batch.iter().map(|&id| store.get(id).rating).collect();
        let mut sorted = ratings.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ratings, sorted);
    }

    #[test]
    fn test_seed_takes_a_slot() {
        let mut store = store_with_ratings(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut bag = DrawBag::new(&store);
        let seed = store.push(Film {
            date: "2024-06-01".to_string(),
            name: "New Film".to_string(),
            year: 2024,
            uri: "https://boxd.it/new".to_string(),
            rating: 3.5,
        });

        let batch = select_batch(&store, &mut bag, BATCH_SIZE, Some(seed));
        assert_eq!(batch.len(), BATCH_SIZE);
        assert_eq!(batch.iter().filter(|&&id| id == seed).count(), 1);
        // Four slots came from the bag.
        assert_eq!(bag.size(), 1);
    }

    #[test]
    fn test_seed_alone_with_tiny_bag() {
        let mut store = store_with_ratings(&[2.0]);
        let mut bag = DrawBag::new(&store);
        let seed = store.push(Film {
            date: "2024-06-01".to_string(),
            name: "New Film".to_string(),
            year: 2024,
            uri: "https://boxd.it/new".to_string(),
            rating: 2.0,
        });

        let batch = select_batch(&store, &mut bag, BATCH_SIZE, Some(seed));
        assert_eq!(batch.len(), 2);
        assert!(batch.contains(&seed));
    }
}
