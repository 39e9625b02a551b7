/// The draw bag: an exhaustible randomized queue over the record store.
///
/// A refill loads a uniform permutation of every record, so one cycle of
/// the bag shows each record exactly once. Randomization keeps the draw
/// order free of any pattern the user could anticipate or find monotonous.
use std::collections::VecDeque;

use rand::seq::SliceRandom;

use crate::constants::REFILL_THRESHOLD;
use crate::store::RecordStore;
use crate::types::FilmId;

pub struct DrawBag {
    queue: VecDeque<FilmId>,
    cycles: usize,
}

impl DrawBag {
    /// Create a bag holding a fresh permutation of the store. Counts as
    /// cycle 1.
    pub fn new(store: &RecordStore) -> Self {
        let mut bag = DrawBag {
            queue: VecDeque::with_capacity(store.len()),
            cycles: 0,
        };
        bag.refill(store);
        bag
    }

    /// Records remaining in the current cycle.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    /// Number of refills so far, for progress reporting.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Remove and return the front record, or `None` on an empty bag.
    pub fn draw(&mut self) -> Option<FilmId> {
        self.queue.pop_front()
    }

    /// Return records held aside by the selector's uniqueness pass, in
    /// their held order, to the back of the queue.
    pub(crate) fn return_held(&mut self, held: Vec<FilmId>) {
        self.queue.extend(held);
    }

    /// Load a fresh uniform permutation of every record in the store.
    ///
    /// Anything still queued is dropped first: a leftover record stays out
    /// of the new cycle's front so it cannot headline two batches in a
    /// row, and the bag is again a permutation with each record exactly
    /// once.
    pub fn refill(&mut self, store: &RecordStore) {
        self.queue.clear();
        let mut ids: Vec<FilmId> = store.ids().collect();
        ids.shuffle(&mut rand::rng());
        self.queue.extend(ids);
        self.cycles += 1;
    }

    /// Refill when the remaining size has dropped below the threshold.
    /// Returns whether a refill happened.
    pub fn refill_if_low(&mut self, store: &RecordStore) -> bool {
        if self.queue.len() >= REFILL_THRESHOLD {
            return false;
        }
        self.refill(store);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Film;

    fn store_of(n: usize) -> RecordStore {
        let films = (0..n)
            .map(|i| Film {
                date: "2024-01-01".to_string(),
                name: format!("Film {i}"),
                year: 2000,
                uri: format!("https://boxd.it/{i}"),
                rating: 3.0,
            })
            .collect();
        RecordStore::new(films)
    }

    #[test]
    fn test_refill_is_a_permutation() {
        let store = store_of(20);
        let mut bag = DrawBag::new(&store);

        let mut drawn: Vec<FilmId> = Vec::new();
        while let Some(id) = bag.draw() {
            drawn.push(id);
        }
        drawn.sort_unstable();
        assert_eq!(drawn, store.ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_refill_after_leftover_is_still_exactly_once() {
        let store = store_of(7);
        let mut bag = DrawBag::new(&store);

        // Draw down to a single leftover, then trigger the low-size refill.
        for _ in 0..6 {
            bag.draw();
        }
        assert_eq!(bag.size(), 1);
        assert!(bag.refill_if_low(&store));

        let mut drawn: Vec<FilmId> = Vec::new();
        while let Some(id) = bag.draw() {
            drawn.push(id);
        }
        drawn.sort_unstable();
        assert_eq!(drawn, store.ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_cycle_count_is_monotonic() {
        let store = store_of(3);
        let mut bag = DrawBag::new(&store);
        assert_eq!(bag.cycles(), 1);

        bag.refill(&store);
        bag.refill(&store);
        assert_eq!(bag.cycles(), 3);
    }

    #[test]
    fn test_no_refill_at_or_above_threshold() {
        let store = store_of(5);
        let mut bag = DrawBag::new(&store);
        for _ in 0..3 {
            bag.draw();
        }
        assert_eq!(bag.size(), 2);
        assert!(!bag.refill_if_low(&store));
        assert_eq!(bag.cycles(), 1);
    }

    #[test]
    fn test_empty_bag_refills() {
        let store = store_of(4);
        let mut bag = DrawBag::new(&store);
        while bag.draw().is_some() {}
        assert!(bag.refill_if_low(&store));
        assert_eq!(bag.size(), 4);
        assert_eq!(bag.cycles(), 2);
    }

    #[test]
    fn test_draw_on_empty_is_none() {
        let store = store_of(1);
        let mut bag = DrawBag::new(&store);
        assert_eq!(bag.draw(), Some(0));
        assert_eq!(bag.draw(), None);
    }
}
