/// Owning container for the session's rating records.
///
/// The store is loaded once per session and exclusively owned by it. The
/// bag, selector, and reconciler only see `FilmId` handles; the two
/// mutation points are `set_rating` (driven by reconciliation) and `push`
/// (the session seed record), which keeps the exactly-once-mutation
/// property easy to audit.
use crate::types::{Film, FilmId};

pub struct RecordStore {
    films: Vec<Film>,
}

impl RecordStore {
    pub fn new(films: Vec<Film>) -> Self {
        RecordStore { films }
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    /// Borrow a record. Panics on a handle that was never issued.
    pub fn get(&self, id: FilmId) -> &Film {
        &self.films[id]
    }

    /// All records in load order.
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    /// Handles for every record, in load order.
    pub fn ids(&self) -> std::ops::Range<FilmId> {
        0..self.films.len()
    }

    pub fn set_rating(&mut self, id: FilmId, rating: f64) {
        self.films[id].rating = rating;
    }

    /// Append a record added mid-session and return its handle.
    pub fn push(&mut self, film: Film) -> FilmId {
        self.films.push(film);
        self.films.len() - 1
    }
}
