/// Session ledger: start-of-session snapshot and end-of-session change
/// detection.
///
/// The session state machine is carried by ownership. Constructing the
/// ledger is `begin`; `diff` is a pure read while the session is active;
/// `commit` consumes the ledger, so there is no way back to an active
/// session. An abandoned session simply drops the ledger — nothing is
/// ever written back from an uncommitted working copy.
use std::collections::HashMap;

use crate::store::RecordStore;
use crate::types::{rating_key, Film, FilmKey};

pub struct SessionLedger {
    baseline: HashMap<FilmKey, f64>,
}

impl SessionLedger {
    /// Snapshot `(name, year) -> rating` for every record, before any
    /// mutation.
    pub fn begin(store: &RecordStore) -> Self {
        let baseline = store
            .films()
            .iter()
            .map(|film| (film.key(), film.rating))
            .collect();
        SessionLedger { baseline }
    }

    /// The rating a film had when the session began, if it existed then.
    pub fn baseline_rating(&self, key: &FilmKey) -> Option<f64> {
        self.baseline.get(key).copied()
    }

    /// Records whose rating differs from the snapshot. A record whose key
    /// is absent from the snapshot was added mid-session and always
    /// counts as changed.
    pub fn diff<'a>(&self, store: &'a RecordStore) -> Vec<&'a Film> {
        store
            .films()
            .iter()
            .filter(|film| match self.baseline.get(&film.key()) {
                Some(&was) => rating_key(was) != rating_key(film.rating),
                None => true,
            })
            .collect()
    }

    /// Terminal transition: consume the ledger and hand back owned copies
    /// of the changed records for the diff file. The caller persists the
    /// full store as the new durable baseline, which carries any
    /// mid-session addition into it exactly once.
    pub fn commit(self, store: &RecordStore) -> Vec<Film> {
        self.diff(store).into_iter().cloned().collect()
    }
}
