/// reelrank-core: Preference elicitation and rating reconciliation engine.
///
/// Draw bag → batch selection → user ordering → rating redistribution,
/// with a session ledger for change detection. No IO, no HTTP, no
/// filesystem — just the convergence logic. Bring your own presentation
/// layer and persistence.
///
/// Records are owned by a `RecordStore`; every other component works with
/// `FilmId` index handles, so a rating only ever changes through
/// `reconcile()`.
///
/// # Quick start
///
/// ```rust
/// use reelrank_core::{reconcile, select_batch, DrawBag, Film, RecordStore, SessionLedger, BATCH_SIZE};
///
/// let films = vec![
///     Film { date: "2024-01-01".into(), name: "Alien".into(), year: 1979,
///            uri: "https://boxd.it/29V2".into(), rating: 4.5 },
///     Film { date: "2024-01-02".into(), name: "Heat".into(), year: 1995,
///            uri: "https://boxd.it/29Lu".into(), rating: 4.0 },
///     Film { date: "2024-01-03".into(), name: "Speed".into(), year: 1994,
///            uri: "https://boxd.it/2aHi".into(), rating: 3.5 },
/// ];
/// let mut store = RecordStore::new(films);
/// let ledger = SessionLedger::begin(&store);
/// let mut bag = DrawBag::new(&store);
///
/// // One round: the batch is presented worst-to-best and the user
/// // submits an order, best first. Keeping the current order is a no-op.
/// let batch = select_batch(&store, &mut bag, BATCH_SIZE, None);
/// let keep_current: Vec<usize> = (0..batch.len()).rev().collect();
/// reconcile(&mut store, &batch, &keep_current).unwrap();
///
/// let changed = ledger.commit(&store);
/// assert!(changed.is_empty());
/// ```

pub mod bag;
pub mod batch;
pub mod constants;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod types;

// Re-export primary public API at crate root.
pub use bag::DrawBag;
pub use batch::select_batch;
pub use constants::{BATCH_SIZE, MAX_RATING, MIN_RATING, MIN_YEAR, REFILL_THRESHOLD};
pub use reconcile::{reconcile, RankingError};
pub use session::SessionLedger;
pub use store::RecordStore;
pub use types::{rating_key, Film, FilmId, FilmKey};
