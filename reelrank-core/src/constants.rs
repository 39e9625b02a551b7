/// Maximum number of records presented per comparison round.
///
/// Five is about as many titles as a user can hold in their head while
/// producing a total order in one go; the batch shrinks when the bag
/// holds fewer.
pub const BATCH_SIZE: usize = 5;

/// The bag is refilled when fewer than this many records remain before a
/// draw. A remainder of exactly 1 is discarded from the ending cycle
/// rather than reinserted, so the same record cannot show up in two
/// adjacent batches across the cycle boundary.
pub const REFILL_THRESHOLD: usize = 2;

/// Lowest representable rating (half a star).
pub const MIN_RATING: f64 = 0.5;

/// Highest representable rating (five stars).
pub const MAX_RATING: f64 = 5.0;

/// Earliest accepted release year.
pub const MIN_YEAR: i32 = 1874;
