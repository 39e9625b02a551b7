/// Core data types for the reranking engine.
///
/// Films are owned by the `RecordStore`; every other component refers to
/// them through `FilmId` handles and never constructs or clones a record.

/// Index handle into a `RecordStore`. The store only grows during a
/// session, so a handle stays valid from issue until session end.
pub type FilmId = usize;

/// Composite identity used for cross-snapshot comparison. Records carry no
/// surrogate id: two records are the same logical film iff name and year
/// match, and object identity is not assumed to survive a reload.
pub type FilmKey = (String, i32);

/// One watched film from the rating catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Film {
    /// Calendar date the record was logged. Opaque to the engine.
    pub date: String,
    /// Display title.
    pub name: String,
    /// Release year. Validated by the caller to lie in [1874, current_year + 1].
    pub year: i32,
    /// External catalog reference. Opaque to the engine.
    pub uri: String,
    /// Score in [0.5, 5.0], quantized to multiples of 0.5. Validated by the caller.
    pub rating: f64,
}

impl Film {
    pub fn key(&self) -> FilmKey {
        (self.name.clone(), self.year)
    }
}

/// Quantization key for a rating: its number of half-stars.
///
/// Rating values only ever move between records whole, so comparing
/// half-step keys is exact, and it gives the batch selector a hashable
/// uniqueness key without comparing raw floats.
pub fn rating_key(rating: f64) -> i32 {
    (rating * 2.0).round() as i32
}
