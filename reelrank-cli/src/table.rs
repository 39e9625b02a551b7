/// Persistence adapter for the tabular record files.
///
/// All three files — durable baseline, working copy, diff — share one
/// schema: UTF-8 CSV with a required header row and the columns
/// `Date, Name, Year, Reference URI, Rating` in that order. The engine
/// only needs load-all / replace-all semantics; the working copy is a
/// byte-level duplicate of the durable file, and commit is the same copy
/// back in the other direction.
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use reelrank_core::Film;

pub const HEADER: [&str; 5] = ["Date", "Name", "Year", "Reference URI", "Rating"];

/// Working-copy path next to the durable file: `working_<name>`.
pub fn working_path(ratings: &Path) -> PathBuf {
    sibling_with_prefix(ratings, "working_")
}

/// Diff-file path next to the durable file: `changed_<name>`.
pub fn diff_path(ratings: &Path) -> PathBuf {
    sibling_with_prefix(ratings, "changed_")
}

fn sibling_with_prefix(path: &Path, prefix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{prefix}{name}"))
}

/// Duplicate one record file over another, byte for byte. Used in both
/// directions: durable → working at session start, working → durable at
/// commit.
pub fn copy_table(from: &Path, to: &Path) -> Result<(), String> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| format!("Failed to copy {} to {}: {e}", from.display(), to.display()))
}

/// Load every record from a CSV file. The header row must match the
/// schema exactly.
pub fn load_records(path: &Path) -> Result<Vec<Film>, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read header of {}: {e}", path.display()))?;
    if headers.iter().ne(HEADER) {
        return Err(format!(
            "{}: unexpected header row (expected \"{}\")",
            path.display(),
            HEADER.join(",")
        ));
    }

    let mut films = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 2; // 1-based, after the header
        let record = result.map_err(|e| format!("{}: row {row}: {e}", path.display()))?;
        films.push(parse_row(&record).map_err(|e| format!("{}: row {row}: {e}", path.display()))?);
    }
    Ok(films)
}

fn parse_row(record: &StringRecord) -> Result<Film, String> {
    if record.len() != HEADER.len() {
        return Err(format!(
            "expected {} columns, got {}",
            HEADER.len(),
            record.len()
        ));
    }
    Ok(Film {
        date: record[0].to_string(),
        name: record[1].to_string(),
        year: record[2]
            .parse()
            .map_err(|_| format!("invalid year \"{}\"", &record[2]))?,
        uri: record[3].to_string(),
        rating: record[4]
            .parse()
            .map_err(|_| format!("invalid rating \"{}\"", &record[4]))?,
    })
}

/// Serialize a rating with one fractional digit: 3.0, 3.5, 4.0, ...
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Replace the file at `path` with the given records, header first.
pub fn save_records(path: &Path, films: &[Film]) -> Result<(), String> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| format!("Failed to open {} for writing: {e}", path.display()))?;

    writer
        .write_record(HEADER)
        .map_err(|e| format!("Failed to write header to {}: {e}", path.display()))?;

    for film in films {
        let year = film.year.to_string();
        let rating = format_rating(film.rating);
        writer
            .write_record([
                film.date.as_str(),
                film.name.as_str(),
                year.as_str(),
                film.uri.as_str(),
                rating.as_str(),
            ])
            .map_err(|e| format!("Failed to write record to {}: {e}", path.display()))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush {}: {e}", path.display()))
}
