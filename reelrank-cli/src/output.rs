/// Terminal rendering: the batch table, session counters, and the
/// end-of-session change report (table or JSON).
use reelrank_core::{FilmId, RecordStore};
use serde::Serialize;

use crate::table::format_rating;

/// One changed record for the end-of-session report. `was` is `None` for
/// a record added mid-session.
#[derive(Serialize)]
pub struct ChangeRow {
    pub name: String,
    pub year: i32,
    pub was: Option<f64>,
    pub now: f64,
}

#[derive(Serialize)]
struct ChangeReport {
    changed: Vec<ChangeRow>,
}

/// Print one batch, worst-to-best, numbered the way rankings are typed.
pub fn print_batch(store: &RecordStore, batch: &[FilmId]) {
    let name_width = batch
        .iter()
        .map(|&id| store.get(id).name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Film"

    println!();
    println!(" # | {:<name_width$} | Year | Rating", "Film");
    println!("---|-{}-|------|-------", "-".repeat(name_width));
    for (i, &id) in batch.iter().enumerate() {
        let film = store.get(id);
        println!(
            "{:>2} | {:<name_width$} | {} | {:>6}",
            i + 1,
            film.name,
            film.year,
            format_rating(film.rating),
        );
    }
}

pub fn print_counters(cycles: usize, total_ranked: usize, in_bag: usize) {
    println!("Bag cycles: {cycles} | Ranked: {total_ranked} | In bag: {in_bag}");
}

/// Print the changed records as a table.
pub fn print_changes(rows: &[ChangeRow]) {
    if rows.is_empty() {
        println!("\nNo ratings changed this session.");
        return;
    }

    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("\nChanged this session:");
    println!(" {:<name_width$} | Year | Was | Now", "Film");
    println!("-{}-|------|-----|----", "-".repeat(name_width));
    for row in rows {
        let was = row
            .was
            .map(format_rating)
            .unwrap_or_else(|| "new".to_string());
        println!(
            " {:<name_width$} | {} | {:>3} | {:>3}",
            row.name,
            row.year,
            was,
            format_rating(row.now),
        );
    }
}

/// Print the changed records as JSON.
pub fn print_json(rows: Vec<ChangeRow>) {
    let report = ChangeReport { changed: rows };
    println!("{}", serde_json::to_string_pretty(&report).unwrap());
}
