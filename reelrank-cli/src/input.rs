/// Ranking-string parsing and validated prompts.
///
/// This is the input half of the presentation layer plus the input
/// validation collaborator: everything here is checked before it reaches
/// the engine, which trusts what it is handed.
use std::io::Write;

use regex::Regex;
use reelrank_core::{Film, MAX_RATING, MIN_RATING, MIN_YEAR};
use time::macros::format_description;
use time::OffsetDateTime;

/// Default ranking digits, read right to left. Taking the last `n`
/// characters submits the displayed (ascending) order unchanged, so an
/// empty submission accepts the batch as already ordered.
const DEFAULT_RANKING: &str = "654321";

const URI_PATTERN: &str = r"^https://boxd\.it/[A-Za-z0-9]+$";

/// One line of user input for a displayed batch.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// A valid ranking: 0-based batch indices, best first.
    Ranking(Vec<usize>),
    /// End the session and commit.
    Quit,
    /// Recoverable input error: show the message and re-prompt.
    Invalid(String),
}

/// Prompt for and read one submission for a batch of `n` records.
/// EOF on stdin ends the session like an explicit quit.
pub fn read_submission(n: usize) -> Submission {
    print!("Ranking (best first), Enter to keep order, q to finish: ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => Submission::Quit,
        Ok(_) => parse_submission(line.trim(), n),
    }
}

/// Classify one submission line for a batch of `n` records.
pub fn parse_submission(line: &str, n: usize) -> Submission {
    if line.eq_ignore_ascii_case("q") {
        return Submission::Quit;
    }
    let text = if line.is_empty() {
        &DEFAULT_RANKING[DEFAULT_RANKING.len() - n..]
    } else {
        line
    };
    match parse_ranking(text, n) {
        Ok(ranking) => Submission::Ranking(ranking),
        Err(msg) => Submission::Invalid(msg),
    }
}

/// Parse a permutation of the digits 1..=n into 0-based batch indices.
pub fn parse_ranking(text: &str, n: usize) -> Result<Vec<usize>, String> {
    if text.chars().count() != n {
        return Err(format!("Enter exactly {n} digits, one per film."));
    }
    let mut ranking = Vec::with_capacity(n);
    let mut seen = vec![false; n];
    for c in text.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| format!("\"{c}\" is not a digit."))? as usize;
        if digit == 0 || digit > n {
            return Err(format!("Digits must be between 1 and {n}."));
        }
        if seen[digit - 1] {
            return Err(format!("Digit {digit} appears twice."));
        }
        seen[digit - 1] = true;
        ranking.push(digit - 1);
    }
    Ok(ranking)
}

/// Interactively collect a validated new film record for this session.
pub fn prompt_new_film() -> Film {
    let name = prompt_until("Title:", |line| {
        if line.is_empty() {
            Err("Title must not be empty.".to_string())
        } else {
            Ok(line.to_string())
        }
    });
    let current_year = OffsetDateTime::now_utc().year();
    let year = prompt_until(
        &format!("Release year ({MIN_YEAR}-{}):", current_year + 1),
        |line| validate_year(line, current_year),
    );
    let uri = prompt_until("Reference URI (https://boxd.it/...):", |line| {
        validate_uri(line)
    });
    let rating = prompt_until(
        &format!("Rating ({MIN_RATING}-{MAX_RATING}, rounded to halves):"),
        validate_rating,
    );

    Film {
        date: today(),
        name,
        year,
        uri,
        rating,
    }
}

fn prompt_until<T>(message: &str, validate: impl Fn(&str) -> Result<T, String>) -> T {
    loop {
        println!("{message}");
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            crate::bail("Failed to read from stdin");
        }
        match validate(line.trim()) {
            Ok(value) => return value,
            Err(msg) => println!("{msg}\n"),
        }
    }
}

/// Year must be an integer in [1874, current_year + 1].
pub fn validate_year(text: &str, current_year: i32) -> Result<i32, String> {
    let year: i32 = text
        .parse()
        .map_err(|_| "Year must be an integer.".to_string())?;
    if (MIN_YEAR..=current_year + 1).contains(&year) {
        Ok(year)
    } else {
        Err(format!("Year must be between {MIN_YEAR} and {}.", current_year + 1))
    }
}

/// Rating must be a number; it is rounded to the nearest 0.5 and must land
/// in [0.5, 5.0].
pub fn validate_rating(text: &str) -> Result<f64, String> {
    let rating: f64 = text
        .parse()
        .map_err(|_| "Rating must be a number.".to_string())?;
    let rounded = (rating * 2.0).round() / 2.0;
    if (MIN_RATING..=MAX_RATING).contains(&rounded) {
        Ok(rounded)
    } else {
        Err(format!("Rating must be between {MIN_RATING} and {MAX_RATING}."))
    }
}

/// Reference URI must be a short boxd.it link.
pub fn validate_uri(text: &str) -> Result<String, String> {
    let pattern = Regex::new(URI_PATTERN).unwrap();
    if pattern.is_match(text) {
        Ok(text.to_string())
    } else {
        Err("Invalid URI.".to_string())
    }
}

fn today() -> String {
    let format = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .date()
        .format(&format)
        .unwrap_or_default()
}
