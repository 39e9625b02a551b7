mod config;
mod input;
mod output;
mod poster;
mod table;

use clap::Parser;
use reelrank_core::{
    reconcile, select_batch, DrawBag, FilmId, RecordStore, SessionLedger, BATCH_SIZE,
};
use std::path::{Path, PathBuf};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "reelrank", version, about = "Re-rank a film catalog through small comparison rounds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run an interactive reranking session over a ratings CSV
    Rank(RankArgs),
    /// Create a default config file at ~/.config/reelrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Durable ratings CSV (columns: Date, Name, Year, Reference URI, Rating)
    #[arg(long)]
    ratings: Option<PathBuf>,

    /// Directory for cached poster images
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Placeholder image used for films with no cached poster
    #[arg(long)]
    placeholder: Option<PathBuf>,

    /// Skip poster resolution entirely
    #[arg(long)]
    no_posters: bool,

    /// Prompt for a new film and rank it into the catalog this session
    #[arg(long)]
    add: bool,

    /// Print the end-of-session change report as JSON
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/reelrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reelrank=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args).await,
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your ratings file, images directory, etc.");
        }
    }
}

async fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let ratings_path = args
        .ratings
        .or(cfg.ratings.map(PathBuf::from))
        .unwrap_or_else(|| {
            bail(format!(
                "No ratings file specified. Pass --ratings or set it in {}",
                config_path.display()
            ));
        });
    let images_dir = args
        .images_dir
        .or(cfg.images_dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("images"));
    let placeholder = args.placeholder.or(cfg.placeholder.map(PathBuf::from));
    let posters_enabled = !args.no_posters && cfg.posters.unwrap_or(true);

    let working_path = table::working_path(&ratings_path);
    let diff_file = table::diff_path(&ratings_path);

    // Session start: the working copy is the only file touched until commit.
    table::copy_table(&ratings_path, &working_path).unwrap_or_else(|e| bail(e));
    let films = table::load_records(&working_path).unwrap_or_else(|e| bail(e));
    if films.len() < 2 {
        bail("Need at least 2 records to compare.");
    }

    let mut store = RecordStore::new(films);
    let ledger = SessionLedger::begin(&store);
    let mut bag = DrawBag::new(&store);

    // A record added now is absent from both the snapshot and the bag; the
    // selector forces it into the next batch exactly once.
    let mut seed: Option<FilmId> = None;
    if args.add {
        let film = input::prompt_new_film();
        seed = Some(add_record(&mut store, &working_path, film));
    }

    let poster_client =
        posters_enabled.then(|| poster::PosterClient::new(&images_dir, placeholder.as_deref()));

    let mut total_ranked: usize = 0;

    loop {
        if bag.refill_if_low(&store) {
            println!("\nBag reshuffled — starting cycle {}.", bag.cycles());
        }

        let batch = select_batch(&store, &mut bag, BATCH_SIZE, seed.take());
        if batch.is_empty() {
            break;
        }

        if let Some(ref client) = poster_client {
            client
                .fetch_missing(batch.iter().map(|&id| store.get(id)))
                .await;
        }

        output::print_batch(&store, &batch);
        output::print_counters(bag.cycles(), total_ranked, bag.size());

        let ranking = loop {
            match input::read_submission(batch.len()) {
                input::Submission::Ranking(ranking) => break ranking,
                input::Submission::Quit => {
                    finish_session(&store, ledger, &ratings_path, &working_path, &diff_file, args.json);
                    return;
                }
                input::Submission::Invalid(msg) => eprintln!("{msg}"),
            }
        };

        if let Err(e) = reconcile(&mut store, &batch, &ranking) {
            eprintln!("Ranking rejected: {e}");
            continue;
        }

        total_ranked += batch.len();
        table::save_records(&working_path, store.films()).unwrap_or_else(|e| bail(e));
    }
}

/// Add a record mid-session. The store and the on-disk working copy
/// change together: commit copies the working file over the durable one,
/// so the record must already be in it even if the session ends before
/// any ranking is accepted.
fn add_record(store: &mut RecordStore, working_path: &Path, film: reelrank_core::Film) -> FilmId {
    let id = store.push(film);
    table::save_records(working_path, store.films()).unwrap_or_else(|e| bail(e));
    id
}

/// Commit: write the diff file, report, replace the durable file with the
/// working copy, and delete the working copy.
fn finish_session(
    store: &RecordStore,
    ledger: SessionLedger,
    ratings_path: &Path,
    working_path: &Path,
    diff_file: &Path,
    json: bool,
) {
    let rows: Vec<output::ChangeRow> = ledger
        .diff(store)
        .into_iter()
        .map(|film| output::ChangeRow {
            name: film.name.clone(),
            year: film.year,
            was: ledger.baseline_rating(&film.key()),
            now: film.rating,
        })
        .collect();

    let changed = ledger.commit(store);
    table::save_records(diff_file, &changed).unwrap_or_else(|e| bail(e));

    if json {
        output::print_json(rows);
    } else {
        output::print_changes(&rows);
    }

    table::copy_table(working_path, ratings_path).unwrap_or_else(|e| bail(e));
    if let Err(e) = std::fs::remove_file(working_path) {
        eprintln!("Warning: could not delete {}: {e}", working_path.display());
    }

    println!("Changes saved to {}", diff_file.display());
}
