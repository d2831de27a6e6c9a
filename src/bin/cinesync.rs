//! cinesync CLI - SQL dump synchronization for the movie recommendation console
//!
//! This CLI tool parses MySQL-style dump files and regenerates the seed-data
//! module the console's mock backend loads at startup.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use cinesync::export::write_csv_report;
use cinesync::store::{MockStore, SeedData};
use cinesync::sync::{parse_dump_dir, run_sync, SyncConfig, DUMP_SOURCES};

#[derive(Parser)]
#[command(name = "cinesync")]
#[command(version, about = "SQL dump synchronization for the movie recommendation console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the SQL dump files and regenerate the seed-data module
    Sync {
        /// Directory containing the movie_recommendations_*.sql dump files
        #[arg(short, long, default_value = ".")]
        sql_dir: PathBuf,

        /// Path of the generated seed-data module
        #[arg(short, long, default_value = "src/data/seed_data.rs")]
        output: PathBuf,
    },

    /// Parse the SQL dump files and report per-table counts without writing
    Validate {
        /// Directory containing the movie_recommendations_*.sql dump files
        #[arg(short, long, default_value = ".")]
        sql_dir: PathBuf,
    },

    /// Seed (or reseed) the mock store state file from the dump files
    Seed {
        /// Directory containing the movie_recommendations_*.sql dump files
        #[arg(short, long, default_value = ".")]
        sql_dir: PathBuf,

        /// Path of the JSON store state file
        #[arg(long, default_value = "mock_store.json")]
        state: PathBuf,

        /// Data version tag; a mismatch forces a full reseed
        #[arg(long, default_value = "3.0")]
        version: String,
    },

    /// Export one parsed table as a date-stamped CSV report
    Export {
        /// Directory containing the movie_recommendations_*.sql dump files
        #[arg(short, long, default_value = ".")]
        sql_dir: PathBuf,

        /// Export key of the table (movies, users, ratings, watchHistory,
        /// recommendations, genres)
        #[arg(short, long)]
        table: String,

        /// Output directory for the report
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync { sql_dir, output } => sync_dumps(sql_dir, output),
        Commands::Validate { sql_dir } => validate_dumps(sql_dir),
        Commands::Seed {
            sql_dir,
            state,
            version,
        } => seed_store(sql_dir, state, version),
        Commands::Export {
            sql_dir,
            table,
            output,
        } => export_table(sql_dir, table, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Parse the SQL dump files and regenerate the seed-data module
fn sync_dumps(sql_dir: PathBuf, output: PathBuf) -> Result<(), String> {
    println!("🔄 Syncing SQL data from {}...", sql_dir.display());

    let config = SyncConfig {
        sql_dir,
        output: output.clone(),
    };
    let dataset = run_sync(&config).map_err(|e| e.to_string())?;

    for (key, records) in &dataset {
        println!("  ✓ {}: {} records", key, records.len());
    }

    println!("✨ Sync complete! Generated {}", output.display());
    Ok(())
}

/// Parse the SQL dump files and report per-table counts without writing
fn validate_dumps(sql_dir: PathBuf) -> Result<(), String> {
    println!("🔍 Validating SQL dumps in {}...", sql_dir.display());

    let dataset = parse_dump_dir(&sql_dir);
    let mut missing = Vec::new();

    for (key, _) in DUMP_SOURCES {
        let count = dataset.get(key).map(|records| records.len()).unwrap_or(0);
        if count == 0 {
            println!("  ⚠ {}: no records parsed", key);
            missing.push(key);
        } else {
            println!("  ✓ {}: {} records", key, count);
        }
    }

    if missing.is_empty() {
        println!("✅ All dump files parsed!");
        Ok(())
    } else {
        Err(format!(
            "No records parsed for: {}. Check that the dump files exist and contain INSERT statements.",
            missing.join(", ")
        ))
    }
}

/// Seed (or reseed) the mock store state file from the dump files
fn seed_store(sql_dir: PathBuf, state: PathBuf, version: String) -> Result<(), String> {
    println!("🌱 Seeding mock store from {}...", sql_dir.display());

    let dataset = parse_dump_dir(&sql_dir);
    let seed = SeedData::from_dataset(&dataset)
        .map_err(|e| format!("Failed to decode seed data: {}", e))?;

    let mut store = if state.exists() {
        MockStore::load(&state).map_err(|e| format!("Failed to load store state: {}", e))?
    } else {
        MockStore::new()
    };

    if store.initialize(&version, &seed) {
        println!("  ✓ Store reseeded at data version {}", version);
    } else {
        println!("  ℹ Store already at data version {}, nothing to do", version);
    }

    println!(
        "  ✓ {} movies, {} users, {} ratings, {} watch entries, {} recommendations, {} genres",
        store.movies().len(),
        store.users().len(),
        store.ratings().len(),
        store.watch_history().len(),
        store.recommendations().len(),
        store.genres().len(),
    );

    store
        .save(&state)
        .map_err(|e| format!("Failed to save store state: {}", e))?;

    println!("✨ Store state written to {}", state.display());
    Ok(())
}

/// Export one parsed table as a date-stamped CSV report
fn export_table(sql_dir: PathBuf, table: String, output: PathBuf) -> Result<(), String> {
    println!("📊 Exporting '{}' from {}...", table, sql_dir.display());

    if !DUMP_SOURCES.iter().any(|(key, _)| *key == table) {
        let keys: Vec<&str> = DUMP_SOURCES.iter().map(|(key, _)| *key).collect();
        return Err(format!(
            "Unknown table '{}'. Expected one of: {}",
            table,
            keys.join(", ")
        ));
    }

    let dataset = parse_dump_dir(&sql_dir);
    let records = dataset.get(&table).cloned().unwrap_or_default();
    println!("  ✓ {} records parsed", records.len());

    let path = write_csv_report(&records, &output, &table).map_err(|e| e.to_string())?;
    println!("✨ Report written to {}", path.display());
    Ok(())
}
