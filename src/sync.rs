//! The sync pipeline: dump files in, generated seed module out.
//!
//! Single-threaded, run-to-completion batch. Per-file problems (missing
//! file, unparsable statement) are logged and leave that table's collection
//! empty; only a failure writing the output aborts the run, so prior output
//! is never clobbered by a partial result.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::codegen::{generate_seed_module, write_file, Dataset};
use crate::parser::extract_first_insert;
use crate::record::rows_to_records;

/// Export key and dump file name for each expected table, in output order.
pub const DUMP_SOURCES: [(&str, &str); 6] = [
    ("movies", "movie_recommendations_movies.sql"),
    ("users", "movie_recommendations_users.sql"),
    ("ratings", "movie_recommendations_ratings.sql"),
    ("watchHistory", "movie_recommendations_watchhistory.sql"),
    ("recommendations", "movie_recommendations_recommendations.sql"),
    ("genres", "movie_recommendations_genres.sql"),
];

#[derive(Debug)]
pub enum SyncError {
    WriteFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SyncError {}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory containing the SQL dump files.
    pub sql_dir: PathBuf,
    /// Path of the generated seed-data module.
    pub output: PathBuf,
}

/// Parse every expected dump file under `sql_dir` into a dataset.
///
/// Tables whose file is missing or unparsable get an empty collection and a
/// logged warning; the batch never fails here.
pub fn parse_dump_dir(sql_dir: &Path) -> Dataset {
    let mut dataset = Dataset::new();

    for (key, file_name) in DUMP_SOURCES {
        let path = sql_dir.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dump file not readable, leaving table empty");
                dataset.insert(key.to_string(), Vec::new());
                continue;
            }
        };

        match extract_first_insert(&content) {
            Some(parsed) => {
                let records = rows_to_records(&parsed.table, parsed.rows);
                info!(table = %parsed.table, records = records.len(), "parsed dump file");
                dataset.insert(key.to_string(), records);
            }
            None => {
                warn!(path = %path.display(), "no INSERT statement found, leaving table empty");
                dataset.insert(key.to_string(), Vec::new());
            }
        }
    }

    dataset
}

/// Run the full sync: parse the dumps and regenerate the seed module.
///
/// The output file is only written after every table has been processed.
pub fn run_sync(config: &SyncConfig) -> Result<Dataset, SyncError> {
    let dataset = parse_dump_dir(&config.sql_dir);
    let module = generate_seed_module(&dataset);
    write_file(&config.output, module).map_err(|source| SyncError::WriteFailed {
        path: config.output.clone(),
        source,
    })?;
    Ok(dataset)
}
