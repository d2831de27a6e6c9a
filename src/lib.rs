//! # Cinesync: SQL Dump Synchronization for the Movie Recommendation Console
//!
//! Cinesync parses MySQL-style dump files into structured records and
//! regenerates the seed-data module the console's mock backend loads at
//! startup, so the UI data stays in lockstep with the database dumps.
//!
//! ## Pipeline
//!
//! - **Tokenizer**: splits a raw `VALUES` row into typed SQL values,
//!   honoring quotes, doubled-quote escapes, and `NULL`
//! - **Extractor**: pulls `INSERT INTO ... VALUES ...;` statements out of a
//!   dump file with all its surrounding noise (comments, DDL, lock tables)
//! - **Materializer**: zips row values against the known table schemas into
//!   order-preserving records
//! - **Emitter**: renders the records back out as a generated Rust module
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use cinesync::sync::{run_sync, SyncConfig};
//!
//! let config = SyncConfig {
//!     sql_dir: PathBuf::from("dumps"),
//!     output: PathBuf::from("src/data/seed_data.rs"),
//! };
//! let dataset = run_sync(&config)?;
//! println!("synced {} tables", dataset.len());
//! # Ok::<(), cinesync::sync::SyncError>(())
//! ```

// Core pipeline
pub mod parser;
pub mod record;
pub mod schema;
pub mod value;

// Code generation
pub mod codegen;

// Typed entities and the mock backend they feed
pub mod entity;
pub mod store;

// Console-side utilities
pub mod export;
pub mod permissions;

// End-to-end sync orchestration
pub mod sync;

// Re-export key types
pub use entity::{decode_table, EntityError, TableData};
pub use parser::{extract_first_insert, extract_inserts, tokenize_row, ParsedTable};
pub use record::{rows_to_records, Record};
pub use schema::TableKind;
pub use store::{MockStore, SeedData, StoreError};
pub use sync::{run_sync, SyncConfig, SyncError};
pub use value::SqlValue;
