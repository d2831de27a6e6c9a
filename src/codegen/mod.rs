//! Code generation for the seed-data module.
//!
//! The emitter turns materialized records back into loadable Rust source so
//! the console's mock backend can be seeded without re-parsing SQL at run
//! time.

pub mod seed_module;

pub use seed_module::{format_collection, format_record, format_value, generate_seed_module, Dataset};

use std::fs;
use std::io;
use std::path::Path;

/// Write content to a file, creating parent directories if needed.
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
