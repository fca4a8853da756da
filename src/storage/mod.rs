//! Storage layer for modularizer results.
//!
//! Handles all file system output:
//! - Persisting modularizations as timestamped JSON
//! - Reading them back
//! - Writing generated module files

mod fs;

pub use fs::{read_modularization, save_modularization, timestamp, write_module};
