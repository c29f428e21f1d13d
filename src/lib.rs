pub mod barrier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod index_table;
pub mod manifest;
pub mod mapper;
pub mod reducer;
pub mod splitter;
pub mod summary;
pub mod work_queue;

pub use config::IndexConfig;
pub use coordinator::{run, run_manifest};
pub use error::*;
pub use summary::RunSummary;

/// One bucket and one output file per letter `a`..`z`.
pub const NUM_LETTERS: usize = 26;
