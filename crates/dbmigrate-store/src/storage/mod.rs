//! Migration sources
//!
//! - `FileStorage`: a directory of `<version>-<name>-(apply|rollback).<ext>`
//!   files, read once per `migration_pairs` call
//! - `MemoryStorage`: pairs supplied by the caller, e.g. via `include_str!`

mod file;
mod file_name;
mod memory;

pub use file::FileStorage;
pub use file_name::{MigrationFileName, ParsedFileName};
pub use memory::MemoryStorage;
