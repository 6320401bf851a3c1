//! Core types shared across dbmigrate facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RunId for tying together the events of one migrator call
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction (database URLs)
//! - **Schema constants**: log field keys read back by the test capture layer

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
