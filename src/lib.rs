//! OneRoster Filter - Compile OneRoster `filter` query parameters into storage-neutral conditions
//!
//! This library turns the boolean filter expressions OneRoster clients send
//! (`status='active' AND role='student'`) into a [`Condition`] tree that a
//! storage layer can translate into its own query language. It supports:
//!
//! - Quote- and parenthesis-aware parsing of `AND`/`OR` expressions
//! - Literal type inference (booleans, numbers, dates, strings)
//! - Per-collection field allow-lists as a security boundary
//! - OneRoster `imsx_StatusInfo` error payloads for rejected filters
//! - An in-memory evaluator for JSON records
//!
//! # Example
//!
//! ```
//! use oneroster_filter::config::FilterConfig;
//! use oneroster_filter::schema::EntityType;
//!
//! let compiler = EntityType::Users.compiler(&FilterConfig::default());
//! let condition = compiler.compile("status='active' AND role='student'")?;
//! assert_eq!(condition.leaf_count(), 2);
//! # Ok::<(), oneroster_filter::filters::ParseError>(())
//! ```

pub mod cli;
pub mod config;
pub mod filters;
pub mod schema;
pub mod utils;

// Re-export commonly used types
pub use config::FilterConfig;
pub use filters::{Condition, FieldAllowList, FilterCompiler, ParseError, compile_filter};
pub use schema::EntityType;
