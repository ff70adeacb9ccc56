//! Tabular (CSV) codec for Roster.
//!
//! Converts between delimited text and [`roster_core`] types. Pure
//! synchronous; no terminal or filesystem dependencies beyond the
//! `Read`/`Write` handles callers pass in.
//!
//! Import and export are deliberately asymmetric: the import template covers
//! descriptive fields only, while the export is a lossy snapshot of every
//! field including the audit trail.
//!
//! # Quick start
//!
//! ```no_run
//! let input = "name,company,tier\nAda,Acme,A\n";
//! let batch = roster_csv::read_rows(input.as_bytes()).unwrap();
//! assert_eq!(batch.rows.len(), 1);
//! ```

pub mod error;
mod read;
mod write;

pub use error::{Error, Result};
pub use read::{ImportBatch, read_rows};
pub use write::{AUDIT_COLUMNS, export, export_columns, template};
