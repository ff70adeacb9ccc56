//! Core types and the in-memory store for the Roster contact directory.
//!
//! This crate is deliberately free of I/O. The CSV codec and the interactive
//! session depend on it; it depends on nothing but the model crates.

pub mod catalog;
pub mod contact;
pub mod directory;
pub mod error;
pub mod field;
pub mod sample;
pub mod store;

pub use error::{Error, Result};
