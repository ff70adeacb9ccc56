//! Session command grammar: one line of input is one command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Role;

/// A parsed input line.
#[derive(Parser, Debug)]
#[command(name = "roster", no_binary_name = true, about = "Contact directory session")]
pub struct Line {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List contacts grouped by country and company.
  List {
    /// Keyword matched against name and company.
    #[arg(short, long)]
    search:     Option<String>,
    /// Only these countries (repeatable).
    #[arg(long = "country", value_name = "COUNTRY")]
    countries:  Vec<String>,
    /// Only these categories (repeatable).
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<String>,
  },

  /// Show one contact's full profile.
  Show { id: u64 },

  /// Create a contact (admin).
  Add(AddArgs),

  /// Edit a contact and optionally sync fields to colleagues (admin).
  Edit(EditArgs),

  /// Post a comment on a contact.
  Comment {
    id:   u64,
    /// Comment text; may be empty.
    #[arg(num_args = 0..)]
    text: Vec<String>,
  },

  /// Show a contact's audit history, newest first.
  History { id: u64 },

  /// Bulk-import contacts from a CSV file (admin).
  Import { path: PathBuf },

  /// Write an empty import template (admin).
  Template { path: PathBuf },

  /// Export every contact, audit trail included, to CSV.
  Export { path: PathBuf },

  /// Birthdays this month and the next two.
  Birthdays,

  /// Reporting lines per company.
  Hierarchy,

  /// Show the configured choice lists.
  Catalog,

  /// Show the signed-in operator.
  Whoami,

  /// Switch the operator's role for this session.
  Role { role: Role },
}

/// Fields for a new contact. Anything not covered by a flag can be given
/// with `--set key=value`.
#[derive(Args, Debug, Default)]
pub struct AddArgs {
  #[arg(long)]
  pub name:         Option<String>,
  #[arg(long)]
  pub company:      Option<String>,
  #[arg(long)]
  pub appointment:  Option<String>,
  #[arg(long)]
  pub reporting_to: Option<String>,
  /// Birthdate (YYYY-MM-DD).
  #[arg(long, conflicts_with = "age")]
  pub birthdate:    Option<String>,
  /// Age only; the birthdate becomes 1 January of the matching year.
  #[arg(long)]
  pub age:          Option<u32>,
  #[arg(long)]
  pub country:      Option<String>,
  #[arg(long)]
  pub category:     Option<String>,
  #[arg(long)]
  pub tier:         Option<String>,
  #[arg(long)]
  pub status:       Option<String>,
  #[arg(long = "set", value_name = "FIELD=VALUE")]
  pub sets:         Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
  pub id:    u64,
  /// Field assignment (repeatable), e.g. `--set tier=B`.
  #[arg(long = "set", value_name = "FIELD=VALUE")]
  pub sets:  Vec<String>,
  /// Replace the birthdate with 1 January of the matching year.
  #[arg(long)]
  pub age:   Option<u32>,
  /// New photo (JPG or PNG).
  #[arg(long, value_name = "FILE")]
  pub photo: Option<PathBuf>,
  /// Copy this field's new value to colleagues at the same company
  /// (repeatable).
  #[arg(long = "sync", value_name = "FIELD")]
  pub sync:  Vec<String>,
}

/// Split `key=value`. The value may be empty to clear a field.
pub fn split_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
  raw
    .split_once('=')
    .ok_or_else(|| anyhow::anyhow!("expected FIELD=VALUE, got {raw:?}"))
}
