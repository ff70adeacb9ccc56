//! Import template and full export.

use std::io::Write;

use roster_core::{contact::Contact, field::ContactField};

use crate::Result;

/// Columns appended after the descriptive fields in a full export.
pub const AUDIT_COLUMNS: [&str; 4] =
  ["last_updated_at", "last_updated_by_name", "history", "comments"];

/// Header of the import template: every field key, no identity or audit
/// columns.
pub fn template() -> Result<String> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record(ContactField::all().map(ContactField::key))?;
  let bytes = writer.into_inner().map_err(|e| e.into_error())?;
  Ok(String::from_utf8(bytes)?)
}

/// Header of a full export: `id`, every field key, then the audit columns.
pub fn export_columns() -> Vec<&'static str> {
  std::iter::once("id")
    .chain(ContactField::all().map(ContactField::key))
    .chain(AUDIT_COLUMNS)
    .collect()
}

/// Write every contact as one row with every value stringified.
///
/// History and comments are rendered as JSON arrays. The result is a
/// snapshot for people to read; it is not meant to be imported again.
pub fn export<'a>(
  contacts: impl IntoIterator<Item = &'a Contact>,
  output: impl Write,
) -> Result<()> {
  let mut writer = csv::Writer::from_writer(output);
  let columns = export_columns();
  writer.write_record(&columns)?;

  for contact in contacts {
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    record.push(contact.id().to_string());
    record.extend(ContactField::all().map(|field| contact.fields.get(field).stringify()));
    record.push(contact.last_updated_at.to_rfc3339());
    record.push(contact.last_updated_by_name.clone());
    record.push(serde_json::to_string(contact.history())?);
    record.push(serde_json::to_string(contact.comments())?);
    writer.write_record(&record)?;
  }

  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use roster_core::{sample, store::ContactStore};

  use super::*;

  #[test]
  fn template_lists_field_keys_only() {
    let header = template().unwrap();
    let columns: Vec<&str> = header.trim_end().split(',').collect();

    assert_eq!(columns.first(), Some(&"name"));
    assert_eq!(columns.len(), ContactField::all().count());
    for excluded in ["id", "history", "comments", "last_updated_at", "last_updated_by_name"] {
      assert!(!columns.contains(&excluded), "{excluded} leaked into template");
    }
  }

  #[test]
  fn export_has_every_column_and_one_row_per_contact() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let mut store = ContactStore::new();
    sample::seed(&mut store, at).unwrap();
    store
      .add_comment(roster_core::contact::ContactId(2), "Met at NYR", "Alex Tan", at)
      .unwrap();

    let mut out = Vec::new();
    export(store.contacts(), &mut out).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_owned).collect();
    assert_eq!(headers, export_columns());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);

    let second = &rows[1];
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(&second[col("id")], "2");
    assert_eq!(&second[col("name")], "Tan Ah Teck");
    assert_eq!(&second[col("birthdate")], "1975-02-14");
    assert_eq!(&second[col("last_updated_by_name")], "System");
    assert!(second[col("history")].contains("Initial Entry"));
    assert!(second[col("history")].contains("New Comment Added"));
    assert!(second[col("comments")].contains("Met at NYR"));
    assert_eq!(&second[col("spouse")], "");
  }
}
