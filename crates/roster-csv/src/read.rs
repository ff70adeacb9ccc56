//! Bulk-import parsing.

use std::io::Read;

use roster_core::{contact::ContactFields, field::ContactField};

use crate::Result;

/// Rows decoded from an import file.
#[derive(Debug, Default)]
pub struct ImportBatch {
  /// One field set per data row, in file order.
  pub rows:            Vec<ContactFields>,
  /// Header names that are not contact field keys. Their cells are dropped.
  pub ignored_columns: Vec<String>,
}

/// Parse an import file whose header row names field keys verbatim.
///
/// Missing columns, short rows and empty cells leave fields absent; an
/// unparseable date leaves the date absent; list cells are split on commas.
/// Only structural CSV errors fail the import.
pub fn read_rows(input: impl Read) -> Result<ImportBatch> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .flexible(true)
    .from_reader(input);

  let mut batch = ImportBatch::default();
  let columns: Vec<Option<ContactField>> = reader
    .headers()?
    .iter()
    .map(|header| {
      let field = ContactField::from_key(header).ok();
      if field.is_none() {
        batch.ignored_columns.push(header.to_owned());
      }
      field
    })
    .collect();

  for record in reader.records() {
    let record = record?;
    let mut fields = ContactFields::default();
    for (column, cell) in columns.iter().zip(record.iter()) {
      if let Some(field) = column {
        fields.set_raw(*field, cell);
      }
    }
    batch.rows.push(fields);
  }

  Ok(batch)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn reads_rows_with_missing_optional_columns() {
    let input = "name,company,tier\nAda,Acme,A\nBob,Beta,\nCyd,Cora,C\n";
    let batch = read_rows(input.as_bytes()).unwrap();

    assert_eq!(batch.rows.len(), 3);
    assert!(batch.ignored_columns.is_empty());
    assert_eq!(batch.rows[0].name.as_deref(), Some("Ada"));
    assert_eq!(batch.rows[1].tier, None);
    assert_eq!(batch.rows[2].email, None);
  }

  #[test]
  fn unknown_columns_are_reported_and_dropped() {
    let input = "name,company,salary\nAda,Acme,100\n";
    let batch = read_rows(input.as_bytes()).unwrap();
    assert_eq!(batch.ignored_columns, vec!["salary"]);
    assert_eq!(batch.rows[0].company.as_deref(), Some("Acme"));
  }

  #[test]
  fn cells_are_coerced_permissively() {
    let input = "name,birthdate,retire_date,festivities,status\n\
                 Ada,1982-03-20,someday,\"Christmas, Hari Raya\",Dormant\n";
    let batch = read_rows(input.as_bytes()).unwrap();
    let row = &batch.rows[0];

    assert_eq!(row.birthdate, NaiveDate::from_ymd_opt(1982, 3, 20));
    assert_eq!(row.retire_date, None);
    assert_eq!(row.festivities, vec!["Christmas", "Hari Raya"]);
    assert_eq!(row.status.as_deref(), Some("Dormant"));
  }

  #[test]
  fn rows_without_name_or_company_are_kept() {
    let input = "name,company,email\n,,a@example.com\n";
    let batch = read_rows(input.as_bytes()).unwrap();
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].name, None);
  }

  #[test]
  fn short_rows_leave_trailing_fields_absent() {
    let input = "name,company,tier\nAda\n";
    let batch = read_rows(input.as_bytes()).unwrap();
    assert_eq!(batch.rows[0].name.as_deref(), Some("Ada"));
    assert_eq!(batch.rows[0].company, None);
  }
}
