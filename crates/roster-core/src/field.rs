//! Keyed access to contact fields and the change-detection utility.
//!
//! Contacts have a fixed shape, but edits, syncs and the CSV codec address
//! fields by their snake_case key. [`ContactField`] names every field and
//! [`FieldValue`] is the dynamic view of one field's value.
//!
//! Change detection compares the stringified forms of two values, so a value
//! that only changed representation (an empty string replacing an absent
//! value, a date re-entered in another format) is not reported as a change.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::contact::ContactFields;

// ─── Field keys ──────────────────────────────────────────────────────────────

/// Every descriptive field of a contact, in import-template column order.
///
/// Identity and audit fields (`id`, `history`, `comments`, `last_updated_*`)
/// are not addressable this way.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
  Name,
  Birthdate,
  Company,
  Appointment,
  Country,
  Mobile,
  Office,
  Email,
  Address,
  Hobbies,
  Dietary,
  Receptions,
  Festivities,
  AssumedDate,
  RetireDate,
  MaritalStatus,
  Spouse,
  Children,
  ReportingTo,
  VehicleReg,
  Golf,
  Handicap,
  Status,
  Category,
  Tier,
  Photo,
}

/// The storage shape behind a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Date,
  List,
}

impl ContactField {
  /// All fields in column order.
  pub fn all() -> impl Iterator<Item = ContactField> { Self::iter() }

  /// The snake_case key used in CSV headers and `--set key=value` edits.
  pub fn key(self) -> &'static str { self.into() }

  /// Parse a field key. Surrounding whitespace is ignored.
  pub fn from_key(key: &str) -> crate::Result<Self> {
    key
      .trim()
      .parse()
      .map_err(|_| crate::Error::UnknownField(key.to_owned()))
  }

  /// Human-readable label used in history messages, e.g.
  /// `marital_status` → `Marital Status`.
  pub fn label(self) -> String {
    self
      .key()
      .split('_')
      .map(|word| {
        let mut chars = word.chars();
        match chars.next() {
          Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
          None => String::new(),
        }
      })
      .collect::<Vec<_>>()
      .join(" ")
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::Birthdate | Self::AssumedDate | Self::RetireDate => FieldKind::Date,
      Self::Receptions | Self::Festivities => FieldKind::List,
      _ => FieldKind::Text,
    }
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// Accepted input formats for date cells and `--set` values, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d/%m/%Y"];

/// A dynamically typed view of one field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Absent,
  Text(String),
  Date(NaiveDate),
  List(Vec<String>),
}

impl FieldValue {
  /// Interpret raw text for a field of the given kind.
  ///
  /// Never fails: blank input is [`FieldValue::Absent`], an unparseable date
  /// is left absent, list input is split on commas.
  pub fn parse(kind: FieldKind, raw: &str) -> Self {
    let raw = raw.trim();
    if raw.is_empty() {
      return Self::Absent;
    }
    match kind {
      FieldKind::Text => Self::Text(raw.to_owned()),
      FieldKind::Date => parse_date(raw).map_or(Self::Absent, Self::Date),
      FieldKind::List => {
        let items: Vec<String> = raw
          .split(',')
          .map(str::trim)
          .filter(|item| !item.is_empty())
          .map(str::to_owned)
          .collect();
        if items.is_empty() { Self::Absent } else { Self::List(items) }
      }
    }
  }

  /// The canonical string form used for change detection and export.
  pub fn stringify(&self) -> String {
    match self {
      Self::Absent => String::new(),
      Self::Text(s) => s.clone(),
      Self::Date(d) => d.format("%Y-%m-%d").to_string(),
      Self::List(items) => items.join(", "),
    }
  }

  /// Coerce into optional text. Lists are joined, dates formatted.
  pub fn into_text(self) -> Option<String> {
    match self {
      Self::Absent => None,
      Self::Text(s) => Some(s),
      other => Some(other.stringify()),
    }
  }

  /// Coerce into an optional date, parsing text permissively.
  pub fn into_date(self) -> Option<NaiveDate> {
    match self {
      Self::Date(d) => Some(d),
      Self::Text(s) => parse_date(s.trim()),
      Self::Absent | Self::List(_) => None,
    }
  }

  /// Coerce into a list, splitting text on commas.
  pub fn into_list(self) -> Vec<String> {
    match self {
      Self::List(items) => items,
      Self::Absent => Vec::new(),
      other => match Self::parse(FieldKind::List, &other.stringify()) {
        Self::List(items) => items,
        _ => Vec::new(),
      },
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.stringify())
  }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<Option<String>> for FieldValue {
  fn from(s: Option<String>) -> Self { s.map_or(Self::Absent, Self::Text) }
}

impl From<Option<NaiveDate>> for FieldValue {
  fn from(d: Option<NaiveDate>) -> Self { d.map_or(Self::Absent, Self::Date) }
}

impl From<Vec<String>> for FieldValue {
  fn from(items: Vec<String>) -> Self {
    if items.is_empty() { Self::Absent } else { Self::List(items) }
  }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// ─── Change detection ────────────────────────────────────────────────────────

/// One field whose stringified value differs between two field sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
  pub field: ContactField,
  pub old:   String,
  pub new:   String,
}

impl fmt::Display for FieldChange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: '{}' → '{}'", self.field.label(), self.old, self.new)
  }
}

/// True when both values stringify identically.
pub fn same(a: &FieldValue, b: &FieldValue) -> bool {
  a.stringify() == b.stringify()
}

/// Every non-photo field whose stringified value differs, in column order.
pub fn diff(old: &ContactFields, new: &ContactFields) -> Vec<FieldChange> {
  ContactField::all()
    .filter(|field| *field != ContactField::Photo)
    .filter_map(|field| {
      let before = old.get(field);
      let after = new.get(field);
      (!same(&before, &after)).then(|| FieldChange {
        field,
        old: before.stringify(),
        new: after.stringify(),
      })
    })
    .collect()
}

/// The consolidated history message for a set of changes, or `None` when
/// nothing changed.
pub fn change_message(changes: &[FieldChange]) -> Option<String> {
  if changes.is_empty() {
    return None;
  }
  Some(
    changes
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(" | "),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_are_snake_case() {
    assert_eq!(ContactField::VehicleReg.key(), "vehicle_reg");
    assert_eq!(ContactField::from_key(" reporting_to ").unwrap(), ContactField::ReportingTo);
    assert!(ContactField::from_key("salary").is_err());
  }

  #[test]
  fn labels_are_title_cased() {
    assert_eq!(ContactField::MaritalStatus.label(), "Marital Status");
    assert_eq!(ContactField::Status.label(), "Status");
  }

  #[test]
  fn absent_and_blank_text_are_the_same() {
    assert!(same(&FieldValue::Absent, &FieldValue::Text(String::new())));
    assert!(!same(&FieldValue::Absent, &FieldValue::from("x")));
  }

  #[test]
  fn dates_parse_in_several_formats() {
    let expected = NaiveDate::from_ymd_opt(1982, 3, 20).unwrap();
    for raw in ["1982-03-20", "20 Mar 1982", "20/03/1982"] {
      assert_eq!(FieldValue::parse(FieldKind::Date, raw), FieldValue::Date(expected));
    }
    assert_eq!(FieldValue::parse(FieldKind::Date, "sometime"), FieldValue::Absent);
  }

  #[test]
  fn lists_split_and_trim() {
    let value = FieldValue::parse(FieldKind::List, "NYR, ALSE ,,");
    assert_eq!(value, FieldValue::List(vec!["NYR".into(), "ALSE".into()]));
    assert_eq!(value.stringify(), "NYR, ALSE");
  }

  #[test]
  fn change_renders_label_and_quotes() {
    let change = FieldChange {
      field: ContactField::Status,
      old:   "Active".into(),
      new:   "Inactive".into(),
    };
    assert_eq!(change.to_string(), "Status: 'Active' → 'Inactive'");
    assert_eq!(change_message(&[]), None);
  }
}
