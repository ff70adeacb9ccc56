//! Contact — one person's directory entry.
//!
//! A contact has a fixed shape: every descriptive field is explicitly
//! optional in [`ContactFields`], and the identity and audit fields live on
//! [`Contact`] itself. History and comments are append-only and can only be
//! extended through the store.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::field::{ContactField, FieldValue};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned numeric identifier. Never reused or changed.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Descriptive fields ──────────────────────────────────────────────────────

/// Every descriptive field of a contact.
///
/// Enumerated fields (status, category, tier, country, marital status,
/// festivities, receptions) hold plain strings; the closed lists they are
/// normally chosen from live in [`crate::catalog::Catalog`], and values
/// outside those lists are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
  pub name:           Option<String>,
  pub birthdate:      Option<NaiveDate>,
  pub company:        Option<String>,
  pub appointment:    Option<String>,
  pub country:        Option<String>,
  pub mobile:         Option<String>,
  pub office:         Option<String>,
  pub email:          Option<String>,
  pub address:        Option<String>,
  pub hobbies:        Option<String>,
  pub dietary:        Option<String>,
  #[serde(default)]
  pub receptions:     Vec<String>,
  #[serde(default)]
  pub festivities:    Vec<String>,
  pub assumed_date:   Option<NaiveDate>,
  pub retire_date:    Option<NaiveDate>,
  pub marital_status: Option<String>,
  pub spouse:         Option<String>,
  pub children:       Option<String>,
  /// Display name of the person this contact reports to. Not a foreign key:
  /// it may name nobody, and renaming the manager does not update it.
  pub reporting_to:   Option<String>,
  pub vehicle_reg:    Option<String>,
  pub golf:           Option<String>,
  pub handicap:       Option<String>,
  pub status:         Option<String>,
  pub category:       Option<String>,
  pub tier:           Option<String>,
  /// Opaque encoded image (URL or data URI). Never decoded by the store.
  pub photo:          Option<String>,
}

impl ContactFields {
  /// Convenience constructor for the two fields manual entry requires.
  pub fn named(name: impl Into<String>, company: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      company: Some(company.into()),
      ..Self::default()
    }
  }

  /// Read one field as a [`FieldValue`].
  pub fn get(&self, field: ContactField) -> FieldValue {
    use ContactField as F;
    match field {
      F::Name => self.name.clone().into(),
      F::Birthdate => self.birthdate.into(),
      F::Company => self.company.clone().into(),
      F::Appointment => self.appointment.clone().into(),
      F::Country => self.country.clone().into(),
      F::Mobile => self.mobile.clone().into(),
      F::Office => self.office.clone().into(),
      F::Email => self.email.clone().into(),
      F::Address => self.address.clone().into(),
      F::Hobbies => self.hobbies.clone().into(),
      F::Dietary => self.dietary.clone().into(),
      F::Receptions => self.receptions.clone().into(),
      F::Festivities => self.festivities.clone().into(),
      F::AssumedDate => self.assumed_date.into(),
      F::RetireDate => self.retire_date.into(),
      F::MaritalStatus => self.marital_status.clone().into(),
      F::Spouse => self.spouse.clone().into(),
      F::Children => self.children.clone().into(),
      F::ReportingTo => self.reporting_to.clone().into(),
      F::VehicleReg => self.vehicle_reg.clone().into(),
      F::Golf => self.golf.clone().into(),
      F::Handicap => self.handicap.clone().into(),
      F::Status => self.status.clone().into(),
      F::Category => self.category.clone().into(),
      F::Tier => self.tier.clone().into(),
      F::Photo => self.photo.clone().into(),
    }
  }

  /// Write one field, coercing the value to the field's storage shape.
  pub fn set(&mut self, field: ContactField, value: FieldValue) {
    use ContactField as F;
    match field {
      F::Name => self.name = value.into_text(),
      F::Birthdate => self.birthdate = value.into_date(),
      F::Company => self.company = value.into_text(),
      F::Appointment => self.appointment = value.into_text(),
      F::Country => self.country = value.into_text(),
      F::Mobile => self.mobile = value.into_text(),
      F::Office => self.office = value.into_text(),
      F::Email => self.email = value.into_text(),
      F::Address => self.address = value.into_text(),
      F::Hobbies => self.hobbies = value.into_text(),
      F::Dietary => self.dietary = value.into_text(),
      F::Receptions => self.receptions = value.into_list(),
      F::Festivities => self.festivities = value.into_list(),
      F::AssumedDate => self.assumed_date = value.into_date(),
      F::RetireDate => self.retire_date = value.into_date(),
      F::MaritalStatus => self.marital_status = value.into_text(),
      F::Spouse => self.spouse = value.into_text(),
      F::Children => self.children = value.into_text(),
      F::ReportingTo => self.reporting_to = value.into_text(),
      F::VehicleReg => self.vehicle_reg = value.into_text(),
      F::Golf => self.golf = value.into_text(),
      F::Handicap => self.handicap = value.into_text(),
      F::Status => self.status = value.into_text(),
      F::Category => self.category = value.into_text(),
      F::Tier => self.tier = value.into_text(),
      F::Photo => self.photo = value.into_text(),
    }
  }

  /// Write one field from raw text, parsed according to the field's kind.
  pub fn set_raw(&mut self, field: ContactField, raw: &str) {
    self.set(field, FieldValue::parse(field.kind(), raw));
  }

  /// `name`, or empty when absent.
  pub fn name_str(&self) -> &str { self.name.as_deref().unwrap_or_default() }

  /// `company`, or empty when absent.
  pub fn company_str(&self) -> &str { self.company.as_deref().unwrap_or_default() }
}

// ─── Audit records ───────────────────────────────────────────────────────────

/// An immutable, timestamped, actor-attributed audit log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub at:      DateTime<Utc>,
  pub actor:   String,
  pub message: String,
}

/// A free-text remark attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub actor: String,
  pub text:  String,
}

/// Where a contact came from; the label becomes its first history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationSource {
  /// Seeded at session start.
  InitialEntry,
  BulkImport,
  /// Single-entry form; the only source that requires name and company.
  ManualCreation,
}

impl CreationSource {
  pub fn label(self) -> &'static str {
    match self {
      Self::InitialEntry => "Initial Entry",
      Self::BulkImport => "Bulk Import",
      Self::ManualCreation => "Manual Creation",
    }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A directory record: identity, descriptive fields and audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
  id:                       ContactId,
  pub fields:               ContactFields,
  pub last_updated_at:      DateTime<Utc>,
  pub last_updated_by_name: String,
  history:                  Vec<HistoryEntry>,
  comments:                 Vec<Comment>,
}

impl Contact {
  pub(crate) fn new(
    id: ContactId,
    fields: ContactFields,
    actor: &str,
    at: DateTime<Utc>,
    source: CreationSource,
  ) -> Self {
    Self {
      id,
      fields,
      last_updated_at: at,
      last_updated_by_name: actor.to_owned(),
      history: vec![HistoryEntry {
        at,
        actor: actor.to_owned(),
        message: source.label().to_owned(),
      }],
      comments: Vec::new(),
    }
  }

  pub fn id(&self) -> ContactId { self.id }

  /// The audit trail, oldest first.
  pub fn history(&self) -> &[HistoryEntry] { &self.history }

  /// Comments, oldest first.
  pub fn comments(&self) -> &[Comment] { &self.comments }

  pub fn name(&self) -> &str { self.fields.name_str() }

  pub fn company(&self) -> &str { self.fields.company_str() }

  pub(crate) fn record(&mut self, actor: &str, at: DateTime<Utc>, message: impl Into<String>) {
    self.history.push(HistoryEntry {
      at,
      actor: actor.to_owned(),
      message: message.into(),
    });
  }

  pub(crate) fn push_comment(&mut self, comment: Comment) { self.comments.push(comment); }

  pub(crate) fn touch(&mut self, by: impl Into<String>, at: DateTime<Utc>) {
    self.last_updated_by_name = by.into();
    self.last_updated_at = at;
  }

  /// Whole years since `birthdate` as of `today`, if a birthdate is known.
  pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
    self.fields.birthdate.map(|birthdate| age_between(birthdate, today))
  }
}

/// Whole years between `birthdate` and `today`.
pub fn age_between(birthdate: NaiveDate, today: NaiveDate) -> i32 {
  let had_birthday = (today.month(), today.day()) >= (birthdate.month(), birthdate.day());
  today.year() - birthdate.year() - i32::from(!had_birthday)
}

/// The birthdate recorded when only an age is known: 1 January of
/// `today.year() - age`.
pub fn birthdate_from_age(age: u32, today: NaiveDate) -> Option<NaiveDate> {
  let year = today.year().checked_sub(i32::try_from(age).ok()?)?;
  NaiveDate::from_ymd_opt(year, 1, 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn age_counts_completed_years() {
    assert_eq!(age_between(date(1960, 1, 5), date(2026, 1, 4)), 65);
    assert_eq!(age_between(date(1960, 1, 5), date(2026, 1, 5)), 66);
  }

  #[test]
  fn age_only_input_lands_on_new_year() {
    assert_eq!(birthdate_from_age(40, date(2026, 10, 18)), Some(date(1986, 1, 1)));
  }

  #[test]
  fn set_raw_coerces_by_kind() {
    let mut fields = ContactFields::default();
    fields.set_raw(ContactField::Festivities, "Christmas, Deepavali");
    fields.set_raw(ContactField::AssumedDate, "2010-05-01");
    fields.set_raw(ContactField::RetireDate, "not a date");
    fields.set_raw(ContactField::Tier, "Z");

    assert_eq!(fields.festivities, vec!["Christmas", "Deepavali"]);
    assert_eq!(fields.assumed_date, Some(date(2010, 5, 1)));
    assert_eq!(fields.retire_date, None);
    assert_eq!(fields.tier.as_deref(), Some("Z"));
  }

  #[test]
  fn get_and_set_agree_for_every_field() {
    let mut fields = ContactFields::default();
    for field in ContactField::all() {
      let raw = match field.kind() {
        crate::field::FieldKind::Date => "2001-02-03",
        _ => "value",
      };
      fields.set_raw(field, raw);
      assert_eq!(fields.get(field).stringify(), raw, "{field}");
    }
  }
}
