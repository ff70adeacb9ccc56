//! [`ContactStore`] — the in-memory contact directory for one session.
//!
//! The store is a plain owned value: callers hold it and pass it by reference.
//! Every mutation runs to completion synchronously and records its own audit
//! trail. Nothing is persisted and nothing is ever deleted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  contact::{Comment, Contact, ContactFields, ContactId, CreationSource},
  field::{self, ContactField, FieldChange, FieldValue},
};

/// Message appended to a contact's history when a comment is posted.
pub const COMMENT_MESSAGE: &str = "New Comment Added";

/// One field value to propagate in a selective sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSelection {
  pub field: ContactField,
  pub value: FieldValue,
}

impl SyncSelection {
  pub fn new(field: ContactField, value: impl Into<FieldValue>) -> Self {
    Self { field, value: value.into() }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Mapping of identifier to contact, iterated in id order.
#[derive(Debug, Default)]
pub struct ContactStore {
  contacts: BTreeMap<ContactId, Contact>,
}

impl ContactStore {
  pub fn new() -> Self { Self::default() }

  /// One more than the highest id present, or 1 when empty.
  fn next_id(&self) -> Result<ContactId> {
    match self.contacts.last_key_value() {
      None => Ok(ContactId(1)),
      Some((id, _)) => id.0.checked_add(1).map(ContactId).ok_or(Error::IdsExhausted),
    }
  }

  fn contact_mut(&mut self, id: ContactId) -> Result<&mut Contact> {
    self.contacts.get_mut(&id).ok_or(Error::ContactNotFound(id))
  }

  /// Ids of every other contact whose company stringifies equal to the
  /// source's current company.
  fn sibling_ids(&self, source_id: ContactId) -> Result<Vec<ContactId>> {
    let source = self.get(source_id).ok_or(Error::ContactNotFound(source_id))?;
    let company = source.fields.get(ContactField::Company);
    Ok(
      self
        .contacts
        .values()
        .filter(|c| c.id() != source_id)
        .filter(|c| field::same(&c.fields.get(ContactField::Company), &company))
        .map(Contact::id)
        .collect(),
    )
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Insert a new contact with the next id and a single creation entry in
  /// its history.
  ///
  /// Manual creation requires a non-blank name and company. Seeded and
  /// imported contacts are inserted without validation.
  pub fn create(
    &mut self,
    fields: ContactFields,
    actor: &str,
    at: DateTime<Utc>,
    source: CreationSource,
  ) -> Result<&Contact> {
    if source == CreationSource::ManualCreation {
      for (field, value) in [
        (ContactField::Name, fields.name_str()),
        (ContactField::Company, fields.company_str()),
      ] {
        if value.trim().is_empty() {
          return Err(Error::MissingRequiredField(field));
        }
      }
    }

    let id = self.next_id()?;
    tracing::debug!(%id, source = source.label(), actor, "creating contact");
    let contact = Contact::new(id, fields, actor, at, source);
    Ok(self.contacts.entry(id).or_insert(contact))
  }

  /// Replace a contact's descriptive fields, recording every changed field
  /// in one consolidated history entry.
  ///
  /// Fields are overwritten even when unchanged. A `None` or blank photo
  /// keeps the existing one. Returns the detected changes; when empty, no
  /// history entry was appended.
  pub fn update(
    &mut self,
    id: ContactId,
    mut fields: ContactFields,
    actor: &str,
    at: DateTime<Utc>,
  ) -> Result<Vec<FieldChange>> {
    let contact = self.contact_mut(id)?;

    let changes = field::diff(&contact.fields, &fields);
    if let Some(message) = field::change_message(&changes) {
      contact.record(actor, at, message);
    }

    if fields.photo.as_deref().is_none_or(|p| p.trim().is_empty()) {
      fields.photo = contact.fields.photo.take();
    }
    contact.fields = fields;
    contact.touch(actor, at);

    tracing::debug!(%id, changed = changes.len(), actor, "contact updated");
    Ok(changes)
  }

  /// Write the selected field values into every other contact at the
  /// source's company. Returns the number of contacts touched.
  ///
  /// Each sibling gets one history entry per selection, and its
  /// `last_updated_by_name` reads `Sync via <actor>` so sync-originated
  /// changes stay distinguishable from direct edits. Writes are not rolled
  /// back if a later one fails.
  pub fn selective_sync(
    &mut self,
    source_id: ContactId,
    selections: &[SyncSelection],
    actor: &str,
    at: DateTime<Utc>,
  ) -> Result<usize> {
    let siblings = self.sibling_ids(source_id)?;
    if selections.is_empty() {
      return Ok(0);
    }

    let synced_by = format!("Sync via {actor}");
    for selection in selections {
      for id in &siblings {
        let contact = self.contact_mut(*id)?;
        contact.fields.set(selection.field, selection.value.clone());
        contact.touch(synced_by.as_str(), at);
        contact.record(actor, at, format!("Bulk Sync: {} updated", selection.field.key()));
      }
    }

    tracing::debug!(%source_id, siblings = siblings.len(), fields = selections.len(), "selective sync");
    Ok(siblings.len())
  }

  /// Append a comment and a matching history entry. Empty text is accepted.
  pub fn add_comment(
    &mut self,
    id: ContactId,
    text: impl Into<String>,
    actor: &str,
    at: DateTime<Utc>,
  ) -> Result<()> {
    let contact = self.contact_mut(id)?;
    contact.push_comment(Comment { actor: actor.to_owned(), text: text.into() });
    contact.record(actor, at, COMMENT_MESSAGE);
    tracing::debug!(%id, actor, "comment added");
    Ok(())
  }

  /// Create one contact per row, in order, with [`CreationSource::BulkImport`].
  ///
  /// Rows are not validated or deduplicated. Returns the number of rows
  /// imported. Rows inserted before an error are kept.
  pub fn bulk_import(
    &mut self,
    rows: impl IntoIterator<Item = ContactFields>,
    actor: &str,
    at: DateTime<Utc>,
  ) -> Result<usize> {
    let mut imported = 0;
    for fields in rows {
      let id = self.next_id()?;
      self.contacts.insert(id, Contact::new(id, fields, actor, at, CreationSource::BulkImport));
      imported += 1;
    }
    tracing::info!(imported, actor, "bulk import");
    Ok(imported)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn get(&self, id: ContactId) -> Option<&Contact> { self.contacts.get(&id) }

  /// Every contact, ordered by id.
  pub fn contacts(&self) -> impl Iterator<Item = &Contact> { self.contacts.values() }

  pub fn len(&self) -> usize { self.contacts.len() }

  pub fn is_empty(&self) -> bool { self.contacts.is_empty() }

  /// Contacts a selective sync from `source_id` would touch.
  pub fn sync_preview(&self, source_id: ContactId) -> Result<Vec<&Contact>> {
    Ok(
      self
        .sibling_ids(source_id)?
        .into_iter()
        .filter_map(|id| self.get(id))
        .collect(),
    )
  }

  /// First contact whose name matches exactly.
  ///
  /// This is how a `reporting_to` name is resolved for display. It is a
  /// best-effort lookup: names are not unique and references may dangle.
  pub fn find_by_name(&self, name: &str) -> Option<&Contact> {
    self.contacts.values().find(|c| c.name() == name)
  }

  /// Distinct company names, sorted.
  pub fn companies(&self) -> Vec<&str> {
    self
      .contacts
      .values()
      .map(Contact::company)
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 1, 10, 2, 30, 0).unwrap() }

  #[test]
  fn ids_stop_at_the_top_of_the_range() {
    let mut store = ContactStore::new();
    let last = ContactId(u64::MAX);
    store.contacts.insert(
      last,
      Contact::new(last, ContactFields::default(), "System", at(), CreationSource::InitialEntry),
    );

    let err = store
      .create(ContactFields::default(), "System", at(), CreationSource::InitialEntry)
      .unwrap_err();
    assert!(matches!(err, Error::IdsExhausted));

    let err = store
      .bulk_import(vec![ContactFields::default()], "System", at())
      .unwrap_err();
    assert!(matches!(err, Error::IdsExhausted));
    assert_eq!(store.len(), 1);
  }
}
