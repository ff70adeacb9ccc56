//! Configured closed lists for the enumerated contact fields.
//!
//! The lists are supplied by configuration rather than derived from data.
//! The store never validates against them; presentation uses them for choices
//! and the directory uses the category order for sorting.

use serde::Deserialize;

use crate::{
  contact::ContactFields,
  field::{ContactField, FieldValue},
};

/// The enumerations offered when entering or editing contacts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Catalog {
  /// Ordered by sort priority: earlier categories list first.
  pub categories:       Vec<String>,
  pub statuses:         Vec<String>,
  pub countries:        Vec<String>,
  pub tiers:            Vec<String>,
  pub marital_statuses: Vec<String>,
  pub festivities:      Vec<String>,
  pub receptions:       Vec<String>,
}

impl Default for Catalog {
  fn default() -> Self {
    fn owned(items: &[&str]) -> Vec<String> { items.iter().map(|s| (*s).to_owned()).collect() }

    Self {
      categories:       owned(&["Chief", "Deputy Chief", "Overseas", "Local", "Others"]),
      statuses:         owned(&["Active", "Inactive"]),
      countries:        owned(&[
        "Singapore", "Malaysia", "USA", "UK", "Australia", "Japan", "China", "India",
      ]),
      tiers:            owned(&["A", "B", "C", "D"]),
      marital_statuses: owned(&["Single", "Married", "Divorced", "Widowed"]),
      festivities:      owned(&[
        "Chinese New Year", "Hari Raya", "Deepavali", "Christmas", "National Day",
      ]),
      receptions:       owned(&["ALSE", "NYR", "BigShow", "National Day"]),
    }
  }
}

impl Catalog {
  /// The closed list governing `field`, if it is an enumerated field.
  pub fn options(&self, field: ContactField) -> Option<&[String]> {
    use ContactField as F;
    let list = match field {
      F::Category => &self.categories,
      F::Status => &self.statuses,
      F::Country => &self.countries,
      F::Tier => &self.tiers,
      F::MaritalStatus => &self.marital_statuses,
      F::Festivities => &self.festivities,
      F::Receptions => &self.receptions,
      _ => return None,
    };
    Some(list.as_slice())
  }

  /// Values of `field` in `fields` that fall outside the configured list.
  ///
  /// Used for warnings only; such values are stored regardless.
  pub fn unknown_values(
    &self,
    field: ContactField,
    fields: &ContactFields,
  ) -> Vec<String> {
    let Some(options) = self.options(field) else {
      return Vec::new();
    };
    let values = match fields.get(field) {
      FieldValue::List(items) => items,
      FieldValue::Text(s) => vec![s],
      _ => Vec::new(),
    };
    values
      .into_iter()
      .filter(|value| !options.iter().any(|o| o == value))
      .collect()
  }

  /// Sort priority of a category: its 1-based position in `categories`.
  /// Unknown or absent categories rank with the last configured category.
  pub fn category_priority(&self, category: Option<&str>) -> usize {
    let last = self.categories.len().max(1);
    category
      .and_then(|c| self.categories.iter().position(|known| known == c))
      .map_or(last, |idx| idx + 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_priority_follows_configured_order() {
    let catalog = Catalog::default();
    assert_eq!(catalog.category_priority(Some("Chief")), 1);
    assert_eq!(catalog.category_priority(Some("Local")), 4);
    assert_eq!(catalog.category_priority(Some("Ambassador")), 5);
    assert_eq!(catalog.category_priority(None), 5);
  }

  #[test]
  fn unknown_values_are_reported_not_rejected() {
    let catalog = Catalog::default();
    let mut fields = ContactFields::default();
    fields.receptions = vec!["NYR".into(), "Gala".into()];
    fields.tier = Some("A".into());

    assert_eq!(catalog.unknown_values(ContactField::Receptions, &fields), vec!["Gala"]);
    assert!(catalog.unknown_values(ContactField::Tier, &fields).is_empty());
    assert!(catalog.options(ContactField::Email).is_none());
  }
}
