//! Read-only projections over the store: search, sort, grouping, birthday
//! spotlight and reporting hierarchy.
//!
//! None of these mutate or cache anything; they are recomputed from the
//! store on every render.

use chrono::{Datelike, Month, NaiveDate};

use crate::{
  catalog::Catalog,
  contact::{Contact, ContactId},
  store::ContactStore,
};

/// Sort key used for contacts without a country or company, placing them last.
const MISSING_SORT_KEY: &str = "zzz";

/// Number of months covered by the birthday spotlight, current month included.
pub const SPOTLIGHT_MONTHS: u32 = 3;

// ─── Query ───────────────────────────────────────────────────────────────────

/// Filters for the main listing. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct DirectoryQuery {
  /// Case-insensitive substring matched against name and company.
  pub text:       Option<String>,
  /// Contact's country must be one of these.
  pub countries:  Vec<String>,
  /// Contact's category must be one of these.
  pub categories: Vec<String>,
}

impl DirectoryQuery {
  pub fn matches(&self, contact: &Contact) -> bool {
    let fields = &contact.fields;

    let text_ok = match self.text.as_deref().map(str::trim) {
      None | Some("") => true,
      Some(text) => {
        let needle = text.to_lowercase();
        contact.name().to_lowercase().contains(&needle)
          || contact.company().to_lowercase().contains(&needle)
      }
    };

    let in_list = |filter: &[String], value: Option<&String>| {
      filter.is_empty() || value.is_some_and(|v| filter.contains(v))
    };

    text_ok
      && in_list(&self.countries, fields.country.as_ref())
      && in_list(&self.categories, fields.category.as_ref())
  }
}

/// Contacts matching `query`, ordered by country, then company, then
/// category priority.
pub fn listing<'a>(
  store: &'a ContactStore,
  query: &DirectoryQuery,
  catalog: &Catalog,
) -> Vec<&'a Contact> {
  let mut contacts: Vec<&Contact> = store.contacts().filter(|c| query.matches(c)).collect();
  contacts.sort_by_cached_key(|c| {
    let key = |value: Option<&String>| {
      value.map_or_else(|| MISSING_SORT_KEY.to_owned(), |v| v.to_lowercase())
    };
    (
      key(c.fields.country.as_ref()),
      key(c.fields.company.as_ref()),
      catalog.category_priority(c.fields.category.as_deref()),
    )
  });
  contacts
}

// ─── Grouping ────────────────────────────────────────────────────────────────

/// Contacts at one company within a country section.
#[derive(Debug)]
pub struct CompanyGroup<'a> {
  pub company:  Option<&'a str>,
  pub contacts: Vec<&'a Contact>,
}

/// One country section of the listing.
#[derive(Debug)]
pub struct CountryGroup<'a> {
  pub country:   Option<&'a str>,
  pub companies: Vec<CompanyGroup<'a>>,
}

/// Group an already-sorted listing into country and company sections,
/// starting a new section whenever the value changes.
pub fn group<'a>(sorted: &[&'a Contact]) -> Vec<CountryGroup<'a>> {
  let mut groups: Vec<CountryGroup<'a>> = Vec::new();

  for &contact in sorted {
    let country = contact.fields.country.as_deref();
    let company = contact.fields.company.as_deref();

    let new_country = groups.last().is_none_or(|g| g.country != country);
    if new_country {
      groups.push(CountryGroup { country, companies: Vec::new() });
    }
    let Some(section) = groups.last_mut() else { continue };

    let new_company = section.companies.last().is_none_or(|g| g.company != company);
    if new_company {
      section.companies.push(CompanyGroup { company, contacts: Vec::new() });
    }
    if let Some(group) = section.companies.last_mut() {
      group.contacts.push(contact);
    }
  }

  groups
}

// ─── Birthday spotlight ──────────────────────────────────────────────────────

/// Contacts with a birthday in one calendar month.
#[derive(Debug)]
pub struct BirthdayMonth<'a> {
  pub month:    Month,
  /// Ordered by day of month.
  pub contacts: Vec<&'a Contact>,
}

/// Birthdays in the current month and the following two, wrapping from
/// December into January. Months without birthdays are omitted.
pub fn birthday_spotlight(store: &ContactStore, today: NaiveDate) -> Vec<BirthdayMonth<'_>> {
  (0..SPOTLIGHT_MONTHS)
    .filter_map(|offset| {
      let month_number = (today.month0() + offset) % 12 + 1;
      let month = u8::try_from(month_number)
        .ok()
        .and_then(|m| Month::try_from(m).ok())?;

      let mut contacts: Vec<&Contact> = store
        .contacts()
        .filter(|c| c.fields.birthdate.is_some_and(|b| b.month() == month_number))
        .collect();
      if contacts.is_empty() {
        return None;
      }
      contacts.sort_by_key(|c| c.fields.birthdate.map(|b| b.day()));
      Some(BirthdayMonth { month, contacts })
    })
    .collect()
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

/// One contact's place in its company's reporting chain.
#[derive(Debug)]
pub struct ChainLink<'a> {
  pub contact:    &'a Contact,
  /// The `reporting_to` name, if any. `None` marks a head of chain.
  pub reports_to: Option<&'a str>,
  /// The contact that name currently resolves to, if any.
  pub manager:    Option<ContactId>,
}

/// The reporting chain of one company, in store order.
#[derive(Debug)]
pub struct CompanyChain<'a> {
  pub company: &'a str,
  pub links:   Vec<ChainLink<'a>>,
}

/// Reporting lines grouped by company, companies sorted by name.
pub fn hierarchy(store: &ContactStore) -> Vec<CompanyChain<'_>> {
  store
    .companies()
    .into_iter()
    .map(|company| {
      let links = store
        .contacts()
        .filter(|c| c.company() == company)
        .map(|contact| {
          let reports_to = contact
            .fields
            .reporting_to
            .as_deref()
            .filter(|name| !name.trim().is_empty());
          let manager = reports_to.and_then(|name| store.find_by_name(name)).map(Contact::id);
          ChainLink { contact, reports_to, manager }
        })
        .collect();
      CompanyChain { company, links }
    })
    .collect()
}
