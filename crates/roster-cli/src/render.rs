//! Plain-text rendering of the directory.
//!
//! Absent fields are filled in here, at read time: "N/A" for most, and the
//! listing badges fall back to Active / Local / Tier D.

use std::fmt::Write as _;

use chrono::NaiveDate;
use roster_core::{
  catalog::Catalog,
  contact::Contact,
  directory::{BirthdayMonth, CompanyChain, CountryGroup},
  store::ContactStore,
};

use crate::config::DisplayConfig;

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> &str {
  value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn age_text(contact: &Contact, today: NaiveDate) -> String {
  contact
    .age_on(today)
    .map_or_else(|| NOT_AVAILABLE.to_owned(), |age| age.to_string())
}

fn date_text(date: Option<NaiveDate>, format: &str) -> String {
  date.map_or_else(|| NOT_AVAILABLE.to_owned(), |d| d.format(format).to_string())
}

fn badges(contact: &Contact) -> String {
  let fields = &contact.fields;
  format!(
    "[{}] [{}] [Tier {}]",
    fields.status.as_deref().unwrap_or("Active"),
    fields.category.as_deref().unwrap_or("Local"),
    fields.tier.as_deref().unwrap_or("D"),
  )
}

/// `reporting_to` as display text, linked to an id when the name resolves.
fn reports_to(contact: &Contact, store: &ContactStore) -> String {
  match contact.fields.reporting_to.as_deref() {
    Some(name) if !name.trim().is_empty() => match store.find_by_name(name) {
      Some(manager) => format!("{name} (#{})", manager.id()),
      None => name.to_owned(),
    },
    _ => NOT_AVAILABLE.to_owned(),
  }
}

// ─── Listing ──────────────────────────────────────────────────────────────────

/// The grouped main listing: one summary line per contact.
pub fn listing(groups: &[CountryGroup<'_>], today: NaiveDate) -> String {
  if groups.is_empty() {
    return "No contacts match.\n".into();
  }

  let mut out = String::new();
  for country in groups {
    let _ = writeln!(out, "\n🌍 {}", or_na(country.country));
    for company in &country.companies {
      let _ = writeln!(out, "  🏢 {}", or_na(company.company));
      for contact in &company.contacts {
        let _ = writeln!(
          out,
          "    #{:<4} {} ({} yrs) · {} · {}",
          contact.id().0,
          or_na(Some(contact.name())),
          age_text(contact, today),
          or_na(contact.fields.appointment.as_deref()),
          badges(contact),
        );
      }
    }
  }
  out
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// Full profile of one contact.
pub fn detail(
  contact: &Contact,
  store: &ContactStore,
  display: &DisplayConfig,
  today: NaiveDate,
) -> String {
  let f = &contact.fields;
  let mut out = String::new();

  let _ = writeln!(
    out,
    "#{} {} ({} yrs)  {}",
    contact.id(),
    or_na(f.name.as_deref()),
    age_text(contact, today),
    badges(contact),
  );
  let _ = writeln!(out, "{}, {}", or_na(f.appointment.as_deref()), or_na(f.company.as_deref()));
  let _ = writeln!(out);

  let golf = f.golf.as_deref().unwrap_or("No");
  let rows: Vec<(&str, String)> = vec![
    ("Country", or_na(f.country.as_deref()).to_owned()),
    ("Birthdate", date_text(f.birthdate, "%d %b %Y")),
    ("Mobile", or_na(f.mobile.as_deref()).to_owned()),
    ("Office", or_na(f.office.as_deref()).to_owned()),
    ("Email", or_na(f.email.as_deref()).to_owned()),
    ("Reports to", reports_to(contact, store)),
    ("Spouse", or_na(f.spouse.as_deref()).to_owned()),
    (
      "Golf",
      if golf == "Yes" {
        format!("Yes (handicap {})", or_na(f.handicap.as_deref()))
      } else {
        golf.to_owned()
      },
    ),
    ("Office address", or_na(f.address.as_deref()).to_owned()),
    ("Hobbies", or_na(f.hobbies.as_deref()).to_owned()),
    ("Dietary", or_na(f.dietary.as_deref()).to_owned()),
    ("Receptions", f.receptions.join(", ")),
    ("Festivities", f.festivities.join(", ")),
    ("Marital", or_na(f.marital_status.as_deref()).to_owned()),
    ("Children", f.children.clone().unwrap_or_else(|| "Uncertain / Unknown".into())),
    ("Vehicle reg", or_na(f.vehicle_reg.as_deref()).to_owned()),
    ("Tenure start", date_text(f.assumed_date, "%Y-%m-%d")),
    ("Retired", date_text(f.retire_date, "%Y-%m-%d")),
    ("Photo", f.photo.as_deref().map_or_else(|| display.default_photo.clone(), abbreviate_photo)),
  ];
  for (label, value) in rows {
    let _ = writeln!(out, "  {label:<15} {value}");
  }

  let _ = writeln!(out);
  let _ = writeln!(
    out,
    "🚩 Last updated: {} by {}",
    display.timestamp(contact.last_updated_at),
    contact.last_updated_by_name,
  );
  let _ = writeln!(
    out,
    "🕒 History ({})   💬 Comments ({})",
    contact.history().len(),
    contact.comments().len(),
  );
  for comment in contact.comments() {
    let _ = writeln!(out, "  {}: {}", comment.actor, comment.text);
  }
  out
}

/// Data URIs are long; show the media type and size instead.
fn abbreviate_photo(photo: &str) -> String {
  match photo.strip_prefix("data:").and_then(|rest| rest.split_once(';')) {
    Some((mime, payload)) => format!("<{mime}, {} bytes encoded>", payload.len()),
    None => photo.to_owned(),
  }
}

/// Audit trail, newest first.
pub fn history(contact: &Contact, display: &DisplayConfig) -> String {
  let mut out = format!("Audit history for #{} {}\n", contact.id(), contact.name());
  for entry in contact.history().iter().rev() {
    let _ = writeln!(out, "📅 {} | 👤 {}", display.timestamp(entry.at), entry.actor);
    let _ = writeln!(out, "  - {}", entry.message);
  }
  out
}

// ─── Other views ──────────────────────────────────────────────────────────────

pub fn birthdays(months: &[BirthdayMonth<'_>]) -> String {
  if months.is_empty() {
    return "No birthdays in the next three months.\n".into();
  }
  let mut out = String::from("🎂 Birthday spotlight\n");
  for month in months {
    let _ = writeln!(out, "{}", month.month.name());
    for contact in &month.contacts {
      let _ = writeln!(
        out,
        "  {} ({})",
        contact.name(),
        date_text(contact.fields.birthdate, "%d %b"),
      );
    }
  }
  out
}

pub fn hierarchy(chains: &[CompanyChain<'_>]) -> String {
  let mut out = String::new();
  for chain in chains {
    let _ = writeln!(out, "🏢 {}", or_na(Some(chain.company)));
    for link in &chain.links {
      let who = link.contact.name();
      let role = or_na(link.contact.fields.appointment.as_deref());
      match link.reports_to {
        Some(manager) => {
          let _ = writeln!(out, "  ↳ {who} ({role}) reports to {manager}");
        }
        None => {
          let _ = writeln!(out, "  👑 {who} ({role}) [Head of Chain]");
        }
      }
    }
  }
  out
}

pub fn catalog(catalog: &Catalog) -> String {
  let lists: [(&str, &[String]); 7] = [
    ("Categories", catalog.categories.as_slice()),
    ("Statuses", catalog.statuses.as_slice()),
    ("Countries", catalog.countries.as_slice()),
    ("Tiers", catalog.tiers.as_slice()),
    ("Marital statuses", catalog.marital_statuses.as_slice()),
    ("Festivities", catalog.festivities.as_slice()),
    ("Receptions", catalog.receptions.as_slice()),
  ];
  let mut out = String::new();
  for (label, values) in lists {
    let _ = writeln!(out, "{label:<17} {}", values.join(", "));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_uris_are_abbreviated() {
    assert_eq!(
      abbreviate_photo("data:image/png;base64,iVBORw=="),
      "<image/png, 15 bytes encoded>"
    );
    assert_eq!(abbreviate_photo("https://x/y.png"), "https://x/y.png");
  }

  #[test]
  fn blank_values_read_as_not_available() {
    assert_eq!(or_na(Some("  ")), "N/A");
    assert_eq!(or_na(None), "N/A");
    assert_eq!(or_na(Some("x")), "x");
  }
}
