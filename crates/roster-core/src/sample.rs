//! Sample directory seeded at session start.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  contact::{ContactFields, CreationSource},
  store::ContactStore,
};

/// Actor recorded against seeded contacts.
pub const SEED_ACTOR: &str = "System";

const AVATAR_FEMALE: &str = "https://www.w3schools.com/howto/img_avatar2.png";
const AVATAR_MALE: &str = "https://www.w3schools.com/howto/img_avatar.png";

fn text(s: &str) -> Option<String> { Some(s.to_owned()) }

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> { NaiveDate::from_ymd_opt(y, m, d) }

/// Four people across two companies, with one cross-company reporting line.
pub fn sample_contacts() -> Vec<ContactFields> {
  vec![
    ContactFields {
      name: text("Lim Boon Hock"),
      birthdate: date(1960, 1, 5),
      company: text("Global Corp Group"),
      appointment: text("Group Chairman"),
      country: text("Singapore"),
      mobile: text("+65 9000 1111"),
      office: text("+65 6111 2222"),
      email: text("bh.lim@globalcorp.com"),
      address: text("1 Marina Boulevard, Singapore"),
      hobbies: text("Wine Tasting"),
      dietary: text("Halal"),
      receptions: vec!["NYR".into()],
      festivities: vec!["Chinese New Year".into()],
      assumed_date: date(2010, 5, 1),
      marital_status: text("Married"),
      spouse: text("Siti Aminah"),
      children: text("3"),
      vehicle_reg: text("S1K"),
      golf: text("Yes"),
      handicap: text("12"),
      status: text("Active"),
      category: text("Chief"),
      tier: text("A"),
      photo: text(AVATAR_FEMALE),
      ..ContactFields::default()
    },
    ContactFields {
      name: text("Tan Ah Teck"),
      birthdate: date(1975, 2, 14),
      company: text("Global Corp Group"),
      appointment: text("CEO, Singapore"),
      country: text("Singapore"),
      mobile: text("+65 9123 4567"),
      reporting_to: text("Lim Boon Hock"),
      status: text("Active"),
      category: text("Chief"),
      tier: text("A"),
      photo: text(AVATAR_MALE),
      ..ContactFields::default()
    },
    ContactFields {
      name: text("James Smith"),
      birthdate: date(1982, 3, 20),
      company: text("TechVantage Ltd"),
      appointment: text("Managing Director"),
      country: text("Australia"),
      mobile: text("+61 412 345 678"),
      reporting_to: text("Lim Boon Hock"),
      status: text("Active"),
      category: text("Overseas"),
      tier: text("B"),
      photo: text(AVATAR_MALE),
      ..ContactFields::default()
    },
    ContactFields {
      name: text("Sarah Connor"),
      birthdate: date(1985, 1, 28),
      company: text("TechVantage Ltd"),
      appointment: text("Operations Manager"),
      country: text("Australia"),
      mobile: text("+61 499 888 777"),
      reporting_to: text("James Smith"),
      status: text("Active"),
      category: text("Overseas"),
      tier: text("C"),
      photo: text(AVATAR_FEMALE),
      ..ContactFields::default()
    },
  ]
}

/// Seed `store` with [`sample_contacts`] as initial entries.
pub fn seed(store: &mut ContactStore, at: DateTime<Utc>) -> crate::Result<usize> {
  let rows = sample_contacts();
  let count = rows.len();
  for fields in rows {
    store.create(fields, SEED_ACTOR, at, CreationSource::InitialEntry)?;
  }
  Ok(count)
}
