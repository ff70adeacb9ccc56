//! One interactive session: the store, the operator and the command
//! dispatcher.
//!
//! Each command makes at most one kind of store call and returns the text to
//! print. Nothing outlives the session.

use std::{
  fs::File,
  io::{BufWriter, Write as _},
  path::Path,
};

use anyhow::{Context as _, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser as _;
use roster_core::{
  contact::{self, ContactFields, ContactId, CreationSource},
  directory::{self, DirectoryQuery},
  field::{self, ContactField},
  sample,
  store::{ContactStore, SyncSelection},
};

use crate::{
  command::{AddArgs, Command, EditArgs, Line, split_assignment},
  config::{Role, Settings},
  photo, render,
};

/// What the caller should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
  /// Print this text and read the next line.
  Output(String),
  /// Blank input; nothing to print.
  Nothing,
  Quit,
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct Session {
  store:    ContactStore,
  settings: Settings,
  clock:    Clock,
}

impl Session {
  /// Start a session on the system clock, seeding sample data if
  /// configured.
  pub fn new(settings: Settings) -> anyhow::Result<Self> {
    Self::with_clock(settings, Box::new(Utc::now))
  }

  pub fn with_clock(settings: Settings, clock: Clock) -> anyhow::Result<Self> {
    let mut session = Self { store: ContactStore::new(), settings, clock };
    if session.settings.seed_sample_data {
      let at = session.now();
      let seeded = sample::seed(&mut session.store, at).context("seeding sample data")?;
      tracing::info!(seeded, "sample directory loaded");
    }
    Ok(session)
  }

  pub fn store(&self) -> &ContactStore { &self.store }

  fn now(&self) -> DateTime<Utc> { (self.clock)() }

  /// Today's date in the display timezone.
  fn today(&self) -> NaiveDate {
    self.now().with_timezone(&self.settings.display.offset()).date_naive()
  }

  fn require_admin(&self, action: &str) -> anyhow::Result<()> {
    if self.settings.operator.role != Role::Admin {
      bail!("`{action}` requires the admin role");
    }
    Ok(())
  }

  /// Log enumerated values that fall outside the catalog. They are stored
  /// regardless.
  fn warn_unknown_values(&self, fields: &ContactFields) {
    for field in ContactField::all() {
      let unknown = self.settings.catalog.unknown_values(field, fields);
      if !unknown.is_empty() {
        tracing::warn!(field = field.key(), values = ?unknown, "value not in catalog; storing as-is");
      }
    }
  }

  // ── Input ─────────────────────────────────────────────────────────────────

  /// Parse and run one line of input. Errors are rendered, never returned.
  pub fn handle_line(&mut self, line: &str) -> Outcome {
    let line = line.trim();
    if line.is_empty() {
      return Outcome::Nothing;
    }
    if matches!(line, "quit" | "exit") {
      return Outcome::Quit;
    }

    let Some(words) = shlex::split(line) else {
      return Outcome::Output("error: unbalanced quotes\n".into());
    };
    let parsed = match Line::try_parse_from(words) {
      Ok(parsed) => parsed,
      Err(e) => return Outcome::Output(e.render().to_string()),
    };

    match self.execute(parsed.command) {
      Ok(text) => Outcome::Output(text),
      Err(e) => {
        tracing::debug!(error = %e, "command failed");
        Outcome::Output(format!("error: {e:#}\n"))
      }
    }
  }

  pub fn execute(&mut self, command: Command) -> anyhow::Result<String> {
    match command {
      Command::List { search, countries, categories } => {
        Ok(self.list(DirectoryQuery { text: search, countries, categories }))
      }
      Command::Show { id } => {
        let contact = self
          .store
          .get(ContactId(id))
          .ok_or(roster_core::Error::ContactNotFound(ContactId(id)))?;
        Ok(render::detail(contact, &self.store, &self.settings.display, self.today()))
      }
      Command::Add(args) => self.add(args),
      Command::Edit(args) => self.edit(args),
      Command::Comment { id, text } => {
        let id = ContactId(id);
        let at = self.now();
        self
          .store
          .add_comment(id, text.join(" "), &self.settings.operator.name, at)?;
        Ok(format!("Comment added to #{id}\n"))
      }
      Command::History { id } => {
        let contact = self
          .store
          .get(ContactId(id))
          .ok_or(roster_core::Error::ContactNotFound(ContactId(id)))?;
        Ok(render::history(contact, &self.settings.display))
      }
      Command::Import { path } => self.import(&path),
      Command::Template { path } => self.template(&path),
      Command::Export { path } => self.export(&path),
      Command::Birthdays => Ok(render::birthdays(&directory::birthday_spotlight(
        &self.store,
        self.today(),
      ))),
      Command::Hierarchy => Ok(render::hierarchy(&directory::hierarchy(&self.store))),
      Command::Catalog => Ok(render::catalog(&self.settings.catalog)),
      Command::Whoami => {
        let operator = &self.settings.operator;
        let role = match operator.role {
          Role::Admin => "admin",
          Role::User => "user",
        };
        Ok(format!("{} <{}> ({role})\n", operator.name, operator.email))
      }
      Command::Role { role } => {
        self.settings.operator.role = role;
        tracing::info!(?role, "operator role changed");
        Ok(format!("Role set to {role:?}\n"))
      }
    }
  }

  // ── Commands ──────────────────────────────────────────────────────────────

  fn list(&self, query: DirectoryQuery) -> String {
    let sorted = directory::listing(&self.store, &query, &self.settings.catalog);
    let groups = directory::group(&sorted);
    let mut out = format!("Showing {} of {} contacts\n", sorted.len(), self.store.len());
    out.push_str(&render::listing(&groups, self.today()));
    out
  }

  fn add(&mut self, args: AddArgs) -> anyhow::Result<String> {
    self.require_admin("add")?;
    let today = self.today();

    let mut fields = ContactFields::default();
    for (field, value) in [
      (ContactField::Name, args.name),
      (ContactField::Company, args.company),
      (ContactField::Appointment, args.appointment),
      (ContactField::ReportingTo, args.reporting_to),
      (ContactField::Birthdate, args.birthdate),
      (ContactField::Country, args.country),
      (ContactField::Category, args.category),
      (ContactField::Tier, args.tier),
      (ContactField::Status, args.status),
    ] {
      if let Some(raw) = value {
        fields.set_raw(field, &raw);
      }
    }
    if let Some(age) = args.age {
      fields.birthdate = contact::birthdate_from_age(age, today);
    }
    apply_assignments(&mut fields, &args.sets)?;
    self.warn_unknown_values(&fields);

    let at = self.now();
    let created = self.store.create(
      fields,
      &self.settings.operator.name,
      at,
      CreationSource::ManualCreation,
    )?;
    tracing::info!(id = %created.id(), "contact created");
    Ok(format!("Created #{} {}\n", created.id(), created.name()))
  }

  /// Commit an edit, then sync the selected fields' committed values to
  /// colleagues at the contact's (possibly new) company.
  fn edit(&mut self, args: EditArgs) -> anyhow::Result<String> {
    self.require_admin("edit")?;
    let id = ContactId(args.id);
    let today = self.today();

    let mut fields = self
      .store
      .get(id)
      .ok_or(roster_core::Error::ContactNotFound(id))?
      .fields
      .clone();
    fields.photo = None;
    apply_assignments(&mut fields, &args.sets)?;
    if let Some(age) = args.age {
      fields.birthdate = contact::birthdate_from_age(age, today);
    }
    if let Some(path) = &args.photo {
      fields.photo = Some(photo::encode_file(path)?);
    }
    let sync_fields = args
      .sync
      .iter()
      .map(|key| ContactField::from_key(key))
      .collect::<roster_core::Result<Vec<_>>>()?;
    self.warn_unknown_values(&fields);

    let at = self.now();
    let actor = self.settings.operator.name.as_str();
    let changes = self.store.update(id, fields, actor, at)?;
    let mut out = match field::change_message(&changes) {
      Some(message) => format!("Updated #{id}: {message}\n"),
      None => format!("No changes to #{id}\n"),
    };

    if sync_fields.is_empty() {
      return Ok(out);
    }

    let (selections, company) = {
      let updated = self.store.get(id).ok_or(roster_core::Error::ContactNotFound(id))?;
      let selections: Vec<SyncSelection> = sync_fields
        .iter()
        .map(|f| SyncSelection::new(*f, updated.fields.get(*f)))
        .collect();
      (selections, updated.company().to_owned())
    };
    let colleagues: Vec<String> = self
      .store
      .sync_preview(id)?
      .into_iter()
      .map(|c| format!("{} ({})", c.name(), c.fields.appointment.as_deref().unwrap_or("N/A")))
      .collect();

    let touched = self.store.selective_sync(id, &selections, actor, at)?;
    let keys: Vec<&str> = sync_fields.iter().map(|f| f.key()).collect();
    out.push_str(&format!(
      "Synced {} to {touched} other contact(s) at {company}:\n",
      keys.join(", "),
    ));
    for (idx, colleague) in colleagues.iter().enumerate() {
      out.push_str(&format!("  {}. {colleague}\n", idx + 1));
    }
    Ok(out)
  }

  fn import(&mut self, path: &Path) -> anyhow::Result<String> {
    self.require_admin("import")?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let batch =
      roster_csv::read_rows(file).with_context(|| format!("parsing {}", path.display()))?;

    if !batch.ignored_columns.is_empty() {
      tracing::warn!(columns = ?batch.ignored_columns, "ignoring unknown import columns");
    }
    for row in &batch.rows {
      self.warn_unknown_values(row);
    }

    let at = self.now();
    let imported = self
      .store
      .bulk_import(batch.rows, &self.settings.operator.name, at)?;
    Ok(format!("Successfully imported {imported} contacts.\n"))
  }

  fn template(&self, path: &Path) -> anyhow::Result<String> {
    self.require_admin("template")?;
    std::fs::write(path, roster_csv::template()?)
      .with_context(|| format!("writing {}", path.display()))?;
    Ok(format!("Template written to {}\n", path.display()))
  }

  fn export(&self, path: &Path) -> anyhow::Result<String> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    roster_csv::export(self.store.contacts(), &mut writer)?;
    writer.flush()?;
    Ok(format!("Exported {} contacts to {}\n", self.store.len(), path.display()))
  }
}

/// Apply `key=value` assignments in order.
fn apply_assignments(fields: &mut ContactFields, assignments: &[String]) -> anyhow::Result<()> {
  for raw in assignments {
    let (key, value) = split_assignment(raw)?;
    fields.set_raw(ContactField::from_key(key)?, value);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn fixed_clock() -> Clock {
    Box::new(|| Utc.with_ymd_and_hms(2026, 1, 10, 2, 30, 0).unwrap())
  }

  fn session() -> Session {
    Session::with_clock(Settings::default(), fixed_clock()).unwrap()
  }

  fn run(session: &mut Session, line: &str) -> String {
    match session.handle_line(line) {
      Outcome::Output(text) => text,
      other => panic!("expected output for {line:?}, got {other:?}"),
    }
  }

  #[test]
  fn blank_and_quit_lines() {
    let mut s = session();
    assert_eq!(s.handle_line("   "), Outcome::Nothing);
    assert_eq!(s.handle_line("quit"), Outcome::Quit);
    assert_eq!(s.handle_line("exit"), Outcome::Quit);
  }

  #[test]
  fn parse_errors_are_printed() {
    let mut s = session();
    assert!(run(&mut s, "add --name 'unterminated").contains("unbalanced quotes"));
    assert!(run(&mut s, "frobnicate").contains("error"));
  }

  #[test]
  fn list_groups_by_country() {
    let mut s = session();
    let out = run(&mut s, "list");
    assert!(out.starts_with("Showing 4 of 4 contacts"));
    let australia = out.find("🌍 Australia").unwrap();
    let singapore = out.find("🌍 Singapore").unwrap();
    assert!(australia < singapore);

    let out = run(&mut s, "list --search lim");
    assert!(out.starts_with("Showing 1 of 4"));
  }

  #[test]
  fn show_resolves_reporting_line() {
    let mut s = session();
    let out = run(&mut s, "show 2");
    assert!(out.contains("Lim Boon Hock (#1)"), "{out}");
    assert!(out.contains("Children        Uncertain / Unknown"), "{out}");
    assert!(out.contains("10 Jan 26, 10:30"), "{out}");
    assert!(run(&mut s, "show 99").contains("contact not found: 99"));
  }

  #[test]
  fn add_requires_admin_and_company() {
    let mut s = session();
    let out = run(&mut s, "add --name 'Ada Lovelace'");
    assert!(out.contains("required field is blank: Company"), "{out}");

    let out = run(&mut s, "add --name 'Ada Lovelace' --company Analytical --age 36 --set dietary=Vegan");
    assert_eq!(out, "Created #5 Ada Lovelace\n");
    let ada = s.store().get(ContactId(5)).unwrap();
    assert_eq!(ada.fields.birthdate, NaiveDate::from_ymd_opt(1990, 1, 1));
    assert_eq!(ada.fields.dietary.as_deref(), Some("Vegan"));
    assert_eq!(ada.history()[0].message, "Manual Creation");

    run(&mut s, "role user");
    let out = run(&mut s, "add --name Bob --company Beta");
    assert!(out.contains("requires the admin role"), "{out}");
    assert_eq!(s.store().len(), 5);
  }

  #[test]
  fn edit_records_diff_and_syncs_colleagues() {
    let mut s = session();
    let out = run(&mut s, "edit 1 --set tier=B --set 'address=2 Marina View' --sync address --sync tier");
    assert!(out.contains("Updated #1: Address: '1 Marina Boulevard, Singapore' → '2 Marina View' | Tier: 'A' → 'B'"), "{out}");
    assert!(out.contains("Synced address, tier to 1 other contact(s) at Global Corp Group"), "{out}");
    assert!(out.contains("1. Tan Ah Teck (CEO, Singapore)"), "{out}");

    let colleague = s.store().get(ContactId(2)).unwrap();
    assert_eq!(colleague.fields.tier.as_deref(), Some("B"));
    assert_eq!(colleague.fields.address.as_deref(), Some("2 Marina View"));
    assert_eq!(colleague.last_updated_by_name, "Sync via Alex Tan");
    assert_eq!(colleague.history().len(), 3);

    assert_eq!(s.store().get(ContactId(3)).unwrap().fields.tier.as_deref(), Some("B"));
    assert_eq!(s.store().get(ContactId(3)).unwrap().history().len(), 1);
  }

  #[test]
  fn edit_with_unknown_field_changes_nothing() {
    let mut s = session();
    assert!(run(&mut s, "edit 1 --set salary=1").contains("unknown field"));
    assert!(run(&mut s, "edit 1 --set tier=B --sync salary").contains("unknown field"));
    let lim = s.store().get(ContactId(1)).unwrap();
    assert_eq!(lim.fields.tier.as_deref(), Some("A"));
    assert_eq!(lim.history().len(), 1);
  }

  #[test]
  fn edit_without_photo_keeps_it() {
    let mut s = session();
    let before = s.store().get(ContactId(4)).unwrap().fields.photo.clone();
    assert_eq!(run(&mut s, "edit 4"), "No changes to #4\n");
    assert_eq!(s.store().get(ContactId(4)).unwrap().fields.photo, before);
  }

  #[test]
  fn edit_with_photo_stores_data_uri() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("me.jpg");
    std::fs::write(&path, b"\xff\xd8\xff").unwrap();

    let mut s = session();
    run(&mut s, &format!("edit 3 --photo '{}'", path.display()));
    let photo = s.store().get(ContactId(3)).unwrap().fields.photo.clone().unwrap();
    assert!(photo.starts_with("data:image/jpeg;base64,"), "{photo}");
  }

  #[test]
  fn users_may_comment() {
    let mut s = session();
    run(&mut s, "role user");
    assert_eq!(run(&mut s, "comment 3 Met at the NYR reception"), "Comment added to #3\n");

    let james = s.store().get(ContactId(3)).unwrap();
    assert_eq!(james.comments()[0].text, "Met at the NYR reception");
    assert_eq!(james.comments()[0].actor, "Alex Tan");
    assert!(run(&mut s, "history 3").contains("- New Comment Added"));
  }

  #[test]
  fn import_and_export_round_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    std::fs::write(
      &input,
      "name,company,country,tier\nAda,Acme,UK,A\nBob,Acme,UK,\nCyd,Cora,Japan,C\n",
    )
    .unwrap();

    let mut s = session();
    let out = run(&mut s, &format!("import '{}'", input.display()));
    assert_eq!(out, "Successfully imported 3 contacts.\n");
    let ids: Vec<u64> = s.store().contacts().skip(4).map(|c| c.id().0).collect();
    assert_eq!(ids, vec![5, 6, 7]);

    let output = dir.path().join("out.csv");
    let out = run(&mut s, &format!("export '{}'", output.display()));
    assert!(out.starts_with("Exported 7 contacts"), "{out}");
    let exported = std::fs::read_to_string(&output).unwrap();
    assert_eq!(exported.lines().count(), 8);
    assert!(exported.lines().next().unwrap().starts_with("id,name,birthdate"));
  }

  #[test]
  fn template_is_admin_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.csv");
    let mut s = session();

    run(&mut s, &format!("template '{}'", path.display()));
    let header = std::fs::read_to_string(&path).unwrap();
    assert!(header.starts_with("name,birthdate,company"));

    run(&mut s, "role user");
    assert!(run(&mut s, &format!("template '{}'", path.display())).contains("admin role"));
  }

  #[test]
  fn birthdays_and_hierarchy_render() {
    let mut s = session();
    let out = run(&mut s, "birthdays");
    assert!(out.contains("January\n  Lim Boon Hock (05 Jan)\n  Sarah Connor (28 Jan)"), "{out}");

    let out = run(&mut s, "hierarchy");
    assert!(out.contains("👑 Lim Boon Hock (Group Chairman) [Head of Chain]"), "{out}");
    assert!(out.contains("↳ Sarah Connor (Operations Manager) reports to James Smith"), "{out}");
  }

  #[test]
  fn unseeded_session_starts_empty() {
    let settings = Settings { seed_sample_data: false, ..Settings::default() };
    let mut s = Session::with_clock(settings, fixed_clock()).unwrap();
    assert!(s.store().is_empty());
    assert_eq!(run(&mut s, "list"), "Showing 0 of 0 contacts\nNo contacts match.\n");
  }
}
