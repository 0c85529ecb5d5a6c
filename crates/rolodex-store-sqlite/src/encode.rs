//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so lexical order equals chronological order.
//! Calendar dates are stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rolodex_core::{
  contact::{Contact, ContactFields, ContactSkill},
  skill::Skill,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate
// ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawContact::from_row`].
pub const CONTACT_COLUMNS: &str = "
  c.contact_id, c.name, c.telegram, c.twitter, c.discord, c.github,
  c.linkedin, c.email, c.company, c.role, c.current_project, c.how_we_met,
  c.notes, c.date_met, c.last_contacted, c.follow_up_date,
  c.created_at, c.updated_at";

/// Raw strings read directly from a `skills` row.
pub struct RawSkill {
  pub skill_id: String,
  pub name:     String,
}

impl RawSkill {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { skill_id: row.get(0)?, name: row.get(1)? })
  }

  pub fn into_skill(self) -> Result<Skill> {
    Ok(Skill { id: decode_uuid(&self.skill_id)?, name: self.name })
  }
}

/// Raw strings read directly from a `contacts` row, plus its joined skills.
pub struct RawContact {
  pub contact_id:      String,
  pub name:            String,
  pub telegram:        Option<String>,
  pub twitter:         Option<String>,
  pub discord:         Option<String>,
  pub github:          Option<String>,
  pub linkedin:        Option<String>,
  pub email:           Option<String>,
  pub company:         Option<String>,
  pub role:            Option<String>,
  pub current_project: Option<String>,
  pub how_we_met:      Option<String>,
  pub notes:           Option<String>,
  pub date_met:        String,
  pub last_contacted:  Option<String>,
  pub follow_up_date:  Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
  pub skills:          Vec<RawSkill>,
}

impl RawContact {
  /// Read a row selected with [`CONTACT_COLUMNS`]. `skills` starts empty.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:      row.get(0)?,
      name:            row.get(1)?,
      telegram:        row.get(2)?,
      twitter:         row.get(3)?,
      discord:         row.get(4)?,
      github:          row.get(5)?,
      linkedin:        row.get(6)?,
      email:           row.get(7)?,
      company:         row.get(8)?,
      role:            row.get(9)?,
      current_project: row.get(10)?,
      how_we_met:      row.get(11)?,
      notes:           row.get(12)?,
      date_met:        row.get(13)?,
      last_contacted:  row.get(14)?,
      follow_up_date:  row.get(15)?,
      created_at:      row.get(16)?,
      updated_at:      row.get(17)?,
      skills:          Vec::new(),
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    let fields = ContactFields {
      name:            self.name,
      telegram:        self.telegram,
      twitter:         self.twitter,
      discord:         self.discord,
      github:          self.github,
      linkedin:        self.linkedin,
      email:           self.email,
      company:         self.company,
      role:            self.role,
      current_project: self.current_project,
      how_we_met:      self.how_we_met,
      notes:           self.notes,
      date_met:        decode_date(&self.date_met)?,
      last_contacted:  self.last_contacted.as_deref().map(decode_date).transpose()?,
      follow_up_date:  self.follow_up_date.as_deref().map(decode_date).transpose()?,
    };

    let skills = self
      .skills
      .into_iter()
      .map(|raw| raw.into_skill().map(|skill| ContactSkill { skill }))
      .collect::<Result<Vec<_>>>()?;

    Ok(Contact {
      id: decode_uuid(&self.contact_id)?,
      fields,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      skills,
    })
  }
}
