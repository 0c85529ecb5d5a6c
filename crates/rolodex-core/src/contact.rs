//! Contact records and the validation that guards every write.
//!
//! A [`ContactDraft`] is what arrives from the outside world: every field is
//! an optional string. [`ContactDraft::validate`] turns it into
//! [`ContactFields`] plus the desired skill set, which is all a store needs
//! to create or fully replace a contact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, skill::Skill};

// ─── Stored shape ────────────────────────────────────────────────────────────

/// The user-editable attributes of a contact.
///
/// `name` and `date_met` are always present. The remaining fields are stored
/// exactly as given, so `Some("")` and `None` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
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
  pub date_met:        NaiveDate,
  pub last_contacted:  Option<NaiveDate>,
  pub follow_up_date:  Option<NaiveDate>,
}

impl ContactFields {
  /// Fields with only the required attributes set.
  pub fn new(name: impl Into<String>, date_met: NaiveDate) -> Self {
    Self {
      name: name.into(),
      telegram: None,
      twitter: None,
      discord: None,
      github: None,
      linkedin: None,
      email: None,
      company: None,
      role: None,
      current_project: None,
      how_we_met: None,
      notes: None,
      date_met,
      last_contacted: None,
      follow_up_date: None,
    }
  }
}

/// One association row, nested the way API consumers expect it:
/// `{"skill": {"id": ..., "name": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSkill {
  pub skill: Skill,
}

/// A persisted contact with its resolved skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:         Uuid,
  #[serde(flatten)]
  pub fields:     ContactFields,
  pub created_at: DateTime<Utc>,
  /// Refreshed by every mutation; search results are ordered by it.
  pub updated_at: DateTime<Utc>,
  pub skills:     Vec<ContactSkill>,
}

impl Contact {
  pub fn skill_names(&self) -> Vec<&str> {
    self.skills.iter().map(|cs| cs.skill.name.as_str()).collect()
  }

  /// Whether the follow-up date has passed. A follow-up due `today` is not
  /// yet overdue.
  pub fn is_follow_up_overdue(&self, today: NaiveDate) -> bool {
    self.fields.follow_up_date.is_some_and(|d| d < today)
  }
}

// ─── Incoming shape ──────────────────────────────────────────────────────────

/// Unvalidated contact data as submitted by a client.
///
/// Used for both create and update: an update is a full replacement, so the
/// draft must always carry the complete desired state, skills included.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
  pub name:            Option<String>,
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
  pub date_met:        Option<String>,
  pub last_contacted:  Option<String>,
  pub follow_up_date:  Option<String>,
  /// Absent or `null` means no skills.
  pub skills:          Option<Vec<String>>,
}

impl ContactDraft {
  /// Check required fields, parse dates and normalise the skill list.
  ///
  /// Duplicate skill names collapse to their first occurrence; order is
  /// otherwise preserved.
  pub fn validate(self) -> Result<(ContactFields, Vec<String>)> {
    let name = self
      .name
      .filter(|n| !n.trim().is_empty())
      .ok_or(Error::MissingField("name"))?;

    let date_met = match self.date_met.as_deref().map(str::trim) {
      Some(raw) if !raw.is_empty() => parse_date("dateMet", raw)?,
      _ => return Err(Error::MissingField("dateMet")),
    };
    let last_contacted =
      parse_optional_date("lastContacted", self.last_contacted.as_deref())?;
    let follow_up_date =
      parse_optional_date("followUpDate", self.follow_up_date.as_deref())?;

    let requested = self.skills.unwrap_or_default();
    let mut skills: Vec<String> = Vec::with_capacity(requested.len());
    for skill in requested {
      if skill.trim().is_empty() {
        return Err(Error::EmptySkillName);
      }
      if !skills.contains(&skill) {
        skills.push(skill);
      }
    }

    let fields = ContactFields {
      name,
      telegram: self.telegram,
      twitter: self.twitter,
      discord: self.discord,
      github: self.github,
      linkedin: self.linkedin,
      email: self.email,
      company: self.company,
      role: self.role,
      current_project: self.current_project,
      how_we_met: self.how_we_met,
      notes: self.notes,
      date_met,
      last_contacted,
      follow_up_date,
    };

    Ok((fields, skills))
  }
}

/// Parse a calendar date. Accepts `YYYY-MM-DD`, or a full RFC 3339
/// timestamp whose date component is kept.
fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
    .map_err(|_| Error::InvalidDate { field, value: raw.to_owned() })
}

fn parse_optional_date(
  field: &'static str,
  raw: Option<&str>,
) -> Result<Option<NaiveDate>> {
  match raw.map(str::trim) {
    Some(s) if !s.is_empty() => parse_date(field, s).map(Some),
    _ => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date_ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn ada() -> ContactDraft {
    ContactDraft {
      name: Some("Ada".into()),
      date_met: Some("2024-01-01".into()),
      ..Default::default()
    }
  }

  #[test]
  fn minimal_draft_validates() {
    let (fields, skills) = ada().validate().unwrap();
    assert_eq!(fields, ContactFields::new("Ada", date_ymd(2024, 1, 1)));
    assert!(skills.is_empty());
  }

  #[test]
  fn missing_name_is_rejected() {
    let draft = ContactDraft { name: None, ..ada() };
    assert_eq!(draft.validate().unwrap_err(), Error::MissingField("name"));

    let draft = ContactDraft { name: Some("   ".into()), ..ada() };
    assert_eq!(draft.validate().unwrap_err(), Error::MissingField("name"));
  }

  #[test]
  fn missing_date_met_is_rejected() {
    let draft = ContactDraft { date_met: None, ..ada() };
    assert_eq!(draft.validate().unwrap_err(), Error::MissingField("dateMet"));

    let draft = ContactDraft { date_met: Some(String::new()), ..ada() };
    assert_eq!(draft.validate().unwrap_err(), Error::MissingField("dateMet"));
  }

  #[test]
  fn unparseable_dates_are_rejected() {
    let draft = ContactDraft { date_met: Some("yesterday".into()), ..ada() };
    assert!(matches!(
      draft.validate().unwrap_err(),
      Error::InvalidDate { field: "dateMet", .. }
    ));

    let draft = ContactDraft { follow_up_date: Some("2024-13-01".into()), ..ada() };
    assert!(matches!(
      draft.validate().unwrap_err(),
      Error::InvalidDate { field: "followUpDate", .. }
    ));
  }

  #[test]
  fn empty_optional_dates_mean_no_value() {
    let draft = ContactDraft {
      last_contacted: Some(String::new()),
      follow_up_date: Some("  ".into()),
      ..ada()
    };
    let (fields, _) = draft.validate().unwrap();
    assert_eq!(fields.last_contacted, None);
    assert_eq!(fields.follow_up_date, None);
  }

  #[test]
  fn rfc3339_timestamps_keep_their_date() {
    let draft = ContactDraft {
      date_met: Some("2024-03-05T00:00:00.000Z".into()),
      ..ada()
    };
    let (fields, _) = draft.validate().unwrap();
    assert_eq!(fields.date_met, date_ymd(2024, 3, 5));
  }

  #[test]
  fn optional_strings_are_kept_verbatim() {
    let draft = ContactDraft {
      company: Some(String::new()),
      twitter: Some("@ada".into()),
      ..ada()
    };
    let (fields, _) = draft.validate().unwrap();
    assert_eq!(fields.company.as_deref(), Some(""));
    assert_eq!(fields.twitter.as_deref(), Some("@ada"));
    assert_eq!(fields.email, None);
  }

  #[test]
  fn skills_are_deduplicated_in_order() {
    let draft = ContactDraft {
      skills: Some(vec!["Rust".into(), "Security".into(), "Rust".into(), "rust".into()]),
      ..ada()
    };
    let (_, skills) = draft.validate().unwrap();
    assert_eq!(skills, ["Rust", "Security", "rust"]);
  }

  #[test]
  fn blank_skill_name_is_rejected() {
    let draft = ContactDraft { skills: Some(vec!["Rust".into(), " ".into()]), ..ada() };
    assert_eq!(draft.validate().unwrap_err(), Error::EmptySkillName);
  }

  #[test]
  fn null_skills_mean_none() {
    let draft: ContactDraft =
      serde_json::from_str(r#"{"name":"Ada","dateMet":"2024-01-01","skills":null}"#).unwrap();
    let (_, skills) = draft.validate().unwrap();
    assert!(skills.is_empty());
  }

  #[test]
  fn draft_deserialises_camel_case() {
    let draft: ContactDraft = serde_json::from_str(
      r#"{"name":"Ada","dateMet":"2024-01-01","howWeMet":"ETHDenver",
          "currentProject":"zk","skills":["Rust"],"id":"ignored"}"#,
    )
    .unwrap();
    let (fields, skills) = draft.validate().unwrap();
    assert_eq!(fields.how_we_met.as_deref(), Some("ETHDenver"));
    assert_eq!(fields.current_project.as_deref(), Some("zk"));
    assert_eq!(skills, ["Rust"]);
  }

  #[test]
  fn follow_up_overdue_is_strictly_before_today() {
    let mut fields = ContactFields::new("Ada", date_ymd(2024, 1, 1));
    fields.follow_up_date = Some(date_ymd(2024, 6, 1));
    let contact = Contact {
      id: Uuid::new_v4(),
      fields,
      created_at: Utc::now(),
      updated_at: Utc::now(),
      skills: vec![],
    };

    assert!(!contact.is_follow_up_overdue(date_ymd(2024, 5, 31)));
    assert!(!contact.is_follow_up_overdue(date_ymd(2024, 6, 1)));
    assert!(contact.is_follow_up_overdue(date_ymd(2024, 6, 2)));
  }

  #[test]
  fn contact_serialises_flat_with_nested_skills() {
    let skill = Skill { id: Uuid::new_v4(), name: "Rust".into() };
    let contact = Contact {
      id: Uuid::new_v4(),
      fields: ContactFields::new("Ada", date_ymd(2024, 1, 1)),
      created_at: Utc::now(),
      updated_at: Utc::now(),
      skills: vec![ContactSkill { skill: skill.clone() }],
    };

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["dateMet"], "2024-01-01");
    assert!(json["followUpDate"].is_null());
    assert!(json.get("updatedAt").is_some());
    assert_eq!(json["skills"][0]["skill"]["name"], "Rust");
    assert_eq!(json["skills"][0]["skill"]["id"], skill.id.to_string());
  }
}
