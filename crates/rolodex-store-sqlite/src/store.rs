//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rolodex_core::{
  contact::{Contact, ContactFields},
  skill::Skill,
  store::{ContactQuery, ContactStore},
};

use crate::{
  encode::{CONTACT_COLUMNS, RawContact, RawSkill, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolodex contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Other clones of this store fail every
  /// call made after this returns.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────
//
// These run on the connection thread and take a `&Connection` so they can be
// used both directly and through a `Transaction` (which derefs to one).

fn find_skill(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<Option<RawSkill>> {
  conn
    .query_row(
      "SELECT skill_id, name FROM skills WHERE name = ?1",
      rusqlite::params![name],
      RawSkill::from_row,
    )
    .optional()
}

/// Connect-or-create: look the skill up by its unique name, insert it if
/// absent, then read back whichever row won.
fn ensure_skill_in(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<RawSkill> {
  if let Some(skill) = find_skill(conn, name)? {
    return Ok(skill);
  }

  conn.execute(
    "INSERT INTO skills (skill_id, name) VALUES (?1, ?2)
     ON CONFLICT(name) DO NOTHING",
    rusqlite::params![encode_uuid(Uuid::new_v4()), name],
  )?;

  find_skill(conn, name)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Associate `contact_id` with every named skill, creating skills as needed.
fn link_skills(
  conn: &rusqlite::Connection,
  contact_id: &str,
  skills: &[String],
) -> rusqlite::Result<()> {
  for name in skills {
    let skill = ensure_skill_in(conn, name)?;
    conn.execute(
      "INSERT OR IGNORE INTO contact_skills (contact_id, skill_id) VALUES (?1, ?2)",
      rusqlite::params![contact_id, skill.skill_id],
    )?;
  }
  Ok(())
}

fn fetch_skills(
  conn: &rusqlite::Connection,
  contact_id: &str,
) -> rusqlite::Result<Vec<RawSkill>> {
  let mut stmt = conn.prepare_cached(
    "SELECT s.skill_id, s.name
     FROM contact_skills cs
     JOIN skills s ON s.skill_id = cs.skill_id
     WHERE cs.contact_id = ?1
     ORDER BY s.name",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![contact_id], RawSkill::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn fetch_contact(
  conn: &rusqlite::Connection,
  contact_id: &str,
) -> rusqlite::Result<Option<RawContact>> {
  let raw = conn
    .query_row(
      &format!("SELECT {CONTACT_COLUMNS} FROM contacts c WHERE c.contact_id = ?1"),
      rusqlite::params![contact_id],
      RawContact::from_row,
    )
    .optional()?;

  match raw {
    Some(mut raw) => {
      raw.skills = fetch_skills(conn, contact_id)?;
      Ok(Some(raw))
    }
    None => Ok(None),
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  // ── Skills ────────────────────────────────────────────────────────────────

  async fn ensure_skill(&self, name: &str) -> Result<Skill> {
    let name = name.to_owned();

    let raw: RawSkill = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let skill = ensure_skill_in(&tx, &name)?;
        tx.commit()?;
        Ok(skill)
      })
      .await?;

    raw.into_skill()
  }

  async fn list_skills(&self) -> Result<Vec<Skill>> {
    let raws: Vec<RawSkill> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT skill_id, name FROM skills ORDER BY name")?;
        let rows = stmt
          .query_map([], RawSkill::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSkill::into_skill).collect()
  }

  // ── Contacts — writes ─────────────────────────────────────────────────────

  async fn create_contact(
    &self,
    fields: ContactFields,
    skills: Vec<String>,
  ) -> Result<Contact> {
    let id_str = encode_uuid(Uuid::new_v4());
    let now_str = encode_dt(Utc::now());

    let raw: RawContact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO contacts (
             contact_id, name, telegram, twitter, discord, github, linkedin,
             email, company, role, current_project, how_we_met, notes,
             date_met, last_contacted, follow_up_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?17)",
          rusqlite::params![
            id_str,
            fields.name,
            fields.telegram,
            fields.twitter,
            fields.discord,
            fields.github,
            fields.linkedin,
            fields.email,
            fields.company,
            fields.role,
            fields.current_project,
            fields.how_we_met,
            fields.notes,
            encode_date(fields.date_met),
            fields.last_contacted.map(encode_date),
            fields.follow_up_date.map(encode_date),
            now_str,
          ],
        )?;
        link_skills(&tx, &id_str, &skills)?;

        let raw = fetch_contact(&tx, &id_str)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_contact()
  }

  async fn update_contact(
    &self,
    id: Uuid,
    fields: ContactFields,
    skills: Vec<String>,
  ) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls every step back, so the
        // association delete is never visible on its own.
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM contacts WHERE contact_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }

        tx.execute(
          "DELETE FROM contact_skills WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.execute(
          "UPDATE contacts SET
             name = ?2, telegram = ?3, twitter = ?4, discord = ?5, github = ?6,
             linkedin = ?7, email = ?8, company = ?9, role = ?10,
             current_project = ?11, how_we_met = ?12, notes = ?13,
             date_met = ?14, last_contacted = ?15, follow_up_date = ?16,
             updated_at = ?17
           WHERE contact_id = ?1",
          rusqlite::params![
            id_str,
            fields.name,
            fields.telegram,
            fields.twitter,
            fields.discord,
            fields.github,
            fields.linkedin,
            fields.email,
            fields.company,
            fields.role,
            fields.current_project,
            fields.how_we_met,
            fields.notes,
            encode_date(fields.date_met),
            fields.last_contacted.map(encode_date),
            fields.follow_up_date.map(encode_date),
            now_str,
          ],
        )?;

        link_skills(&tx, &id_str, &skills)?;

        let raw = fetch_contact(&tx, &id_str)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn delete_contact(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Contacts — reads ──────────────────────────────────────────────────────

  async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| Ok(fetch_contact(conn, &id_str)?))
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn search(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
    let text = query.text_filter().map(str::to_owned);
    let skills_json = if query.skills.is_empty() {
      None
    } else {
      Some(serde_json::to_string(&query.skills)?)
    };
    let overdue_str = query.overdue_as_of.map(encode_date);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        // `instr` rather than LIKE: LIKE is case-insensitive for ASCII.
        let sql = format!(
          "SELECT {CONTACT_COLUMNS}
           FROM contacts c
           WHERE (?1 IS NULL
                  OR instr(c.name,    ?1) > 0
                  OR instr(c.company, ?1) > 0
                  OR instr(c.notes,   ?1) > 0
                  OR instr(c.email,   ?1) > 0)
             AND (?2 IS NULL OR EXISTS (
                  SELECT 1
                  FROM contact_skills cs
                  JOIN skills s ON s.skill_id = cs.skill_id
                  WHERE cs.contact_id = c.contact_id
                    AND s.name IN (SELECT value FROM json_each(?2))))
             AND (?3 IS NULL OR c.follow_up_date < ?3)
           ORDER BY c.updated_at DESC, c.rowid DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt
          .query_map(
            rusqlite::params![text, skills_json, overdue_str],
            RawContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        for raw in &mut rows {
          raw.skills = fetch_skills(conn, &raw.contact_id)?;
        }

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }
}
