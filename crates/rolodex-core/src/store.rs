//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rolodex-store-sqlite`).
//! Higher layers (`rolodex-api`, `rolodex-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  contact::{Contact, ContactFields},
  skill::Skill,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ContactStore::search`]. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
  /// Case-sensitive substring matched against name, company, notes and
  /// email. `None` and `Some("")` both disable the filter.
  pub text:          Option<String>,
  /// A contact matches if it has at least one of these skills.
  pub skills:        Vec<String>,
  /// Only contacts whose follow-up date is strictly before this date.
  pub overdue_as_of: Option<NaiveDate>,
}

impl ContactQuery {
  /// The text filter, if it is set and non-empty.
  pub fn text_filter(&self) -> Option<&str> {
    self.text.as_deref().filter(|t| !t.is_empty())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rolodex contact store backend.
///
/// Every mutation is atomic: it either fully applies or leaves the store
/// untouched. In particular, the association replacement performed by
/// [`update_contact`](Self::update_contact) is never observable half-done.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Skills ────────────────────────────────────────────────────────────

  /// Return the skill with exactly this name, creating it if absent.
  fn ensure_skill<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Skill, Self::Error>> + Send + 'a;

  /// The full skill catalog, ordered by name.
  fn list_skills(
    &self,
  ) -> impl Future<Output = Result<Vec<Skill>, Self::Error>> + Send + '_;

  // ── Contacts — writes ─────────────────────────────────────────────────

  /// Persist a new contact and associate it with `skills`, creating any
  /// skill that does not exist yet.
  fn create_contact(
    &self,
    fields: ContactFields,
    skills: Vec<String>,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Overwrite every field of contact `id` and replace its skill set with
  /// exactly `skills`. Returns `None` if the contact does not exist.
  fn update_contact(
    &self,
    id: Uuid,
    fields: ContactFields,
    skills: Vec<String>,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Delete a contact and its associations. Skills are left in place.
  /// Returns `false` if the contact does not exist.
  fn delete_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Contacts — reads ──────────────────────────────────────────────────

  /// Retrieve a contact with its skills. Returns `None` if not found.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Contacts matching `query`, most recently updated first.
  fn search<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;
}
