//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Optional `search`, `skills` (comma-separated), `overdue=true` |
//! | `POST`   | `/contacts` | Body: [`ContactDraft`]; returns 201 + stored contact |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `PUT`    | `/contacts/{id}` | Body: [`ContactDraft`]; full replace, skills included |
//! | `DELETE` | `/contacts/{id}` | Returns `{"success":true}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use rolodex_core::{
  contact::{Contact, ContactDraft},
  store::{ContactQuery, ContactStore},
};
use serde::Deserialize;
use serde_json::{Value, json};
use crate::{
  error::ApiError,
  extract::{ApiJson, ApiQuery, contact_id},
};

// ─── List / search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-sensitive substring over name, company, notes and email.
  pub search:  Option<String>,
  /// Comma-separated skill names; a contact needs any one of them.
  pub skills:  Option<String>,
  /// Restrict to contacts whose follow-up date is before today (UTC).
  /// Only `true` and `false` are accepted.
  #[serde(default)]
  pub overdue: bool,
}

impl ListParams {
  fn into_query(self) -> ContactQuery {
    ContactQuery {
      text:          self.search,
      skills:        self
        .skills
        .map(|s| {
          s.split(',')
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
        })
        .unwrap_or_default(),
      overdue_as_of: self.overdue.then(|| Utc::now().date_naive()),
    }
  }
}

/// `GET /contacts[?search=...][&skills=a,b][&overdue=true]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contacts = store
    .search(&params.into_query())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts` — returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ContactDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (fields, skills) = body.validate()?;
  let contact = store
    .create_contact(fields, skills)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(contact_id = %contact.id, skills = contact.skills.len(), "created contact");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = contact_id(&id)?;
  let contact = store
    .get_contact(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(ApiError::contact_not_found)?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/{id}` — the body replaces every field and the whole skill
/// set; omitted skills are removed.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  ApiJson(body): ApiJson<ContactDraft>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = contact_id(&id)?;
  let (fields, skills) = body.validate()?;
  let contact = store
    .update_contact(id, fields, skills)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(ApiError::contact_not_found)?;

  tracing::info!(contact_id = %id, skills = contact.skills.len(), "updated contact");
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}` — deleting an already-deleted id is a 404.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = contact_id(&id)?;
  let deleted = store
    .delete_contact(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::contact_not_found());
  }

  tracing::info!(contact_id = %id, "deleted contact");
  Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skills_param_splits_on_commas_and_drops_empties() {
    let query = ListParams {
      search: Some("Ada".into()),
      skills: Some("Rust,,Smart Contracts,".into()),
      overdue: false,
    }
    .into_query();

    assert_eq!(query.text.as_deref(), Some("Ada"));
    assert_eq!(query.skills, ["Rust", "Smart Contracts"]);
    assert!(query.overdue_as_of.is_none());
  }

  #[test]
  fn overdue_flag_uses_today() {
    let query = ListParams { overdue: true, ..Default::default() }.into_query();
    assert_eq!(query.overdue_as_of, Some(Utc::now().date_naive()));
  }
}
