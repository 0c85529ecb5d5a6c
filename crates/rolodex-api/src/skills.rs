//! Handler for `GET /skills` — the full catalog, for filter and
//! autocomplete lists.

use std::sync::Arc;

use axum::{Json, extract::State};
use rolodex_core::{skill::Skill, store::ContactStore};

use crate::error::ApiError;

/// `GET /skills`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Skill>>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let skills = store
    .list_skills()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(skills))
}
