//! Skill — a reusable named tag attachable to many contacts.
//!
//! Skills are created on demand the first time a contact references their
//! name and are never mutated or deleted afterwards. Names compare exactly:
//! `"Rust"` and `"rust"` are distinct skills.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
  pub id:   Uuid,
  pub name: String,
}
