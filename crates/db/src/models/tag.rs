//! Tag catalog entity model.
//!
//! Tags are global catalog entries: no owner column. Per-user visibility
//! is an override set on the user record, applied at query time.

use nestling_core::tags::CatalogTag;
use nestling_core::types::{DbId, TagKind, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    /// Persistence code of the tag kind; see [`TagKind::code`].
    pub kind: i16,
    pub name: String,
    pub group_name: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

impl Tag {
    pub fn kind(&self) -> Option<TagKind> {
        TagKind::from_code(self.kind)
    }
}

impl CatalogTag for Tag {
    fn tag_name(&self) -> &str {
        &self.name
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

/// DTO for creating a catalog tag.
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub kind: TagKind,
    pub name: String,
    pub group_name: String,
    pub sort_order: i32,
}
