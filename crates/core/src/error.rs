use crate::types::{DbId, TagKind};

/// Domain-level error type shared by every layer above the store.
///
/// `Clone` is required because the batch loader broadcasts a single fetch
/// result to every caller that joined the batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist -- or belongs to another user. The two
    /// cases are deliberately indistinguishable so existence is never
    /// leaked across tenants.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The uniform tag-resolution failure for a given tag kind, raised when
    /// a requested name has no enabled catalog match or the resolved count
    /// disagrees with the requested count.
    pub fn invalid_tags(kind: TagKind) -> Self {
        CoreError::Validation(format!("Invalid or disabled {} tags", kind.label()))
    }
}
