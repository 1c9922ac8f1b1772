/// Ownership-based authorization for posts and comments
///
/// Reads are open to every authenticated caller. Updates and deletes are
/// allowed only for the entity's author; services call `authorize` before
/// issuing any mutation to the store.
use actix_middleware::UserId;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::AUTHORIZATION_DENIED_TOTAL;
use crate::models::{Comment, Post};

/// Kind of access requested on an existing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    /// Update or delete
    Write,
}

/// An entity with a single owning identity
pub trait Owned {
    /// Resource name used in messages and metric labels
    const RESOURCE: &'static str;

    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    const RESOURCE: &'static str = "post";

    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    const RESOURCE: &'static str = "comment";

    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// True when `identity` may update or delete `entity`
pub fn can_write<E: Owned>(identity: UserId, entity: &E) -> bool {
    entity.owner_id() == identity.0
}

/// Check `op` on `entity` for `identity`, failing with `Forbidden` on denial
pub fn authorize<E: Owned>(identity: UserId, entity: &E, op: Operation) -> Result<()> {
    match op {
        Operation::Read => Ok(()),
        Operation::Write if can_write(identity, entity) => Ok(()),
        Operation::Write => {
            AUTHORIZATION_DENIED_TOTAL
                .with_label_values(&[E::RESOURCE])
                .inc();
            tracing::warn!(
                user_id = %identity.0,
                owner_id = %entity.owner_id(),
                resource = E::RESOURCE,
                "write denied: caller is not the owner"
            );
            Err(AppError::Forbidden(format!(
                "You don't have permission to modify this {}",
                E::RESOURCE
            )))
        }
    }
}
