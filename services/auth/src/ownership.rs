//! Ownership policy for mutating authored resources

use uuid::Uuid;

/// Whether `subject_id` may update or delete a resource authored by
/// `author_id`.
///
/// Identifiers are compared as opaque values: exact equality, nothing else.
pub fn can_mutate(author_id: &Uuid, subject_id: &Uuid) -> bool {
    author_id == subject_id
}

/// A resource that records the identity that created it
pub trait Authored {
    /// Identity of the author, fixed at creation
    fn author_id(&self) -> Uuid;

    /// Whether `subject_id` may mutate this resource
    fn is_mutable_by(&self, subject_id: &Uuid) -> bool {
        can_mutate(&self.author_id(), subject_id)
    }
}
