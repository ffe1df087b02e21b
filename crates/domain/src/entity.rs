//! Entity identity shared by every aggregate.

use std::any::TypeId;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

/// Identity and audit fields of an entity.
///
/// An entity starts out unset. The aggregate's creation event establishes
/// the identity exactly once; later events only move the modification
/// fields forward.
///
/// `A` is the aggregate type owning the entity. Equality is identity
/// equality: two entities are equal only when they belong to the same
/// aggregate type and carry the same, non-nil id. An unset entity is not even
/// equal to itself, which is why this type implements `PartialEq` but not `Eq`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Entity<A> {
    id: Option<AggregateId>,
    created_at: Option<DateTime<Utc>>,
    created_by: Option<String>,
    last_modified_at: Option<DateTime<Utc>>,
    last_modified_by: Option<String>,
    #[serde(skip)]
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> Default for Entity<A> {
    fn default() -> Self {
        Self {
            id: None,
            created_at: None,
            created_by: None,
            last_modified_at: None,
            last_modified_by: None,
            _aggregate: PhantomData,
        }
    }
}

impl<A> Clone for Entity<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            last_modified_at: self.last_modified_at,
            last_modified_by: self.last_modified_by.clone(),
            _aggregate: PhantomData,
        }
    }
}

impl<A> std::fmt::Debug for Entity<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("aggregate", &std::any::type_name::<A>())
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("created_by", &self.created_by)
            .field("last_modified_at", &self.last_modified_at)
            .field("last_modified_by", &self.last_modified_by)
            .finish()
    }
}

impl<A> Entity<A> {
    /// Sets the identity from a creation event. Ignored if already established.
    pub fn establish(&mut self, id: AggregateId, at: DateTime<Utc>, by: Option<String>) {
        if self.is_established() {
            return;
        }
        self.id = Some(id);
        self.created_at = Some(at);
        self.created_by = by;
    }

    /// Records a modification by a non-creation event.
    pub fn touch(&mut self, at: DateTime<Utc>, by: Option<String>) {
        self.last_modified_at = Some(at);
        self.last_modified_by = by;
    }

    pub fn id(&self) -> Option<AggregateId> {
        self.id.filter(|id| !id.is_nil())
    }

    pub fn is_established(&self) -> bool {
        self.id().is_some()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified_at
    }

    pub fn last_modified_by(&self) -> Option<&str> {
        self.last_modified_by.as_deref()
    }
}

impl<A: 'static, B: 'static> PartialEq<Entity<B>> for Entity<A> {
    fn eq(&self, other: &Entity<B>) -> bool {
        if TypeId::of::<A>() != TypeId::of::<B>() {
            return false;
        }
        match (self.id(), other.id()) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct Customer;
    struct Supplier;

    fn established(id: AggregateId) -> Entity<Customer> {
        let mut entity = Entity::default();
        entity.establish(id, Utc::now(), Some("admin".to_string()));
        entity
    }

    #[test]
    fn entities_of_different_aggregate_types_are_never_equal() {
        let id = AggregateId::new();
        let mut supplier = Entity::<Supplier>::default();
        supplier.establish(id, Utc::now(), None);

        assert!(established(id) != supplier);
        assert!(supplier != established(id));
        assert!(supplier == supplier.clone());
    }

    #[test]
    fn unset_entities_are_never_equal() {
        let unset = Entity::<Customer>::default();
        assert!(unset != unset.clone());
        assert!(unset != Entity::<Customer>::default());
    }

    #[test]
    fn equality_follows_id() {
        let id = AggregateId::new();
        assert!(established(id) == established(id));
        assert!(established(id) != established(AggregateId::new()));
        assert!(established(id) != Entity::<Customer>::default());
    }

    #[test]
    fn nil_id_counts_as_unset() {
        let nil = established(AggregateId::from_uuid(Uuid::nil()));
        assert!(!nil.is_established());
        assert!(nil != nil.clone());
    }

    #[test]
    fn identity_is_established_once() {
        let first = AggregateId::new();
        let mut entity = established(first);
        entity.establish(AggregateId::new(), Utc::now(), Some("intruder".to_string()));

        assert_eq!(entity.id(), Some(first));
        assert_eq!(entity.created_by(), Some("admin"));
    }

    #[test]
    fn touch_updates_modification_fields_only() {
        let mut entity = established(AggregateId::new());
        let created_at = entity.created_at();
        let at = Utc::now();
        entity.touch(at, Some("support".to_string()));

        assert_eq!(entity.created_at(), created_at);
        assert_eq!(entity.last_modified_at(), Some(at));
        assert_eq!(entity.last_modified_by(), Some("support"));
    }
}
