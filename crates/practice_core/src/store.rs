//! crates/practice_core/src/store.rs
//!
//! In-memory projections of server state. A store is mutated only through
//! `set_all`, `set_selected`, `add`, `update` and `remove`, and never performs I/O.

use crate::domain::{AuthSession, Client, EntityId, Material, Session, Therapist};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Anything a store can hold: an entity with a server-assigned id.
pub trait Identified {
    fn id(&self) -> EntityId;
}

impl Identified for Client {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for Session {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for Material {
    fn id(&self) -> EntityId {
        self.id
    }
}

//=========================================================================================
// EntityStore
//=========================================================================================

/// The last-fetched collection of one entity type plus the item currently
/// being inspected or edited.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
    selected: Option<T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }
}

pub type ClientStore = EntityStore<Client>;
pub type SessionStore = EntityStore<Session>;
pub type MaterialStore = EntityStore<Material>;

impl<T: Identified> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection. Anything absent from `items` is gone.
    pub fn set_all(&mut self, items: Vec<T>) {
        debug!(count = items.len(), "store: replacing collection");
        self.items = items;
    }

    /// Records the selection. Independent of the collection.
    pub fn set_selected(&mut self, item: Option<T>) {
        self.selected = item;
    }

    /// Appends without deduplicating; adding an id that is already present
    /// leaves two entries until the next `set_all`.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the entry with the same id in place. No-op if the id is absent.
    pub fn update(&mut self, item: T) {
        if let Some(slot) = self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            *slot = item;
        }
    }

    /// Deletes the entry with `id`. No-op if absent.
    pub fn remove(&mut self, id: EntityId) {
        self.items.retain(|item| item.id() != id);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//=========================================================================================
// AuthStore
//=========================================================================================

/// The authenticated therapist and their bearer token. No token means unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    user: Option<Therapist>,
    token: Option<String>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, session: AuthSession) {
        self.user = Some(session.user);
        self.token = Some(session.token);
    }

    /// Clears both the user and the token.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&Therapist> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

//=========================================================================================
// Shared handle
//=========================================================================================

/// A cloneable handle to a store. Access goes through synchronous closures,
/// so a lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct Shared<S>(Arc<Mutex<S>>);

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S> Shared<S> {
    pub fn new(store: S) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<S: Clone> Shared<S> {
    /// A point-in-time copy of the store.
    pub fn snapshot(&self) -> S {
        self.read(S::clone)
    }
}
