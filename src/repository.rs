//! Storage interface for identified templates and documents

use thiserror::Error;
use uuid::Uuid;

use crate::document::{Document, WebpageDocument};
use crate::template::Template;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Only items with an assigned id can be stored
    #[error("cannot store an item without an id")]
    MissingId,

    #[error("an item with id {id} already exists")]
    Duplicate { id: Uuid },

    #[error("no item with id {id}")]
    NotFound { id: Uuid },
}

/// Items addressable by a set-once id
pub trait Identified {
    fn id(&self) -> Option<Uuid>;
}

impl Identified for Template {
    fn id(&self) -> Option<Uuid> {
        Template::id(self)
    }
}

impl Identified for Document {
    fn id(&self) -> Option<Uuid> {
        Document::id(self)
    }
}

impl Identified for WebpageDocument {
    fn id(&self) -> Option<Uuid> {
        self.document().id()
    }
}

/// CRUD access to stored items
pub trait Repository<T: Identified> {
    fn get_all(&self) -> Vec<&T>;

    fn get_by_id(&self, id: Uuid) -> Option<&T>;

    /// Store a new item. Fails if it has no id or the id is taken.
    fn add(&mut self, item: T) -> Result<(), RepositoryError>;

    /// Replace the stored item with the same id
    fn update(&mut self, item: T) -> Result<(), RepositoryError>;

    /// Remove and return the item with `id`
    fn remove(&mut self, id: Uuid) -> Result<T, RepositoryError>;
}

/// A [`Repository`] held in memory, in insertion order
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    items: Vec<T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == Some(id))
    }
}

impl<T: Identified> Repository<T> for MemoryRepository<T> {
    fn get_all(&self) -> Vec<&T> {
        self.items.iter().collect()
    }

    fn get_by_id(&self, id: Uuid) -> Option<&T> {
        self.position(id).map(|index| &self.items[index])
    }

    fn add(&mut self, item: T) -> Result<(), RepositoryError> {
        let id = item.id().ok_or(RepositoryError::MissingId)?;
        if self.position(id).is_some() {
            return Err(RepositoryError::Duplicate { id });
        }
        self.items.push(item);
        Ok(())
    }

    fn update(&mut self, item: T) -> Result<(), RepositoryError> {
        let id = item.id().ok_or(RepositoryError::MissingId)?;
        let index = self.position(id).ok_or(RepositoryError::NotFound { id })?;
        self.items[index] = item;
        Ok(())
    }

    fn remove(&mut self, id: Uuid) -> Result<T, RepositoryError> {
        let index = self.position(id).ok_or(RepositoryError::NotFound { id })?;
        Ok(self.items.remove(index))
    }
}
