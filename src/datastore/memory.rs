//! In-memory store
//!
//! Readers share a read lock; mutations take the write lock.

use parking_lot::RwLock;
use serde_json::Value as Json;

use crate::error::Result;

use super::{Action, DataStore, Documents, Outcome};

/// Non-persistent block metadata store
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    docs: RwLock<Documents>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing documents
    pub fn with_documents(docs: Vec<Json>) -> Result<Self> {
        Ok(Self {
            docs: RwLock::new(Documents::from_documents(docs)?),
        })
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl DataStore for MemoryDataStore {
    fn execute(&self, action: Action) -> Result<Outcome> {
        let answered = self.docs.read().query(&action);
        match answered {
            Some(outcome) => Ok(outcome),
            None => self.docs.write().apply(action),
        }
    }
}
