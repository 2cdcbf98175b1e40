//! Datastore Module
//!
//! Block metadata CRUD: which `(service_id, type, object)` records exist,
//! so blocks can be recovered after a restart.
//!
//! ## Responsibilities
//! - Key/value queries over JSON documents
//! - Uniqueness-checked inserts and upserts
//! - Serialized persistence through a single writer thread
//!
//! ## File Format
//! ```text
//! ┌───────────┬─────────────┬─────────┬─────────┬────────────────┐
//! │ Magic (4) │ Version (2) │ Len (4) │ CRC (4) │ JSON documents │
//! └───────────┴─────────────┴─────────┴─────────┴────────────────┘
//! ```

mod documents;
mod file;
mod memory;
mod record;
mod snapshot;

use serde_json::Value as Json;

use crate::error::Result;

pub use documents::Documents;
pub use file::FileDataStore;
pub use memory::MemoryDataStore;
pub use record::ObjectRecord;
pub use snapshot::{read_snapshot, write_snapshot, HEADER_SIZE, MAGIC, VERSION};

/// A single store operation
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Return every document
    All,

    /// Remove every document
    Purge,

    /// Documents where `doc[key] == value`
    FindByKey { key: String, value: Json },

    /// Append a document without uniqueness checks
    Insert(Json),

    /// Append many documents without uniqueness checks
    InsertMultiple(Vec<Json>),

    /// Append a document unless another one has the same `doc[key]`
    InsertUnique { key: String, document: Json },

    /// Merge `fields` into every document where `doc[key] == value`
    Update { key: String, value: Json, fields: Json },

    /// Merge into the single match, or insert if nothing matches
    UpdateUnique {
        key: String,
        value: Json,
        document: Json,
        unique_key: Option<String>,
    },
}

impl Action {
    /// True if applying the action can change the table
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::All | Action::FindByKey { .. })
    }
}

/// Result of an applied action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Documents(Vec<Json>),
    Count(usize),
    Done,
}

impl Outcome {
    pub fn into_documents(self) -> Vec<Json> {
        match self {
            Outcome::Documents(docs) => docs,
            _ => Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Outcome::Documents(docs) => docs.len(),
            Outcome::Count(n) => *n,
            Outcome::Done => 0,
        }
    }
}

/// Block metadata store
///
/// Implementations decide where documents live and how access is
/// serialized; the query logic is shared through [`Documents`].
pub trait DataStore: Send + Sync {
    /// Run one action against the store
    fn execute(&self, action: Action) -> Result<Outcome>;

    fn all(&self) -> Result<Vec<Json>> {
        self.execute(Action::All).map(Outcome::into_documents)
    }

    fn purge(&self) -> Result<()> {
        self.execute(Action::Purge).map(|_| ())
    }

    fn find_by_key(&self, key: &str, value: Json) -> Result<Vec<Json>> {
        self.execute(Action::FindByKey {
            key: key.to_string(),
            value,
        })
        .map(Outcome::into_documents)
    }

    fn insert(&self, document: Json) -> Result<()> {
        self.execute(Action::Insert(document)).map(|_| ())
    }

    fn insert_multiple(&self, documents: Vec<Json>) -> Result<()> {
        self.execute(Action::InsertMultiple(documents)).map(|_| ())
    }

    fn insert_unique(&self, key: &str, document: Json) -> Result<()> {
        self.execute(Action::InsertUnique {
            key: key.to_string(),
            document,
        })
        .map(|_| ())
    }

    /// Returns the number of updated documents
    fn update(&self, key: &str, value: Json, fields: Json) -> Result<usize> {
        self.execute(Action::Update {
            key: key.to_string(),
            value,
            fields,
        })
        .map(|outcome| outcome.count())
    }

    fn update_unique(
        &self,
        key: &str,
        value: Json,
        document: Json,
        unique_key: Option<&str>,
    ) -> Result<()> {
        self.execute(Action::UpdateUnique {
            key: key.to_string(),
            value,
            document,
            unique_key: unique_key.map(str::to_string),
        })
        .map(|_| ())
    }
}
