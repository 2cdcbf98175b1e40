//! Document table
//!
//! Flat list of JSON object documents with key/value queries. This is the
//! state both store flavours wrap; it does no I/O and no locking.

use serde_json::{Map, Value as Json};

use crate::error::{Result, SparkError};

use super::{Action, Outcome};

/// In-memory document table
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Documents {
    docs: Vec<Map<String, Json>>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from loaded documents (each must be an object)
    pub fn from_documents(docs: Vec<Json>) -> Result<Self> {
        let docs = docs
            .into_iter()
            .map(into_object)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { docs })
    }

    /// Snapshot of all documents
    pub fn to_documents(&self) -> Vec<Json> {
        self.docs.iter().cloned().map(Json::Object).collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Answer a read-only action, `None` for mutations
    pub fn query(&self, action: &Action) -> Option<Outcome> {
        match action {
            Action::All => Some(Outcome::Documents(self.to_documents())),
            Action::FindByKey { key, value } => Some(Outcome::Documents(
                self.matching(key, value)
                    .map(|i| Json::Object(self.docs[i].clone()))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Apply any action
    ///
    /// A failing action leaves the table unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Outcome> {
        if let Some(outcome) = self.query(&action) {
            return Ok(outcome);
        }

        match action {
            Action::All | Action::FindByKey { .. } => Ok(Outcome::Done),

            Action::Purge => {
                self.docs.clear();
                Ok(Outcome::Done)
            }

            Action::Insert(doc) => {
                self.docs.push(into_object(doc)?);
                Ok(Outcome::Done)
            }

            Action::InsertMultiple(docs) => {
                let docs = docs
                    .into_iter()
                    .map(into_object)
                    .collect::<Result<Vec<_>>>()?;
                self.docs.extend(docs);
                Ok(Outcome::Done)
            }

            Action::InsertUnique { key, document } => {
                let doc = into_object(document)?;
                let id = doc
                    .get(&key)
                    .ok_or_else(|| SparkError::MissingKey(key.clone()))?;
                if self.matching(&key, id).next().is_some() {
                    return Err(SparkError::DuplicateKey {
                        key,
                        value: id.to_string(),
                    });
                }
                self.docs.push(doc);
                Ok(Outcome::Done)
            }

            Action::Update { key, value, fields } => {
                let fields = into_object(fields)?;
                let hits: Vec<usize> = self.matching(&key, &value).collect();
                for &i in &hits {
                    merge(&mut self.docs[i], &fields);
                }
                Ok(Outcome::Count(hits.len()))
            }

            Action::UpdateUnique {
                key,
                value,
                document,
                unique_key,
            } => {
                let doc = into_object(document)?;
                let hits: Vec<usize> = self.matching(&key, &value).collect();
                if hits.len() > 1 {
                    return Err(SparkError::MultipleMatches {
                        key,
                        value: value.to_string(),
                    });
                }

                if let Some(unique_key) = unique_key {
                    let unique = doc
                        .get(&unique_key)
                        .ok_or_else(|| SparkError::MissingKey(unique_key.clone()))?;
                    if self.matching(&unique_key, unique).next().is_some() {
                        return Err(SparkError::DuplicateKey {
                            key: unique_key,
                            value: unique.to_string(),
                        });
                    }
                }

                match hits.first() {
                    Some(&i) => merge(&mut self.docs[i], &doc),
                    None => self.docs.push(doc),
                }
                Ok(Outcome::Count(1))
            }
        }
    }

    fn matching<'a>(&'a self, key: &'a str, value: &'a Json) -> impl Iterator<Item = usize> + 'a {
        self.docs
            .iter()
            .enumerate()
            .filter(move |(_, doc)| doc.get(key) == Some(value))
            .map(|(i, _)| i)
    }
}

fn into_object(doc: Json) -> Result<Map<String, Json>> {
    match doc {
        Json::Object(map) => Ok(map),
        other => Err(SparkError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn merge(doc: &mut Map<String, Json>, fields: &Map<String, Json>) {
    for (k, v) in fields {
        doc.insert(k.clone(), v.clone());
    }
}
