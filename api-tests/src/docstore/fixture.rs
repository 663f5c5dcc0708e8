// api-tests/src/docstore/fixture.rs
// ============================================================================
// Module: Document Fixtures
// Description: Fixture document model keyed by database/collection/key/value.
// Purpose: Describe seeded documents as dotted-path `$set` updates.
// Dependencies: mongodb (bson), serde_json
// ============================================================================

//! ## Overview
//! A [`FixtureDoc`] names the database and collection it lives in, the
//! [`FixtureKey`] used to select it, and a [`FixtureUpdate`] holding the
//! fields to upsert. Nested fields are addressed with dotted paths such as
//! `current.links.self.href`, mirroring how the services store documents.
//! Invariants:
//! - No update path is a prefix of another path in the same update.
//! - [`FixtureSet`] preserves insertion order; teardown walks it in reverse.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use mongodb::bson::Bson;
use mongodb::bson::Document;
use mongodb::bson::doc;
use serde_json::Value;

use super::store::DocumentStoreError;

// ============================================================================
// SECTION: Key
// ============================================================================

/// Field/value selector identifying a fixture document.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureKey {
    /// Field name, usually `_id`.
    pub field: String,
    /// Value the field must equal.
    pub value: Bson,
}

impl FixtureKey {
    /// Creates a key on an arbitrary field.
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a key on `_id`.
    #[must_use]
    pub fn id(value: impl Into<Bson>) -> Self {
        Self::new("_id", value)
    }

    /// Returns the filter document selecting this key.
    #[must_use]
    pub fn filter(&self) -> Document {
        let mut filter = Document::new();
        filter.insert(self.field.clone(), self.value.clone());
        filter
    }
}

// ============================================================================
// SECTION: Update
// ============================================================================

/// Ordered set of dotted-path field assignments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixtureUpdate {
    /// Dotted path to value, in insertion order.
    fields: Document,
}

impl FixtureUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a JSON object into dotted-path assignments.
    ///
    /// Objects recurse; arrays, scalars and empty objects become leaf values.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Invalid`] when `value` is not a non-empty
    /// object or a leaf cannot be represented as BSON.
    pub fn from_json(value: &Value) -> Result<Self, DocumentStoreError> {
        let Value::Object(map) = value else {
            return Err(DocumentStoreError::Invalid(
                "fixture update must be a JSON object".to_string(),
            ));
        };
        if map.is_empty() {
            return Err(DocumentStoreError::Invalid("fixture update must not be empty".to_string()));
        }
        let mut leaves = Vec::new();
        flatten_json("", value, &mut leaves);
        let mut update = Self::new();
        for (path, leaf) in leaves {
            let bson = mongodb::bson::to_bson(leaf).map_err(|err| {
                DocumentStoreError::Invalid(format!(
                    "fixture field {path} is not valid bson: {err}"
                ))
            })?;
            update.fields.insert(path, bson);
        }
        Ok(update)
    }

    /// Flattens a BSON document into dotted-path assignments.
    ///
    /// Uses the same leaf rules as [`FixtureUpdate::from_json`].
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let mut update = Self::new();
        flatten_document("", document, &mut update.fields);
        update
    }

    /// Assigns a value at a dotted path, replacing any previous assignment.
    #[must_use]
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.fields.insert(path.into(), value.into());
        self
    }

    /// Returns the assigned value at an exact dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Bson> {
        self.fields.get(path)
    }

    /// Returns the dotted paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when there are no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the `{"$set": {...}}` update document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Invalid`] when the update is empty or two
    /// paths conflict (one is a prefix of the other).
    pub fn to_update_document(&self) -> Result<Document, DocumentStoreError> {
        if self.fields.is_empty() {
            return Err(DocumentStoreError::Invalid("fixture update must not be empty".to_string()));
        }
        let paths: HashSet<&str> = self.paths().collect();
        for &path in &paths {
            for (index, _) in path.match_indices('.') {
                let parent = &path[..index];
                if paths.contains(parent) {
                    return Err(DocumentStoreError::Invalid(format!(
                        "fixture paths {parent} and {path} conflict"
                    )));
                }
            }
        }
        Ok(doc! { "$set": self.fields.clone() })
    }
}

/// Collects dotted-path leaves from a JSON value.
fn flatten_json<'a>(prefix: &str, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path =
                    if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                flatten_json(&path, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), leaf)),
    }
}

/// Copies dotted-path leaves from a BSON document.
fn flatten_document(prefix: &str, document: &Document, out: &mut Document) {
    for (key, child) in document {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match child {
            Bson::Document(nested) if !nested.is_empty() => flatten_document(&path, nested, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

// ============================================================================
// SECTION: Documents
// ============================================================================

/// One document seeded into the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDoc {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Selector for the document.
    pub key: FixtureKey,
    /// Fields to upsert.
    pub update: FixtureUpdate,
}

impl FixtureDoc {
    /// Creates a fixture document.
    #[must_use]
    pub fn new(
        database: impl Into<String>,
        collection: impl Into<String>,
        key: FixtureKey,
        update: FixtureUpdate,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            key,
            update,
        }
    }

    /// Overrides one field of the fixture.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.update = self.update.set(path, value);
        self
    }

    /// Returns the `database.collection` namespace.
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

/// Ordered group of fixture documents set up and torn down together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixtureSet {
    /// Documents in setup order.
    docs: Vec<FixtureDoc>,
}

impl FixtureSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document.
    #[must_use]
    pub fn with(mut self, doc: FixtureDoc) -> Self {
        self.docs.push(doc);
        self
    }

    /// Appends a document in place.
    pub fn push(&mut self, doc: FixtureDoc) {
        self.docs.push(doc);
    }

    /// Iterates documents in setup order.
    pub fn iter(&self) -> std::slice::Iter<'_, FixtureDoc> {
        self.docs.iter()
    }

    /// Iterates documents in teardown order.
    pub fn iter_teardown(&self) -> std::iter::Rev<std::slice::Iter<'_, FixtureDoc>> {
        self.docs.iter().rev()
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl FromIterator<FixtureDoc> for FixtureSet {
    fn from_iter<T: IntoIterator<Item = FixtureDoc>>(iter: T) -> Self {
        Self {
            docs: iter.into_iter().collect(),
        }
    }
}

impl Extend<FixtureDoc> for FixtureSet {
    fn extend<T: IntoIterator<Item = FixtureDoc>>(&mut self, iter: T) {
        self.docs.extend(iter);
    }
}

impl<'a> IntoIterator for &'a FixtureSet {
    type Item = &'a FixtureDoc;
    type IntoIter = std::slice::Iter<'a, FixtureDoc>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
