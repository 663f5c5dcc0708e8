// api-tests/src/docstore/store.rs
// ============================================================================
// Module: Document Store
// Description: MongoDB-backed setup/teardown helpers for fixture documents.
// Purpose: Seed preconditions and observe side effects of API calls.
// Dependencies: mongodb, futures, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`DocumentStore`] upserts fixture documents by key and deletes them again
//! after a test. Teardown is idempotent: a document that is already gone is
//! reported as [`TeardownOutcome::Absent`] rather than an error, while any
//! other store failure is returned to the caller and fails the test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::Client;
use mongodb::Collection;
use mongodb::bson::Document;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use thiserror::Error;
use tracing::debug;

use super::fixture::FixtureDoc;
use super::fixture::FixtureKey;
use super::fixture::FixtureSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Application name reported to the server.
const APP_NAME: &str = "dp-api-tests";
/// Server selection timeout; keeps an unreachable store from hanging a suite.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Document store failures.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// Connection or handshake failure.
    #[error("document store connect error: {0}")]
    Connect(String),
    /// A store command failed.
    #[error("document store error on {namespace}: {message}")]
    Command {
        /// `database.collection` the command targeted.
        namespace: String,
        /// Driver error message.
        message: String,
    },
    /// Invalid fixture data.
    #[error("document store invalid fixture: {0}")]
    Invalid(String),
}

/// Result of tearing down one fixture document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Matching documents were deleted.
    Removed(u64),
    /// No document matched; nothing to do.
    Absent,
}

impl TeardownOutcome {
    /// Builds an outcome from a deleted-document count.
    #[must_use]
    pub const fn from_deleted(count: u64) -> Self {
        if count == 0 { Self::Absent } else { Self::Removed(count) }
    }

    /// Returns the number of deleted documents.
    #[must_use]
    pub const fn removed(self) -> u64 {
        match self {
            Self::Removed(count) => count,
            Self::Absent => 0,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Handle to the document store used by the services under test.
#[derive(Clone)]
pub struct DocumentStore {
    /// Driver client; cheap to clone.
    client: Client,
}

impl DocumentStore {
    /// Connects to the store and verifies it answers `ping`.
    ///
    /// `addr` may be a bare `host:port` or a full `mongodb://` URI.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Connect`] when the address does not
    /// parse or the server does not respond.
    pub async fn connect(addr: &str) -> Result<Self, DocumentStoreError> {
        let uri = mongo_uri(addr);
        let mut options = ClientOptions::parse(uri.as_str())
            .await
            .map_err(|err| DocumentStoreError::Connect(format!("{uri}: {err}")))?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)
            .map_err(|err| DocumentStoreError::Connect(format!("{uri}: {err}")))?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| DocumentStoreError::Connect(format!("{uri}: ping failed: {err}")))?;
        debug!(uri = %uri, "document store connected");
        Ok(Self {
            client,
        })
    }

    /// Returns a typed handle to a collection.
    fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client.database(database).collection(collection)
    }

    /// Upserts one fixture document.
    ///
    /// # Errors
    ///
    /// Returns an error when the update is invalid or the store rejects it.
    pub async fn setup(&self, fixture: &FixtureDoc) -> Result<(), DocumentStoreError> {
        let update = fixture.update.to_update_document()?;
        self.collection(&fixture.database, &fixture.collection)
            .update_one(fixture.key.filter(), update)
            .upsert(true)
            .await
            .map_err(|err| command_error(&fixture.namespace(), &err))?;
        debug!(
            database = %fixture.database,
            collection = %fixture.collection,
            key = %fixture.key.field,
            value = %fixture.key.value,
            "fixture seeded"
        );
        Ok(())
    }

    /// Upserts every document in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first setup error.
    pub async fn setup_many(&self, fixtures: &FixtureSet) -> Result<(), DocumentStoreError> {
        for fixture in fixtures {
            self.setup(fixture).await?;
        }
        Ok(())
    }

    /// Deletes every document matching the fixture key.
    ///
    /// # Errors
    ///
    /// Returns an error for store failures; a missing document is not one.
    pub async fn teardown(
        &self,
        fixture: &FixtureDoc,
    ) -> Result<TeardownOutcome, DocumentStoreError> {
        let outcome = self
            .teardown_where(&fixture.database, &fixture.collection, fixture.key.filter())
            .await?;
        if outcome == TeardownOutcome::Absent {
            debug!(
                database = %fixture.database,
                collection = %fixture.collection,
                key = %fixture.key.field,
                value = %fixture.key.value,
                "fixture already absent"
            );
        }
        Ok(outcome)
    }

    /// Tears down every document in reverse setup order.
    ///
    /// Returns the total number of deleted documents.
    ///
    /// # Errors
    ///
    /// Returns the first teardown error.
    pub async fn teardown_many(&self, fixtures: &FixtureSet) -> Result<u64, DocumentStoreError> {
        let mut removed = 0u64;
        for fixture in fixtures.iter_teardown() {
            removed = removed.saturating_add(self.teardown(fixture).await?.removed());
        }
        Ok(removed)
    }

    /// Deletes every document matching an arbitrary filter.
    ///
    /// # Errors
    ///
    /// Returns an error when the store rejects the delete.
    pub async fn teardown_where(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<TeardownOutcome, DocumentStoreError> {
        let result = self
            .collection(database, collection)
            .delete_many(filter)
            .await
            .map_err(|err| command_error(&format!("{database}.{collection}"), &err))?;
        Ok(TeardownOutcome::from_deleted(result.deleted_count))
    }

    /// Reads the document selected by a key.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn find_one(
        &self,
        database: &str,
        collection: &str,
        key: &FixtureKey,
    ) -> Result<Option<Document>, DocumentStoreError> {
        self.collection(database, collection)
            .find_one(key.filter())
            .await
            .map_err(|err| command_error(&format!("{database}.{collection}"), &err))
    }

    /// Reads every document matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error when the query or cursor fails.
    pub async fn find_all(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let namespace = format!("{database}.{collection}");
        let cursor = self
            .collection(database, collection)
            .find(filter)
            .await
            .map_err(|err| command_error(&namespace, &err))?;
        cursor.try_collect::<Vec<Document>>().await.map_err(|err| command_error(&namespace, &err))
    }

    /// Counts documents matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error when the count fails.
    pub async fn count(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64, DocumentStoreError> {
        self.collection(database, collection)
            .count_documents(filter)
            .await
            .map_err(|err| command_error(&format!("{database}.{collection}"), &err))
    }

    /// Drops a whole database. Dropping a missing database succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the drop fails.
    pub async fn drop_database(&self, database: &str) -> Result<(), DocumentStoreError> {
        self.client
            .database(database)
            .drop()
            .await
            .map_err(|err| command_error(database, &err))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Expands a bare `host:port` into a connection string.
#[must_use]
pub fn mongo_uri(addr: &str) -> String {
    let trimmed = addr.trim();
    if trimmed.starts_with("mongodb://") || trimmed.starts_with("mongodb+srv://") {
        trimmed.to_string()
    } else {
        format!("mongodb://{trimmed}")
    }
}

/// Maps a driver error onto a namespaced command error.
fn command_error(namespace: &str, err: &mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Command {
        namespace: namespace.to_string(),
        message: err.to_string(),
    }
}
