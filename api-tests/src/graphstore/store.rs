// api-tests/src/graphstore/store.rs
// ============================================================================
// Module: Graph Store
// Description: Neo4j-backed setup/teardown helpers for graph fixtures.
// Purpose: Seed code lists and hierarchies read by the services under test.
// Dependencies: neo4rs, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`GraphStore`] runs fixture statements over Bolt. Teardown statements
//! delete by label match, so removing nodes that were never created is not
//! an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use neo4rs::ConfigBuilder;
use neo4rs::Graph;
use thiserror::Error;
use tracing::debug;

use super::statement::CypherStatement;
use super::statement::GraphFixture;
use super::statement::quote_label;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Connection pool size; suites run serially so a few connections suffice.
const MAX_CONNECTIONS: usize = 4;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Graph store failures.
#[derive(Debug, Error)]
pub enum GraphStoreError {
    /// Connection or handshake failure.
    #[error("graph store connect error: {0}")]
    Connect(String),
    /// A statement failed.
    #[error("graph store statement failed in {fixture}: {message}")]
    Statement {
        /// Fixture or operation the statement belonged to.
        fixture: String,
        /// Driver error message.
        message: String,
    },
    /// A label could not be safely interpolated.
    #[error("graph store invalid label: `{0}`")]
    InvalidLabel(String),
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Handle to the graph store used by the services under test.
#[derive(Clone)]
pub struct GraphStore {
    /// Pooled driver handle; cheap to clone.
    graph: Graph,
}

impl GraphStore {
    /// Connects to the store and verifies it answers a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`GraphStoreError::Connect`] when the configuration is invalid
    /// or the server is unreachable.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, GraphStoreError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .max_connections(MAX_CONNECTIONS)
            .build()
            .map_err(|err| GraphStoreError::Connect(format!("{uri}: {err}")))?;
        let graph = Graph::connect(config)
            .await
            .map_err(|err| GraphStoreError::Connect(format!("{uri}: {err}")))?;
        graph
            .run(neo4rs::query("RETURN 1"))
            .await
            .map_err(|err| GraphStoreError::Connect(format!("{uri}: probe failed: {err}")))?;
        debug!(uri = %uri, "graph store connected");
        Ok(Self {
            graph,
        })
    }

    /// Runs one statement, discarding any rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the statement fails.
    pub async fn run(
        &self,
        context: &str,
        statement: &CypherStatement,
    ) -> Result<(), GraphStoreError> {
        self.graph.run(statement.to_query()).await.map_err(|err| GraphStoreError::Statement {
            fixture: context.to_string(),
            message: err.to_string(),
        })
    }

    /// Runs every setup statement of a fixture in order.
    ///
    /// # Errors
    ///
    /// Returns the first statement failure.
    pub async fn setup(&self, fixture: &GraphFixture) -> Result<(), GraphStoreError> {
        for statement in &fixture.setup {
            self.run(&fixture.name, statement).await?;
        }
        debug!(fixture = %fixture.name, statements = fixture.setup.len(), "graph fixture seeded");
        Ok(())
    }

    /// Runs every teardown statement of a fixture in order.
    ///
    /// # Errors
    ///
    /// Returns the first statement failure.
    pub async fn teardown(&self, fixture: &GraphFixture) -> Result<(), GraphStoreError> {
        for statement in &fixture.teardown {
            self.run(&fixture.name, statement).await?;
        }
        debug!(fixture = %fixture.name, "graph fixture removed");
        Ok(())
    }

    /// Counts nodes carrying a label.
    ///
    /// # Errors
    ///
    /// Returns an error when the label is invalid or the query fails.
    pub async fn count_nodes(&self, label: &str) -> Result<i64, GraphStoreError> {
        let quoted = quote_label(label)?;
        let statement =
            CypherStatement::new(format!("MATCH (n:{quoted}) RETURN count(n) AS total"));
        let query_error = |message: String| GraphStoreError::Statement {
            fixture: format!("count {label}"),
            message,
        };
        let mut rows = self
            .graph
            .execute(statement.to_query())
            .await
            .map_err(|err| query_error(err.to_string()))?;
        let Some(row) = rows.next().await.map_err(|err| query_error(err.to_string()))? else {
            return Ok(0);
        };
        row.get::<i64>("total").map_err(|err| query_error(err.to_string()))
    }
}
