// api-tests/src/graphstore/mod.rs
// ============================================================================
// Module: Graph Store Fixtures
// Description: Cypher fixtures and the store that seeds and clears them.
// Purpose: Give suites a single entry point for graph-store preconditions.
// Dependencies: neo4rs
// ============================================================================

//! ## Overview
//! Graph preconditions are [`GraphFixture`]s: setup and teardown Cypher
//! statements with bound parameters, applied through [`GraphStore`]. Labels
//! are the only text spliced into Cypher and always pass [`quote_label`].
//!
//! ```
//! use dp_api_tests::graphstore::delete_label;
//!
//! let statement = delete_label("_hierarchy_node_inst1_aggregate")?;
//! assert_eq!(statement.text, "MATCH (n:`_hierarchy_node_inst1_aggregate`) DETACH DELETE n");
//! assert!(delete_label("bad`label").is_err());
//! # Ok::<(), dp_api_tests::graphstore::GraphStoreError>(())
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

mod statement;
mod store;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use statement::CypherStatement;
pub use statement::GraphFixture;
pub use statement::ParamValue;
pub use statement::delete_label;
pub use statement::quote_label;
pub use store::GraphStore;
pub use store::GraphStoreError;
