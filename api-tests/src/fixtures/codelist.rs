// api-tests/src/fixtures/codelist.rs
// ============================================================================
// Module: Code List Fixtures
// Description: Code list and code nodes seeded into the graph store.
// Purpose: Give the code-list API known lists and codes to serve.
// Dependencies: neo4rs (via graphstore), uuid
// ============================================================================

//! ## Overview
//! Seeded lists live under fresh identifiers and every node carries a
//! `seeded_by` marker. Teardown matches on both, so it can never reach a
//! code list the deployment already holds.

use super::AGGREGATE_OPTIONS;
use super::TIME_OPTIONS;
use super::unique_id;
use crate::graphstore::CypherStatement;
use crate::graphstore::GraphFixture;
use crate::graphstore::GraphStoreError;
use crate::graphstore::quote_label;

/// Edition stored on seeded code lists.
const CODE_LIST_EDITION: &str = "one-off";
/// Value of the `seeded_by` property on every seeded code list node.
pub const CODE_LIST_SEED_MARKER: &str = "dp-api-tests";

/// One code belonging to a code list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFixture {
    /// Code value, e.g. `cpih1dim1G10100`.
    pub value: String,
    /// Label on the `usedBy` relationship.
    pub label: String,
}

impl CodeFixture {
    /// Creates a code.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Returns the per-list label `_code_list_{id}`.
#[must_use]
pub fn code_list_label(code_list_id: &str) -> String {
    format!("_code_list_{code_list_id}")
}

/// Returns a fresh code list identifier that is safe inside a label.
#[must_use]
pub fn seeded_code_list_id() -> String {
    format!("dp_api_tests_{}", unique_id().replace('-', ""))
}

/// Builds a code list node plus its codes.
///
/// Codes link to the list through `usedBy`; teardown removes the codes
/// before the list node. Only nodes carrying [`CODE_LIST_SEED_MARKER`] are
/// removed.
///
/// # Errors
///
/// Returns [`GraphStoreError::InvalidLabel`] when `code_list_id` cannot be
/// used inside a label.
pub fn code_list(
    code_list_id: &str,
    label: &str,
    codes: &[CodeFixture],
) -> Result<GraphFixture, GraphStoreError> {
    let list_label = quote_label(&code_list_label(code_list_id))?;
    let mut fixture = GraphFixture::new(format!("code list {code_list_id}")).with_setup(
        CypherStatement::new(format!(
            "CREATE (:_code_list:{list_label} \
             {{label: $label, edition: $edition, seeded_by: $seeded_by}})"
        ))
        .param("label", label)
        .param("edition", CODE_LIST_EDITION)
        .param("seeded_by", CODE_LIST_SEED_MARKER),
    );
    for code in codes {
        fixture = fixture.with_setup(
            CypherStatement::new(format!(
                "MATCH (parent:{list_label} {{seeded_by: $seeded_by}}) \
                 CREATE (:_code {{value: $value, seeded_by: $seeded_by}})\
                 -[:usedBy {{label: $label}}]->(parent)"
            ))
            .param("value", code.value.as_str())
            .param("label", code.label.as_str())
            .param("seeded_by", CODE_LIST_SEED_MARKER),
        );
    }
    Ok(fixture
        .with_teardown(
            CypherStatement::new(format!(
                "MATCH (code:_code {{seeded_by: $seeded_by}})\
                 -[:usedBy]->(:{list_label} {{seeded_by: $seeded_by}}) DETACH DELETE code"
            ))
            .param("seeded_by", CODE_LIST_SEED_MARKER),
        )
        .with_teardown(
            CypherStatement::new(format!(
                "MATCH (n:{list_label} {{seeded_by: $seeded_by}}) DETACH DELETE n"
            ))
            .param("seeded_by", CODE_LIST_SEED_MARKER),
        ))
}

/// Builds a list holding the aggregate codes of seeded instances.
///
/// # Errors
///
/// Returns an error when the list identifier is not a valid label.
pub fn cpih_aggregate_code_list(code_list_id: &str) -> Result<GraphFixture, GraphStoreError> {
    let codes: Vec<CodeFixture> =
        AGGREGATE_OPTIONS.iter().map(|(value, label)| CodeFixture::new(value, label)).collect();
    code_list(code_list_id, "CPIH Aggregate", &codes)
}

/// Builds a list holding the time codes of seeded instances.
///
/// # Errors
///
/// Returns an error when the list identifier is not a valid label.
pub fn time_code_list(code_list_id: &str) -> Result<GraphFixture, GraphStoreError> {
    let codes: Vec<CodeFixture> =
        TIME_OPTIONS.iter().map(|(value, label)| CodeFixture::new(value, label)).collect();
    code_list(code_list_id, "Time", &codes)
}
