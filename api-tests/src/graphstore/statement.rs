// api-tests/src/graphstore/statement.rs
// ============================================================================
// Module: Graph Fixtures
// Description: Cypher statements grouped into setup/teardown fixtures.
// Purpose: Describe graph preconditions without holding a connection.
// Dependencies: neo4rs
// ============================================================================

//! ## Overview
//! A [`GraphFixture`] pairs the statements that seed graph nodes with the
//! statements that remove them. Labels are interpolated into Cypher text, so
//! they pass through [`quote_label`], which rejects anything that could break
//! out of a backtick-quoted identifier. Values always travel as parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use neo4rs::BoltType;
use neo4rs::Query;

use super::store::GraphStoreError;

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Parameter value bound to a Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// String parameter.
    Str(String),
    /// Integer parameter.
    Int(i64),
    /// Boolean parameter.
    Bool(bool),
    /// List of strings.
    StrList(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::StrList(value)
    }
}

impl From<ParamValue> for BoltType {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Str(value) => value.into(),
            ParamValue::Int(value) => value.into(),
            ParamValue::Bool(value) => value.into(),
            ParamValue::StrList(value) => value.into(),
        }
    }
}

// ============================================================================
// SECTION: Statements
// ============================================================================

/// One parameterised Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherStatement {
    /// Statement text.
    pub text: String,
    /// Named parameters in binding order.
    pub params: Vec<(String, ParamValue)>,
}

impl CypherStatement {
    /// Creates a statement without parameters.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Binds a named parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Converts into a driver query.
    #[must_use]
    pub fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(neo4rs::query(&self.text), |query, (name, value)| {
                query.param(name, value.clone())
            })
    }
}

/// Setup and teardown statements for one group of graph nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFixture {
    /// Name used in logs.
    pub name: String,
    /// Statements run in order to seed the nodes.
    pub setup: Vec<CypherStatement>,
    /// Statements run in order to remove the nodes; must tolerate absence.
    pub teardown: Vec<CypherStatement>,
}

impl GraphFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: Vec::new(),
            teardown: Vec::new(),
        }
    }

    /// Appends a setup statement.
    #[must_use]
    pub fn with_setup(mut self, statement: CypherStatement) -> Self {
        self.setup.push(statement);
        self
    }

    /// Appends a teardown statement.
    #[must_use]
    pub fn with_teardown(mut self, statement: CypherStatement) -> Self {
        self.teardown.push(statement);
        self
    }
}

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Returns a backtick-quoted label.
///
/// # Errors
///
/// Returns [`GraphStoreError::InvalidLabel`] when the label is empty or holds
/// characters other than ASCII alphanumerics, `_` and `-`.
pub fn quote_label(label: &str) -> Result<String, GraphStoreError> {
    let valid = !label.is_empty()
        && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !valid {
        return Err(GraphStoreError::InvalidLabel(label.to_string()));
    }
    Ok(format!("`{label}`"))
}

/// Returns a statement that detaches and deletes every node with a label.
///
/// # Errors
///
/// Returns an error when the label is invalid.
pub fn delete_label(label: &str) -> Result<CypherStatement, GraphStoreError> {
    let quoted = quote_label(label)?;
    Ok(CypherStatement::new(format!("MATCH (n:{quoted}) DETACH DELETE n")))
}
