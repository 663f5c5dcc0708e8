// api-tests/src/fixtures/hierarchy.rs
// ============================================================================
// Module: Hierarchy Fixtures
// Description: Hierarchy node trees seeded into the graph store.
// Purpose: Give the hierarchy API an instance or generic tree to walk.
// Dependencies: neo4rs (via graphstore)
// ============================================================================

//! ## Overview
//! A hierarchy is a set of nodes sharing one label, linked child to parent
//! with `hasParent`. Instance hierarchies are labelled per instance and
//! dimension; generic hierarchies are labelled per code list and are copied
//! into instance hierarchies by the import pipeline.

use super::AGGREGATE_CODE_LIST;
use crate::graphstore::CypherStatement;
use crate::graphstore::GraphFixture;
use crate::graphstore::GraphStoreError;
use crate::graphstore::delete_label;
use crate::graphstore::quote_label;

/// Which hierarchy a tree belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyScope {
    /// Hierarchy built for one dimension of an instance.
    Instance {
        /// Instance identifier.
        instance_id: String,
        /// Dimension name.
        dimension: String,
    },
    /// Reusable hierarchy for a code list.
    Generic {
        /// Code list identifier.
        code_list: String,
    },
}

impl HierarchyScope {
    /// Returns the node label for this scope.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Instance {
                instance_id,
                dimension,
            } => format!("_hierarchy_node_{instance_id}_{dimension}"),
            Self::Generic {
                code_list,
            } => format!("_generic_hierarchy_node_{code_list}"),
        }
    }
}

/// One node of a hierarchy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Code the node represents.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Parent code; `None` for the root.
    pub parent: Option<String>,
    /// Whether observations exist for this code.
    pub has_data: bool,
}

impl HierarchyNode {
    /// Creates a root node.
    #[must_use]
    pub fn root(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            parent: None,
            has_data: true,
        }
    }

    /// Creates a child node.
    #[must_use]
    pub fn child(code: &str, label: &str, parent: &str, has_data: bool) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            parent: Some(parent.to_string()),
            has_data,
        }
    }
}

/// Returns a small CPIH aggregate tree: one root, two groups, two leaves.
#[must_use]
pub fn cpih_hierarchy_nodes() -> Vec<HierarchyNode> {
    vec![
        HierarchyNode::root("cpih1dim1A0", "CPIH (overall index)"),
        HierarchyNode::child(
            "cpih1dim1T10000",
            "01 Food and non-alcoholic beverages",
            "cpih1dim1A0",
            true,
        ),
        HierarchyNode::child("cpih1dim1G10100", "01.1 Food", "cpih1dim1T10000", true),
        HierarchyNode::child(
            "cpih1dim1T40000",
            "04 Housing, water, electricity, gas and other fuels",
            "cpih1dim1A0",
            false,
        ),
        HierarchyNode::child(
            "cpih1dim1S40403",
            "04.04.03 Sewerage collection",
            "cpih1dim1T40000",
            true,
        ),
    ]
}

/// Builds a hierarchy tree.
///
/// All nodes are created before any `hasParent` relationship so that node
/// order in `nodes` does not matter. Teardown deletes every node carrying
/// the scope label.
///
/// # Errors
///
/// Returns [`GraphStoreError::InvalidLabel`] when the scope label cannot be
/// quoted.
pub fn hierarchy(
    scope: &HierarchyScope,
    code_list: &str,
    nodes: &[HierarchyNode],
) -> Result<GraphFixture, GraphStoreError> {
    let label = scope.label();
    let quoted = quote_label(&label)?;
    let mut fixture = GraphFixture::new(format!("hierarchy {label}"));
    for node in nodes {
        fixture = fixture.with_setup(
            CypherStatement::new(format!(
                "CREATE (:{quoted} {{code: $code, label: $label, code_list: $code_list, \
                 hasData: $has_data}})"
            ))
            .param("code", node.code.as_str())
            .param("label", node.label.as_str())
            .param("code_list", code_list)
            .param("has_data", node.has_data),
        );
    }
    for node in nodes {
        let Some(parent) = &node.parent else {
            continue;
        };
        fixture = fixture.with_setup(
            CypherStatement::new(format!(
                "MATCH (child:{quoted} {{code: $code}}), (parent:{quoted} {{code: $parent}}) \
                 CREATE (child)-[:hasParent]->(parent)"
            ))
            .param("code", node.code.as_str())
            .param("parent", parent.as_str()),
        );
    }
    Ok(fixture.with_teardown(delete_label(&label)?))
}

/// Builds the CPIH tree for the aggregate dimension of an instance.
///
/// # Errors
///
/// Returns an error when the instance identifier is not a valid label part.
pub fn cpih_instance_hierarchy(instance_id: &str) -> Result<GraphFixture, GraphStoreError> {
    let scope = HierarchyScope::Instance {
        instance_id: instance_id.to_string(),
        dimension: super::AGGREGATE_DIMENSION.to_string(),
    };
    hierarchy(&scope, AGGREGATE_CODE_LIST, &cpih_hierarchy_nodes())
}
