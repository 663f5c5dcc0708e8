// api-tests/src/fixtures/dimension.rs
// ============================================================================
// Module: Dimension Option Fixtures
// Description: Dimension option documents attached to an instance.
// Purpose: Seed the options listed under a version's dimensions.
// Dependencies: mongodb (bson)
// ============================================================================

use mongodb::bson::Document;
use mongodb::bson::doc;

use super::ApiLinks;
use super::DATASETS_DATABASE;
use super::DIMENSION_OPTIONS_COLLECTION;
use super::DatasetIds;
use super::FIXTURE_TIMESTAMP;
use crate::docstore::FixtureDoc;
use crate::docstore::FixtureKey;
use crate::docstore::FixtureUpdate;

/// Name of the aggregate dimension on seeded instances.
pub const AGGREGATE_DIMENSION: &str = "aggregate";
/// Code list backing the aggregate dimension.
pub const AGGREGATE_CODE_LIST: &str = "cpih1dim1aggid";
/// Seeded aggregate options as `(code, label)`.
pub const AGGREGATE_OPTIONS: [(&str, &str); 2] = [
    ("cpih1dim1S40403", "04.04.03 Sewerage collection"),
    ("cpih1dim1G10100", "01.1 Food"),
];
/// Name of the time dimension on seeded instances.
pub const TIME_DIMENSION: &str = "time";
/// Code list backing the time dimension.
pub const TIME_CODE_LIST: &str = "mmm-yy";
/// Seeded time options as `(code, label)`.
pub const TIME_OPTIONS: [(&str, &str); 2] = [("Aug-16", "Aug-16"), ("Sep-16", "Sep-16")];

/// One option of a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionOption {
    /// Dimension name.
    pub name: String,
    /// Option code.
    pub option: String,
    /// Human-readable label.
    pub label: String,
    /// Code list the option's code belongs to.
    pub code_list_id: String,
}

impl DimensionOption {
    /// Creates an option.
    #[must_use]
    pub fn new(name: &str, option: &str, label: &str, code_list_id: &str) -> Self {
        Self {
            name: name.to_string(),
            option: option.to_string(),
            label: label.to_string(),
            code_list_id: code_list_id.to_string(),
        }
    }
}

/// Builds a dimension option document.
///
/// The `_id` is derived from the instance, dimension and option so the same
/// option can be torn down without knowing a generated identifier.
#[must_use]
pub fn dimension_option(
    links: &ApiLinks,
    ids: &DatasetIds,
    option: &DimensionOption,
) -> FixtureDoc {
    let code_list_url = links.code_list_url(&option.code_list_id);
    let root = doc! {
        "instance_id": ids.instance_id.as_str(),
        "name": option.name.as_str(),
        "option": option.option.as_str(),
        "label": option.label.as_str(),
        "node_id": "",
        "links": {
            "code": {
                "id": option.option.as_str(),
                "href": format!("{code_list_url}/codes/{}", option.option),
            },
            "code_list": { "id": option.code_list_id.as_str(), "href": code_list_url.as_str() },
        },
        "last_updated": FIXTURE_TIMESTAMP,
    };
    FixtureDoc::new(
        DATASETS_DATABASE,
        DIMENSION_OPTIONS_COLLECTION,
        FixtureKey::id(format!("{}_{}_{}", ids.instance_id, option.name, option.option)),
        FixtureUpdate::from_document(&root),
    )
}

/// Builds the seeded aggregate options for an instance.
#[must_use]
pub fn aggregate_dimension_options(links: &ApiLinks, ids: &DatasetIds) -> Vec<FixtureDoc> {
    AGGREGATE_OPTIONS
        .iter()
        .map(|(code, label)| {
            let option =
                DimensionOption::new(AGGREGATE_DIMENSION, code, label, AGGREGATE_CODE_LIST);
            dimension_option(links, ids, &option)
        })
        .collect()
}

/// Builds the seeded time options for an instance.
#[must_use]
pub fn time_dimension_options(links: &ApiLinks, ids: &DatasetIds) -> Vec<FixtureDoc> {
    TIME_OPTIONS
        .iter()
        .map(|(code, label)| {
            let option = DimensionOption::new(TIME_DIMENSION, code, label, TIME_CODE_LIST);
            dimension_option(links, ids, &option)
        })
        .collect()
}

/// Returns a filter matching every option stored for an instance.
#[must_use]
pub fn dimension_options_filter(instance_id: &str) -> Document {
    doc! { "instance_id": instance_id }
}
