// api-tests/src/fixtures/filter.rs
// ============================================================================
// Module: Filter Fixtures
// Description: Filter blueprint and filter output documents.
// Purpose: Seed the filter API's store against a seeded dataset version.
// Dependencies: mongodb (bson)
// ============================================================================

use mongodb::bson::Document;
use mongodb::bson::doc;

use super::AGGREGATE_DIMENSION;
use super::AGGREGATE_OPTIONS;
use super::ApiLinks;
use super::DatasetIds;
use super::FILTER_OUTPUTS_COLLECTION;
use super::FILTERS_COLLECTION;
use super::FILTERS_DATABASE;
use super::FIXTURE_TIMESTAMP;
use super::TIME_DIMENSION;
use super::TIME_OPTIONS;
use crate::docstore::FixtureDoc;
use crate::docstore::FixtureKey;
use crate::docstore::FixtureUpdate;

/// Builds the dimension selection shared by blueprints and outputs.
fn selected_dimensions(filter_url: &str) -> Vec<Document> {
    [(AGGREGATE_DIMENSION, &AGGREGATE_OPTIONS), (TIME_DIMENSION, &TIME_OPTIONS)]
        .into_iter()
        .map(|(name, options)| {
            let codes: Vec<&str> = options.iter().map(|(code, _)| *code).collect();
            doc! {
                "name": name,
                "options": codes,
                "dimension_url": format!("{filter_url}/dimensions/{name}"),
            }
        })
        .collect()
}

/// Builds the `dataset` reference stored on filter documents.
fn dataset_reference(ids: &DatasetIds) -> Document {
    doc! {
        "id": ids.dataset_id.as_str(),
        "edition": ids.edition.as_str(),
        "version": i64::from(ids.version),
    }
}

/// Builds a published filter blueprint keyed by `filter_id`.
#[must_use]
pub fn filter_blueprint(links: &ApiLinks, ids: &DatasetIds, filter_id: &str) -> FixtureDoc {
    let filter_url = links.filter_url(filter_id);
    let root = doc! {
        "instance_id": ids.instance_id.as_str(),
        "dataset": dataset_reference(ids),
        "dimensions": selected_dimensions(&filter_url),
        "published": true,
        "links": {
            "dimensions": { "href": format!("{filter_url}/dimensions") },
            "self": { "href": filter_url.as_str() },
            "version": { "id": ids.version.to_string(), "href": links.version_url(ids) },
        },
        "last_updated": FIXTURE_TIMESTAMP,
    };
    FixtureDoc::new(
        FILTERS_DATABASE,
        FILTERS_COLLECTION,
        FixtureKey::new("filter_id", filter_id),
        FixtureUpdate::from_document(&root),
    )
}

/// Builds a completed filter output keyed by `filter_id`.
///
/// Filter outputs are addressed by their own `filter_id`; the blueprint
/// they were produced from is linked under `links.filter_blueprint`.
#[must_use]
pub fn filter_output(
    links: &ApiLinks,
    ids: &DatasetIds,
    filter_output_id: &str,
    blueprint_id: &str,
) -> FixtureDoc {
    let output_url = links.filter_output_url(filter_output_id);
    let root = doc! {
        "instance_id": ids.instance_id.as_str(),
        "dataset": dataset_reference(ids),
        "dimensions": selected_dimensions(&links.filter_url(blueprint_id)),
        "state": "completed",
        "published": true,
        "downloads": {
            "csv": {
                "href": format!("{output_url}.csv"),
                "size": "12",
                "public": format!("https://s3-eu-west-1.amazonaws.com/csv-exported/{filter_output_id}.csv"),
            },
            "xls": {
                "href": format!("{output_url}.xlsx"),
                "size": "24",
                "public": format!("https://s3-eu-west-1.amazonaws.com/csv-exported/{filter_output_id}.xlsx"),
            },
        },
        "links": {
            "filter_blueprint": { "id": blueprint_id, "href": links.filter_url(blueprint_id) },
            "self": { "href": output_url.as_str() },
            "version": { "id": ids.version.to_string(), "href": links.version_url(ids) },
        },
        "last_updated": FIXTURE_TIMESTAMP,
    };
    FixtureDoc::new(
        FILTERS_DATABASE,
        FILTER_OUTPUTS_COLLECTION,
        FixtureKey::new("filter_id", filter_output_id),
        FixtureUpdate::from_document(&root),
    )
}
