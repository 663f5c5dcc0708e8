// api-tests/src/fixtures/dataset.rs
// ============================================================================
// Module: Dataset Fixtures
// Description: Dataset, edition and instance (version) documents.
// Purpose: Seed the dataset API's store in a chosen lifecycle state.
// Dependencies: mongodb (bson)
// ============================================================================

use mongodb::bson::Document;
use mongodb::bson::doc;

use super::ApiLinks;
use super::DATASETS_COLLECTION;
use super::DATASETS_DATABASE;
use super::DatasetIds;
use super::EDITIONS_COLLECTION;
use super::FIXTURE_COLLECTION_ID;
use super::FIXTURE_TIMESTAMP;
use super::INSTANCES_COLLECTION;
use super::ResourceState;
use super::dimension::AGGREGATE_CODE_LIST;
use super::dimension::AGGREGATE_DIMENSION;
use super::dimension::TIME_CODE_LIST;
use super::dimension::TIME_DIMENSION;
use super::dimension::aggregate_dimension_options;
use super::dimension::time_dimension_options;
use crate::docstore::FixtureDoc;
use crate::docstore::FixtureKey;
use crate::docstore::FixtureSet;
use crate::docstore::FixtureUpdate;

/// Builds a dataset document keyed by `_id`.
///
/// Published datasets carry identical `current` and `next` sub-documents;
/// every other state only has `next`.
#[must_use]
pub fn dataset(links: &ApiLinks, ids: &DatasetIds, state: ResourceState) -> FixtureDoc {
    let body = dataset_body(links, ids, state);
    let mut root = Document::new();
    if state == ResourceState::Published {
        root.insert("current", body.clone());
    }
    root.insert("next", body);
    FixtureDoc::new(
        DATASETS_DATABASE,
        DATASETS_COLLECTION,
        FixtureKey::id(ids.dataset_id.as_str()),
        FixtureUpdate::from_document(&root),
    )
}

/// Builds the `current`/`next` sub-document of a dataset.
fn dataset_body(links: &ApiLinks, ids: &DatasetIds, state: ResourceState) -> Document {
    let dataset_url = links.dataset_url(ids);
    let mut dataset_links = doc! {
        "editions": { "href": format!("{dataset_url}/editions") },
        "self": { "href": dataset_url.as_str() },
    };
    if state == ResourceState::Published {
        dataset_links.insert(
            "latest_version",
            doc! { "id": ids.version.to_string(), "href": links.version_url(ids) },
        );
    }
    let mut body = doc! {
        "id": ids.dataset_id.as_str(),
        "contacts": [{
            "email": "cpi@onstest.gov.uk",
            "name": "Automation Tester",
            "telephone": "+44 (0)1633 123456",
        }],
        "description": "Comprehensive database of time series covering measures of inflation data including CPIH, CPI and RPI.",
        "keywords": ["cpi", "inflation"],
        "license": "Open Government Licence v3.0",
        "methodologies": [{
            "description": "Consumer price inflation is the rate at which the prices of the goods and services bought by households rise or fall.",
            "href": "https://www.ons.gov.uk/economy/inflationandpriceindices/qmis/consumerpriceinflationqmi",
            "title": "Consumer price inflation",
        }],
        "national_statistic": true,
        "next_release": "17 October 2017",
        "publications": [{
            "description": "Price indices, percentage changes and weights for the different measures of consumer price inflation.",
            "href": "https://www.ons.gov.uk/economy/inflationandpriceindices/bulletins/consumerpriceinflation/aug2017",
            "title": "UK consumer price inflation: August 2017",
        }],
        "publisher": {
            "href": "https://www.ons.gov.uk",
            "name": "Automation Tester",
            "type": "publisher",
        },
        "qmi": {
            "description": "Consumer price inflation is the rate at which the prices of goods and services bought by households rise and fall",
            "href": "http://www.ons.gov.uk/aboutus/whatwedo/statistics/qualityandmethodology",
            "title": "Consumer Price Inflation (QMI)",
        },
        "release_frequency": "Monthly",
        "state": state.as_str(),
        "theme": "Goods and services",
        "title": "CPI",
        "uri": "https://www.ons.gov.uk/economy/inflationandpriceindices/datasets/consumerpriceinflation",
        "links": dataset_links,
        "last_updated": FIXTURE_TIMESTAMP,
    };
    if state.has_collection() {
        body.insert("collection_id", FIXTURE_COLLECTION_ID);
    }
    body
}

/// Builds an edition document keyed by `id`.
///
/// Published editions carry `current` and `next`; others only `next`.
#[must_use]
pub fn edition(links: &ApiLinks, ids: &DatasetIds, state: ResourceState) -> FixtureDoc {
    let edition_url = links.edition_url(ids);
    let body = doc! {
        "id": ids.edition_id.as_str(),
        "edition": ids.edition.as_str(),
        "state": state.as_str(),
        "links": {
            "dataset": { "id": ids.dataset_id.as_str(), "href": links.dataset_url(ids) },
            "latest_version": { "id": ids.version.to_string(), "href": links.version_url(ids) },
            "self": { "href": edition_url.as_str() },
            "versions": { "href": format!("{edition_url}/versions") },
        },
        "last_updated": FIXTURE_TIMESTAMP,
    };
    let mut root = Document::new();
    if state == ResourceState::Published {
        root.insert("current", body.clone());
    }
    root.insert("next", body);
    FixtureDoc::new(
        DATASETS_DATABASE,
        EDITIONS_COLLECTION,
        FixtureKey::new("id", ids.edition_id.as_str()),
        FixtureUpdate::from_document(&root),
    )
}

/// Builds an instance document keyed by `id`.
///
/// Edition, version and collection fields appear once the state reaches
/// edition-confirmed and associated respectively; downloads only once
/// published.
#[must_use]
pub fn instance(links: &ApiLinks, ids: &DatasetIds, state: ResourceState) -> FixtureDoc {
    let instance_url = links.instance_url(ids);
    let mut instance_links = doc! {
        "dataset": { "id": ids.dataset_id.as_str(), "href": links.dataset_url(ids) },
        "dimensions": { "href": format!("{instance_url}/dimensions") },
        "job": { "id": ids.job_id.as_str(), "href": links.job_url(&ids.job_id) },
        "self": { "href": instance_url.as_str() },
    };
    let mut root = doc! {
        "state": state.as_str(),
        "dimensions": [
            instance_dimension(
                links,
                AGGREGATE_DIMENSION,
                AGGREGATE_CODE_LIST,
                "Aggregate",
                "Special aggregate",
            ),
            instance_dimension(
                links,
                TIME_DIMENSION,
                TIME_CODE_LIST,
                "Time",
                "The time period the observation covers",
            ),
        ],
        "headers": [
            "v4_0",
            TIME_CODE_LIST,
            TIME_DIMENSION,
            AGGREGATE_CODE_LIST,
            AGGREGATE_DIMENSION,
        ],
        "latest_changes": [{
            "description": "change to the period frequency",
            "name": "Changes to the period frequency",
            "type": "Summary of Changes",
        }],
        "release_date": "2017-12-12",
        "temporal": [{
            "start_date": "2014-09-09",
            "end_date": "2017-09-09",
            "frequency": "monthly",
        }],
        "total_observations": 1_i64,
        "last_updated": FIXTURE_TIMESTAMP,
    };
    if state.has_version() {
        root.insert("edition", ids.edition.as_str());
        root.insert("version", i64::from(ids.version));
        instance_links.insert(
            "edition",
            doc! { "id": ids.edition.as_str(), "href": links.edition_url(ids) },
        );
        instance_links.insert(
            "version",
            doc! { "id": ids.version.to_string(), "href": links.version_url(ids) },
        );
    }
    if state.has_collection() {
        root.insert("collection_id", FIXTURE_COLLECTION_ID);
    }
    if state == ResourceState::Published {
        let version_url = links.version_url(ids);
        root.insert(
            "downloads",
            doc! {
                "csv": { "href": format!("{version_url}.csv"), "size": "10" },
                "xls": { "href": format!("{version_url}.xlsx"), "size": "24" },
            },
        );
    }
    root.insert("links", instance_links);
    FixtureDoc::new(
        DATASETS_DATABASE,
        INSTANCES_COLLECTION,
        FixtureKey::new("id", ids.instance_id.as_str()),
        FixtureUpdate::from_document(&root),
    )
}

/// Builds one entry of an instance's `dimensions` array.
fn instance_dimension(
    links: &ApiLinks,
    name: &str,
    code_list_id: &str,
    label: &str,
    description: &str,
) -> Document {
    let code_list_url = links.code_list_url(code_list_id);
    doc! {
        "name": name,
        "id": code_list_id,
        "label": label,
        "description": description,
        "href": code_list_url.as_str(),
        "links": { "code_list": { "id": code_list_id, "href": code_list_url.as_str() } },
    }
}

/// Builds a published dataset with its edition, version and dimension
/// options, in setup order.
#[must_use]
pub fn published_dataset_tree(links: &ApiLinks, ids: &DatasetIds) -> FixtureSet {
    let mut set = FixtureSet::new()
        .with(dataset(links, ids, ResourceState::Published))
        .with(edition(links, ids, ResourceState::Published))
        .with(instance(links, ids, ResourceState::Published));
    set.extend(aggregate_dimension_options(links, ids));
    set.extend(time_dimension_options(links, ids));
    set
}
