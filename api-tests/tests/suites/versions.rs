// api-tests/tests/suites/versions.rs
// ============================================================================
// Module: Version Resource Tests
// Description: Reads and updates of `.../editions/{edition}/versions`.
// Purpose: Pin version visibility and the association update.
// Dependencies: dp-api-tests, serial_test
// ============================================================================

//! ## Overview
//! Versions are instances that reached edition-confirmed. Public callers
//! only see published versions; a publishing credential can move a version
//! into a collection by setting `state` and `collection_id`.

use dp_api_tests::config::ServiceApi;
use dp_api_tests::docstore::FixtureKey;
use dp_api_tests::docstore::FixtureSet;
use dp_api_tests::fixtures::DATASETS_DATABASE;
use dp_api_tests::fixtures::DatasetIds;
use dp_api_tests::fixtures::FIXTURE_COLLECTION_ID;
use dp_api_tests::fixtures::INSTANCES_COLLECTION;
use dp_api_tests::fixtures::ResourceState;
use dp_api_tests::fixtures::dataset;
use dp_api_tests::fixtures::edition;
use dp_api_tests::fixtures::instance;
use dp_api_tests::fixtures::published_dataset_tree;
use serde_json::json;
use serial_test::serial;

use crate::helpers::harness::ApiHarness;
use crate::helpers::harness::TestResult;
use crate::helpers::harness::outcome_after_teardown;

/// Returns the path of the version in `ids`.
fn version_path(ids: &DatasetIds) -> String {
    format!("/datasets/{}/editions/{}/versions/{}", ids.dataset_id, ids.edition, ids.version)
}

/// Dataset, edition and instance all awaiting association.
fn unpublished_version(harness: &ApiHarness, ids: &DatasetIds) -> FixtureSet {
    FixtureSet::new()
        .with(dataset(harness.links(), ids, ResourceState::Created))
        .with(edition(harness.links(), ids, ResourceState::EditionConfirmed))
        .with(instance(harness.links(), ids, ResourceState::EditionConfirmed))
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn published_version_is_public() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("published_version_is_public")?;
    let store = harness.document_store().await?;
    let api = harness.api(ServiceApi::Dataset).await?;
    let ids = DatasetIds::generate();
    let fixtures = published_dataset_tree(harness.links(), &ids);

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        let path = version_path(&ids);
        let listing = api
            .get(&format!("/datasets/{}/editions/{}/versions", ids.dataset_id, ids.edition))
            .await?;
        listing.expect_status(200)?.expect_array_len("/items", 1)?;
        listing.item_where("id", &ids.instance_id)?;

        api.get(&path)
            .await?
            .expect_status(200)?
            .expect_str("/id", &ids.instance_id)?
            .expect_str("/state", "published")?
            .expect_field("/version", 1)?
            .expect_matches("/downloads/csv/href", r"/versions/1\.csv$")?
            .expect_matches("/links/self/href", &format!("{path}$"))?
            .expect_str("/links/dataset/id", &ids.dataset_id)?;
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "published version is listed and readable")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn unknown_version_is_not_found() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("unknown_version_is_not_found")?;
    let store = harness.document_store().await?;
    let api = harness.api(ServiceApi::Dataset).await?;
    let ids = DatasetIds::generate();
    let fixtures = published_dataset_tree(harness.links(), &ids);

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        api.get(&version_path(&ids.next_version()))
            .await?
            .expect_status(404)?
            .expect_body_contains("version not found")?;
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "missing version number is not found")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn associating_version_updates_instance() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("associating_version_updates_instance")?;
    let store = harness.document_store().await?;
    let api =
        harness.api(ServiceApi::Dataset).await?.with_credential(harness.florence_credential());
    let ids = DatasetIds::generate();
    let fixtures = unpublished_version(&harness, &ids);

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        let update = json!({ "state": "associated", "collection_id": FIXTURE_COLLECTION_ID });
        api.put_json(&version_path(&ids), &update).await?.expect_status(200)?;
        let key = FixtureKey::new("id", ids.instance_id.as_str());
        let stored = store
            .find_one(DATASETS_DATABASE, INSTANCES_COLLECTION, &key)
            .await?
            .ok_or("version missing from the store after update")?;
        if stored.get_str("state")? != "associated" {
            return Err("version state was not moved to associated".into());
        }
        if stored.get_str("collection_id")? != FIXTURE_COLLECTION_ID {
            return Err("version collection_id was not stored".into());
        }
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "PUT associates the version with a collection")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn version_update_rejects_bad_requests() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("version_update_rejects_bad_requests")?;
    let store = harness.document_store().await?;
    let anonymous = harness.api(ServiceApi::Dataset).await?;
    let api = anonymous.clone().with_credential(harness.florence_credential());
    let ids = DatasetIds::generate();
    let fixtures = unpublished_version(&harness, &ids);

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        let path = version_path(&ids);
        anonymous.put_json(&path, &json!({ "state": "associated" })).await?.expect_status(401)?;
        api.put_raw(&path, "{\"state\": ")
            .await?
            .expect_status(400)?
            .expect_body_contains("failed to parse json body")?;
        api.put_json(&version_path(&ids.next_version()), &json!({ "state": "associated" }))
            .await?
            .expect_status(404)?
            .expect_body_contains("version not found")?;
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "version PUT refuses anonymous, malformed and unknown")?;
    outcome
}
