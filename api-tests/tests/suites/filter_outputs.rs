// api-tests/tests/suites/filter_outputs.rs
// ============================================================================
// Module: Filter Output Tests
// Description: Public reads of `/filter-outputs/{id}`.
// Purpose: Pin completed output rendering and the not-found answer.
// Dependencies: dp-api-tests, serial_test
// ============================================================================

use dp_api_tests::config::ServiceApi;
use dp_api_tests::fixtures::DatasetIds;
use dp_api_tests::fixtures::filter_blueprint;
use dp_api_tests::fixtures::filter_output;
use dp_api_tests::fixtures::published_dataset_tree;
use dp_api_tests::fixtures::unique_id;
use serial_test::serial;

use crate::helpers::harness::ApiHarness;
use crate::helpers::harness::TestResult;
use crate::helpers::harness::outcome_after_teardown;

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn completed_filter_output_is_readable() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("completed_filter_output_is_readable")?;
    let store = harness.document_store().await?;
    let api = harness.api(ServiceApi::Filter).await?;
    let ids = DatasetIds::generate();
    let blueprint_id = unique_id();
    let output_id = unique_id();
    let mut fixtures = published_dataset_tree(harness.links(), &ids);
    fixtures.push(filter_blueprint(harness.links(), &ids, &blueprint_id));
    fixtures.push(filter_output(harness.links(), &ids, &output_id, &blueprint_id));

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        let path = format!("/filter-outputs/{output_id}");
        api.get(&path)
            .await?
            .expect_status(200)?
            .expect_str("/filter_id", &output_id)?
            .expect_str("/state", "completed")?
            .expect_matches("/downloads/csv/href", &format!(r"{path}\.csv$"))?
            .expect_matches("/downloads/xls/href", &format!(r"{path}\.xlsx$"))?
            .expect_str("/links/filter_blueprint/id", &blueprint_id)?
            .expect_array_len("/dimensions", 2)?;
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "completed output exposes downloads and its blueprint")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn unknown_filter_output_is_not_found() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("unknown_filter_output_is_not_found")?;
    let api = harness.api(ServiceApi::Filter).await?;

    let outcome: TestResult = async {
        api.get(&format!("/filter-outputs/{}", unique_id()))
            .await?
            .expect_status(404)?
            .expect_body_contains("filter output not found")?;
        Ok(())
    }
    .await;

    reporter.conclude(&outcome, "unknown filter output answers 404")?;
    outcome
}
