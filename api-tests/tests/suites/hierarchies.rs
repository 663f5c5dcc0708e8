// api-tests/tests/suites/hierarchies.rs
// ============================================================================
// Module: Hierarchy Resource Tests
// Description: Public walks of `/hierarchies/{instance}/{dimension}`.
// Purpose: Pin root, child and breadcrumb rendering of instance trees.
// Dependencies: dp-api-tests, serial_test
// ============================================================================

use dp_api_tests::config::ServiceApi;
use dp_api_tests::fixtures::AGGREGATE_DIMENSION;
use dp_api_tests::fixtures::DatasetIds;
use dp_api_tests::fixtures::cpih_instance_hierarchy;
use serde_json::Value;
use serial_test::serial;

use crate::helpers::harness::ApiHarness;
use crate::helpers::harness::TestResult;
use crate::helpers::harness::expect_json_str;
use crate::helpers::harness::outcome_after_teardown;

#[tokio::test(flavor = "multi_thread")]
#[serial(graphstore)]
async fn hierarchy_root_lists_children() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("hierarchy_root_lists_children")?;
    let store = harness.graph_store().await?;
    let api = harness.api(ServiceApi::Hierarchy).await?;
    let ids = DatasetIds::generate();
    let fixture = cpih_instance_hierarchy(&ids.instance_id)?;

    let outcome: TestResult = async {
        store.setup(&fixture).await?;
        let response = api
            .get(&format!("/hierarchies/{}/{AGGREGATE_DIMENSION}", ids.instance_id))
            .await?;
        response
            .expect_status(200)?
            .expect_str("/label", "CPIH (overall index)")?
            .expect_str("/links/code/id", "cpih1dim1A0")?
            .expect_array_len("/children", 2)?;
        let children = response.array("/children")?;
        let housing = children
            .iter()
            .find(|child| {
                child.pointer("/links/code/id").and_then(Value::as_str) == Some("cpih1dim1T40000")
            })
            .ok_or("housing group missing from root children")?;
        expect_json_str(housing, "/label", "04 Housing, water, electricity, gas and other fuels")?;
        if housing.pointer("/has_data").and_then(Value::as_bool) != Some(false) {
            return Err(format!("housing group should have no data: {housing}").into());
        }
        Ok(())
    }
    .await;

    let teardown = store.teardown(&fixture).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "root node renders its direct children")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(graphstore)]
async fn hierarchy_node_has_breadcrumbs() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("hierarchy_node_has_breadcrumbs")?;
    let store = harness.graph_store().await?;
    let api = harness.api(ServiceApi::Hierarchy).await?;
    let ids = DatasetIds::generate();
    let fixture = cpih_instance_hierarchy(&ids.instance_id)?;

    let outcome: TestResult = async {
        store.setup(&fixture).await?;
        let base = format!("/hierarchies/{}/{AGGREGATE_DIMENSION}", ids.instance_id);
        api.get(&format!("{base}/cpih1dim1G10100"))
            .await?
            .expect_status(200)?
            .expect_str("/label", "01.1 Food")?
            .expect_field("/has_data", true)?
            .expect_array_len("/breadcrumbs", 2)?
            .expect_str("/breadcrumbs/0/links/code/id", "cpih1dim1T10000")?
            .expect_str("/breadcrumbs/1/links/code/id", "cpih1dim1A0")?;
        api.get(&format!("{base}/cpih1dim1T40000"))
            .await?
            .expect_status(200)?
            .expect_field("/has_data", false)?
            .expect_array_len("/children", 1)?
            .expect_str("/children/0/label", "04.04.03 Sewerage collection")?;
        api.get(&format!("{base}/cpih1dim1X99999"))
            .await?
            .expect_status(404)?
            .expect_body_contains("hierarchy node not found")?;
        Ok(())
    }
    .await;

    let teardown = store.teardown(&fixture).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "nodes render breadcrumbs up to the root")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(graphstore)]
async fn hierarchy_for_unknown_instance_is_not_found() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("hierarchy_for_unknown_instance_is_not_found")?;
    let api = harness.api(ServiceApi::Hierarchy).await?;
    let ids = DatasetIds::generate();

    let outcome: TestResult = async {
        api.get(&format!("/hierarchies/{}/{AGGREGATE_DIMENSION}", ids.instance_id))
            .await?
            .expect_status(404)?
            .expect_body_contains("hierarchy node not found")?;
        Ok(())
    }
    .await;

    reporter.conclude(&outcome, "no tree means no hierarchy")?;
    outcome
}
