// api-tests/tests/suites/fixture_stores.rs
// ============================================================================
// Module: Fixture Store Tests
// Description: Checks of the harness itself, live stores included.
// Purpose: Prove the harness seeds, clears and reports what it claims before
//          the API suites rely on it.
// Dependencies: dp-api-tests, serde_json, serial_test, tempfile
// ============================================================================

use dp_api_tests::client::Transcript;
use dp_api_tests::docstore::FixtureDoc;
use dp_api_tests::docstore::FixtureKey;
use dp_api_tests::docstore::FixtureSet;
use dp_api_tests::docstore::FixtureUpdate;
use dp_api_tests::docstore::TeardownOutcome;
use dp_api_tests::fixtures::AGGREGATE_DIMENSION;
use dp_api_tests::fixtures::AGGREGATE_OPTIONS;
use dp_api_tests::fixtures::DATASETS_COLLECTION;
use dp_api_tests::fixtures::DATASETS_DATABASE;
use dp_api_tests::fixtures::DIMENSION_OPTIONS_COLLECTION;
use dp_api_tests::fixtures::DatasetIds;
use dp_api_tests::fixtures::HierarchyScope;
use dp_api_tests::fixtures::ResourceState;
use dp_api_tests::fixtures::TIME_OPTIONS;
use dp_api_tests::fixtures::cpih_hierarchy_nodes;
use dp_api_tests::fixtures::cpih_instance_hierarchy;
use dp_api_tests::fixtures::dataset;
use dp_api_tests::fixtures::dimension_options_filter;
use dp_api_tests::fixtures::published_dataset_tree;
use dp_api_tests::fixtures::unique_id;
use mongodb::bson::Document;
use serde_json::Value;
use serde_json::json;
use serial_test::serial;

use crate::helpers::artifacts::TRANSCRIPT_FILE;
use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::ApiHarness;
use crate::helpers::harness::TestResult;
use crate::helpers::harness::outcome_after_teardown;

#[test]
fn teardown_errors_never_hide_the_test_failure() -> TestResult {
    let passed = outcome_after_teardown(Ok(()), Ok::<u64, String>(3));
    if passed.is_err() {
        return Err("clean teardown turned a pass into a failure".into());
    }

    let Err(teardown_only) = outcome_after_teardown(Ok(()), Err::<(), &str>("store closed")) else {
        return Err("teardown failure was swallowed".into());
    };
    if teardown_only.to_string() != "store closed" {
        return Err(format!("teardown-only error reads `{teardown_only}`").into());
    }

    let failed: TestResult = Err("expected status 201, got 403".into());
    let Err(both) = outcome_after_teardown(failed, Err::<(), &str>("store closed")) else {
        return Err("combined failure was swallowed".into());
    };
    if both.to_string() != "expected status 201, got 403; teardown also failed: store closed" {
        return Err(format!("combined error reads `{both}`").into());
    }

    let failed: TestResult = Err("expected status 201, got 403".into());
    let Err(kept) = outcome_after_teardown(failed, Ok::<(), String>(())) else {
        return Err("test failure was swallowed".into());
    };
    if kept.to_string() != "expected status 201, got 403" {
        return Err(format!("test failure reads `{kept}`").into());
    }
    Ok(())
}

#[test]
fn reporter_records_failure_and_transcript() -> TestResult {
    let run_root = tempfile::tempdir()?;
    let mut reporter = TestReporter::new("reporter_summary", Some(run_root.path()))?
        .with_transcript(Transcript::new());
    let outcome: TestResult = Err("expected status 200, got 404".into());
    reporter.conclude(&outcome, "summary keeps the failure message")?;

    let dir = run_root.path().join("reporter_summary");
    let summary: Value = serde_json::from_slice(&std::fs::read(dir.join("summary.json"))?)?;
    if summary["status"] != "fail" || summary["requests"] != 0 {
        return Err(format!("unexpected summary {summary}").into());
    }
    let notes = json!(["summary keeps the failure message", "expected status 200, got 404"]);
    if summary["notes"] != notes {
        return Err(format!("unexpected notes {}", summary["notes"]).into());
    }
    let transcript: Value = serde_json::from_slice(&std::fs::read(dir.join(TRANSCRIPT_FILE))?)?;
    if transcript != json!([]) {
        return Err(format!("unexpected transcript {transcript}").into());
    }
    let markdown = std::fs::read_to_string(dir.join("summary.md"))?;
    if !markdown.starts_with("# reporter_summary: fail\n") {
        return Err(format!("unexpected markdown {markdown}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn upsert_then_read_nested_fields() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("upsert_then_read_nested_fields")?;
    let store = harness.document_store().await?;
    let ids = DatasetIds::generate();
    let created = dataset(harness.links(), &ids, ResourceState::Created);
    let fixtures = FixtureSet::new().with(created.clone());

    let outcome: TestResult = async {
        store.setup(&created).await?;
        store.setup(&created.clone().with("next.title", "Reseeded")).await?;
        let stored = store
            .find_one(DATASETS_DATABASE, DATASETS_COLLECTION, &created.key)
            .await?
            .ok_or("seeded dataset missing")?;
        let next = stored.get_document("next")?;
        if next.get_str("title")? != "Reseeded" {
            return Err("second upsert did not overwrite next.title".into());
        }
        if next.get_str("state")? != "created" {
            return Err("second upsert dropped sibling fields".into());
        }
        let self_href = next.get_document("links")?.get_document("self")?.get_str("href")?;
        if self_href != harness.links().dataset_url(&ids) {
            return Err(format!("stored self link is {self_href}").into());
        }
        let copies =
            store.count(DATASETS_DATABASE, DATASETS_COLLECTION, created.key.filter()).await?;
        if copies != 1 {
            return Err(format!("upsert produced {copies} documents").into());
        }
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "upserts merge dotted paths into one document")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn teardown_is_idempotent() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("teardown_is_idempotent")?;
    let store = harness.document_store().await?;
    let ids = DatasetIds::generate();
    let fixtures = published_dataset_tree(harness.links(), &ids);

    let outcome: TestResult = async {
        store.setup_many(&fixtures).await?;
        let options_filter = dimension_options_filter(&ids.instance_id);
        let seeded_options = store
            .find_all(DATASETS_DATABASE, DIMENSION_OPTIONS_COLLECTION, options_filter.clone())
            .await?;
        if seeded_options.len() != AGGREGATE_OPTIONS.len() + TIME_OPTIONS.len() {
            return Err(format!("seeded {} dimension options", seeded_options.len()).into());
        }
        let removed = store.teardown_many(&fixtures).await?;
        if removed != u64::try_from(fixtures.len())? {
            return Err(format!("removed {removed} of {} documents", fixtures.len()).into());
        }
        if store.teardown_many(&fixtures).await? != 0 {
            return Err("second teardown removed documents".into());
        }
        let left =
            store.count(DATASETS_DATABASE, DIMENSION_OPTIONS_COLLECTION, options_filter).await?;
        if left != 0 {
            return Err(format!("{left} dimension option(s) survived teardown").into());
        }
        let missing = dataset(harness.links(), &DatasetIds::generate(), ResourceState::Created);
        if store.teardown(&missing).await? != TeardownOutcome::Absent {
            return Err("teardown of a missing document was not Absent".into());
        }
        let stray = FixtureKey::id(unique_id());
        let cleared =
            store.teardown_where(DATASETS_DATABASE, DATASETS_COLLECTION, stray.filter()).await?;
        if cleared != TeardownOutcome::Absent {
            return Err("teardown_where on no match was not Absent".into());
        }
        Ok(())
    }
    .await;

    let teardown = store.teardown_many(&fixtures).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "teardown counts and tolerates absent documents")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(docstore)]
async fn drop_database_clears_scratch_data() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("drop_database_clears_scratch_data")?;
    let store = harness.document_store().await?;
    let scratch = format!("dp_api_tests_{}", unique_id().replace('-', ""));
    let doc = FixtureDoc::new(
        scratch.as_str(),
        "scratch",
        FixtureKey::id(unique_id()),
        FixtureUpdate::new().set("state", "created"),
    );

    let outcome: TestResult = async {
        store.setup(&doc).await?;
        if store.count(&scratch, "scratch", doc.key.filter()).await? != 1 {
            return Err("scratch document was not seeded".into());
        }
        store.drop_database(&scratch).await?;
        if store.count(&scratch, "scratch", Document::new()).await? != 0 {
            return Err("dropped database still holds documents".into());
        }
        store.drop_database(&scratch).await?;
        Ok(())
    }
    .await;

    let teardown = store.drop_database(&scratch).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "dropping a database removes it and tolerates repeats")?;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
#[serial(graphstore)]
async fn graph_fixture_setup_and_teardown() -> TestResult {
    let harness = ApiHarness::new()?;
    let mut reporter = harness.reporter("graph_fixture_setup_and_teardown")?;
    let store = harness.graph_store().await?;
    let ids = DatasetIds::generate();
    let fixture = cpih_instance_hierarchy(&ids.instance_id)?;
    let label = HierarchyScope::Instance {
        instance_id: ids.instance_id.clone(),
        dimension: AGGREGATE_DIMENSION.to_string(),
    }
    .label();

    let outcome: TestResult = async {
        store.setup(&fixture).await?;
        let seeded = store.count_nodes(&label).await?;
        let expected = i64::try_from(cpih_hierarchy_nodes().len())?;
        if seeded != expected {
            return Err(format!("seeded {seeded} of {expected} hierarchy nodes").into());
        }
        store.teardown(&fixture).await?;
        let remaining = store.count_nodes(&label).await?;
        if remaining != 0 {
            return Err(format!("{remaining} hierarchy node(s) left after teardown").into());
        }
        store.teardown(&fixture).await?;
        Ok(())
    }
    .await;

    let teardown = store.teardown(&fixture).await;
    let outcome = outcome_after_teardown(outcome, teardown);
    reporter.conclude(&outcome, "graph fixtures create and remove exactly their nodes")?;
    outcome
}
