// api-tests/src/fixtures/import.rs
// ============================================================================
// Module: Import Job Fixtures
// Description: Import job documents.
// Purpose: Seed the import API's store with a job linked to an instance.
// Dependencies: mongodb (bson)
// ============================================================================

use mongodb::bson::doc;

use super::ApiLinks;
use super::DatasetIds;
use super::FIXTURE_RECIPE_ID;
use super::FIXTURE_TIMESTAMP;
use super::IMPORTS_COLLECTION;
use super::IMPORTS_DATABASE;
use super::ResourceState;
use crate::docstore::FixtureDoc;
use crate::docstore::FixtureKey;
use crate::docstore::FixtureUpdate;

/// Alias the recipe expects for the uploaded V4 file.
pub const V4_FILE_ALIAS: &str = "v4";

/// Builds an import job keyed by `id`, linked to the instance in `ids`.
#[must_use]
pub fn import_job(links: &ApiLinks, ids: &DatasetIds, state: ResourceState) -> FixtureDoc {
    let root = doc! {
        "recipe": FIXTURE_RECIPE_ID,
        "state": state.as_str(),
        "files": [{
            "alias_name": V4_FILE_ALIAS,
            "url": format!("https://s3-eu-west-1.amazonaws.com/dp-publish-content-test/{}.csv", ids.job_id),
        }],
        "links": {
            "instances": [{
                "id": ids.instance_id.as_str(),
                "href": links.instance_url(ids),
            }],
            "self": { "href": links.job_url(&ids.job_id) },
        },
        "last_updated": FIXTURE_TIMESTAMP,
    };
    FixtureDoc::new(
        IMPORTS_DATABASE,
        IMPORTS_COLLECTION,
        FixtureKey::new("id", ids.job_id.as_str()),
        FixtureUpdate::from_document(&root),
    )
}
