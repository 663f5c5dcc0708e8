// api-tests/src/fixtures/mod.rs
// ============================================================================
// Module: Fixture Builders
// Description: Builders for documents and graph nodes seeded before API calls.
// Purpose: Keep fixture shapes in one place, parameterised by IDs and URLs.
// Dependencies: mongodb (bson), uuid
// ============================================================================

//! ## Overview
//! Builders return [`FixtureDoc`](crate::docstore::FixtureDoc),
//! [`FixtureSet`](crate::docstore::FixtureSet) or
//! [`GraphFixture`](crate::graphstore::GraphFixture) values. Their shapes
//! follow what the services persist; the literal titles and labels inside
//! are example content only. Links embed the base URLs from [`ApiLinks`] so
//! responses can be compared against the configured deployment.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod codelist;
mod dataset;
mod dimension;
mod filter;
mod hierarchy;
mod import;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use uuid::Uuid;

use crate::config::ApiTestConfig;
use crate::config::ServiceApi;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use codelist::CODE_LIST_SEED_MARKER;
pub use codelist::CodeFixture;
pub use codelist::code_list;
pub use codelist::code_list_label;
pub use codelist::cpih_aggregate_code_list;
pub use codelist::seeded_code_list_id;
pub use codelist::time_code_list;
pub use dataset::dataset;
pub use dataset::edition;
pub use dataset::instance;
pub use dataset::published_dataset_tree;
pub use dimension::AGGREGATE_CODE_LIST;
pub use dimension::AGGREGATE_DIMENSION;
pub use dimension::AGGREGATE_OPTIONS;
pub use dimension::DimensionOption;
pub use dimension::TIME_CODE_LIST;
pub use dimension::TIME_DIMENSION;
pub use dimension::TIME_OPTIONS;
pub use dimension::aggregate_dimension_options;
pub use dimension::dimension_option;
pub use dimension::dimension_options_filter;
pub use dimension::time_dimension_options;
pub use filter::filter_blueprint;
pub use filter::filter_output;
pub use hierarchy::HierarchyNode;
pub use hierarchy::HierarchyScope;
pub use hierarchy::cpih_hierarchy_nodes;
pub use hierarchy::cpih_instance_hierarchy;
pub use hierarchy::hierarchy;
pub use import::V4_FILE_ALIAS;
pub use import::import_job;

// ============================================================================
// SECTION: Store Layout
// ============================================================================

/// Database holding datasets, editions, instances and dimension options.
pub const DATASETS_DATABASE: &str = "datasets";
/// Dataset documents.
pub const DATASETS_COLLECTION: &str = "datasets";
/// Edition documents.
pub const EDITIONS_COLLECTION: &str = "editions";
/// Instance (version) documents.
pub const INSTANCES_COLLECTION: &str = "instances";
/// Dimension option documents.
pub const DIMENSION_OPTIONS_COLLECTION: &str = "dimension.options";
/// Database holding filter blueprints and outputs.
pub const FILTERS_DATABASE: &str = "filters";
/// Filter blueprint documents.
pub const FILTERS_COLLECTION: &str = "filters";
/// Filter output documents.
pub const FILTER_OUTPUTS_COLLECTION: &str = "filterOutputs";
/// Database holding import jobs.
pub const IMPORTS_DATABASE: &str = "imports";
/// Import job documents.
pub const IMPORTS_COLLECTION: &str = "imports";

/// Fixed `last_updated` stamp for seeded documents.
pub const FIXTURE_TIMESTAMP: &str = "2017-08-25T15:09:11.829+01:00";
/// Publishing collection that associated and published resources belong to.
pub const FIXTURE_COLLECTION_ID: &str = "308064B3-A808-449B-9041-EA3A2F72CFAC";
/// Recipe referenced by import jobs.
pub const FIXTURE_RECIPE_ID: &str = "b944be78-f56d-409b-9ebd-ab2b77ffe187";

// ============================================================================
// SECTION: Shared Types
// ============================================================================

/// Lifecycle states stored on datasets, editions and instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceState {
    /// Created by an import job.
    Created,
    /// Import submitted.
    Submitted,
    /// Observations imported.
    Completed,
    /// Edition and version numbers assigned.
    EditionConfirmed,
    /// Attached to a publishing collection.
    Associated,
    /// Public.
    Published,
}

impl ResourceState {
    /// Returns the stored state string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
            Self::EditionConfirmed => "edition-confirmed",
            Self::Associated => "associated",
            Self::Published => "published",
        }
    }

    /// Returns true once the resource has edition and version numbers.
    #[must_use]
    pub fn has_version(self) -> bool {
        self >= Self::EditionConfirmed
    }

    /// Returns true once the resource belongs to a publishing collection.
    #[must_use]
    pub fn has_collection(self) -> bool {
        self >= Self::Associated
    }
}

/// Base URLs embedded in fixture links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiLinks {
    /// Dataset API base URL.
    pub dataset_api: String,
    /// Filter API base URL.
    pub filter_api: String,
    /// Import API base URL.
    pub import_api: String,
    /// Code-list API base URL.
    pub code_list_api: String,
}

impl ApiLinks {
    /// Builds links from the suite configuration.
    #[must_use]
    pub fn from_config(config: &ApiTestConfig) -> Self {
        Self {
            dataset_api: config.api_url(ServiceApi::Dataset).to_string(),
            filter_api: config.api_url(ServiceApi::Filter).to_string(),
            import_api: config.api_url(ServiceApi::Import).to_string(),
            code_list_api: config.api_url(ServiceApi::CodeList).to_string(),
        }
    }

    /// Returns `{dataset_api}/datasets/{id}`.
    #[must_use]
    pub fn dataset_url(&self, ids: &DatasetIds) -> String {
        format!("{}/datasets/{}", self.dataset_api, ids.dataset_id)
    }

    /// Returns the edition URL.
    #[must_use]
    pub fn edition_url(&self, ids: &DatasetIds) -> String {
        format!("{}/editions/{}", self.dataset_url(ids), ids.edition)
    }

    /// Returns the version URL.
    #[must_use]
    pub fn version_url(&self, ids: &DatasetIds) -> String {
        format!("{}/versions/{}", self.edition_url(ids), ids.version)
    }

    /// Returns `{dataset_api}/instances/{id}`.
    #[must_use]
    pub fn instance_url(&self, ids: &DatasetIds) -> String {
        format!("{}/instances/{}", self.dataset_api, ids.instance_id)
    }

    /// Returns `{import_api}/jobs/{id}`.
    #[must_use]
    pub fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{job_id}", self.import_api)
    }

    /// Returns `{code_list_api}/code-lists/{id}`.
    #[must_use]
    pub fn code_list_url(&self, code_list_id: &str) -> String {
        format!("{}/code-lists/{code_list_id}", self.code_list_api)
    }

    /// Returns `{filter_api}/filters/{id}`.
    #[must_use]
    pub fn filter_url(&self, filter_id: &str) -> String {
        format!("{}/filters/{filter_id}", self.filter_api)
    }

    /// Returns `{filter_api}/filter-outputs/{id}`.
    #[must_use]
    pub fn filter_output_url(&self, filter_output_id: &str) -> String {
        format!("{}/filter-outputs/{filter_output_id}", self.filter_api)
    }
}

/// Identifiers tying a dataset, edition, instance and import job together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIds {
    /// Dataset identifier.
    pub dataset_id: String,
    /// Edition document identifier.
    pub edition_id: String,
    /// Edition name, e.g. `2017`.
    pub edition: String,
    /// Instance identifier.
    pub instance_id: String,
    /// Version number within the edition.
    pub version: u32,
    /// Import job that created the instance.
    pub job_id: String,
}

impl DatasetIds {
    /// Generates fresh identifiers for edition `2017`, version 1.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            dataset_id: unique_id(),
            edition_id: unique_id(),
            edition: "2017".to_string(),
            instance_id: unique_id(),
            version: 1,
            job_id: unique_id(),
        }
    }

    /// Returns a sibling instance in the same edition at another version.
    #[must_use]
    pub fn next_version(&self) -> Self {
        Self {
            instance_id: unique_id(),
            version: self.version.saturating_add(1),
            job_id: unique_id(),
            ..self.clone()
        }
    }
}

/// Returns a random UUID v4 string.
#[must_use]
pub fn unique_id() -> String {
    Uuid::new_v4().to_string()
}
