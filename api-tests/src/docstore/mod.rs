// api-tests/src/docstore/mod.rs
// ============================================================================
// Module: Document Store Fixtures
// Description: Fixture documents and the store that seeds and clears them.
// Purpose: Give suites a single entry point for document-store preconditions.
// Dependencies: mongodb
// ============================================================================

//! ## Overview
//! Fixture documents are described as key-selected dotted-path upserts and
//! applied through [`DocumentStore`]. Teardown ignores already-missing
//! documents and surfaces every other failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod fixture;
mod store;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use fixture::FixtureDoc;
pub use fixture::FixtureKey;
pub use fixture::FixtureSet;
pub use fixture::FixtureUpdate;
pub use store::DocumentStore;
pub use store::DocumentStoreError;
pub use store::TeardownOutcome;
pub use store::mongo_uri;
