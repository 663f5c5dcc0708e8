// api-tests/src/config/mod.rs
// ============================================================================
// Module: Acceptance Suite Configuration
// Description: Centralized configuration for the API acceptance suites.
// Purpose: Provide typed access to service URLs, store addresses, and tokens.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Suite configuration is read from environment variables and mapped into a
//! small typed structure for reuse across harness helpers. Every value has a
//! local default matching a developer deployment of the services.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::ApiTestConfig;
pub use env::ApiTestEnv;
pub use env::LogFormat;
pub use env::ServiceApi;
pub use env::read_env_strict;
pub use env::DEFAULT_CODE_LIST_API_URL;
pub use env::DEFAULT_DATASET_API_URL;
pub use env::DEFAULT_FILTER_API_URL;
pub use env::DEFAULT_FLORENCE_TOKEN;
pub use env::DEFAULT_HIERARCHY_API_URL;
pub use env::DEFAULT_IDENTITY_API_URL;
pub use env::DEFAULT_IMPORT_API_URL;
pub use env::DEFAULT_LOG_FILTER;
pub use env::DEFAULT_MONGO_ADDR;
pub use env::DEFAULT_NEO4J_ADDR;
pub use env::DEFAULT_NEO4J_PASSWORD;
pub use env::DEFAULT_NEO4J_USER;
pub use env::DEFAULT_SERVICE_AUTH_TOKEN;
