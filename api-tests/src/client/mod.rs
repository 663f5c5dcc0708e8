// api-tests/src/client/mod.rs
// ============================================================================
// Module: API Client
// Description: HTTP client, credentials and response assertions.
// Purpose: Give suites one way to call the services and check what returns.
// Dependencies: reqwest, regex
// ============================================================================

//! ## Overview
//! Suites build one [`ApiClient`] per service and credential combination,
//! share a [`Transcript`] across them, and assert on each [`ApiResponse`].

// ============================================================================
// SECTION: Modules
// ============================================================================

mod auth;
mod http;
mod response;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use auth::Credential;
pub use auth::FLORENCE_TOKEN_HEADER;
pub use auth::INTERNAL_TOKEN_HEADER;
pub use auth::SERVICE_AUTH_HEADER;
pub use http::ApiClient;
pub use http::ApiClientError;
pub use http::DEFAULT_REQUEST_TIMEOUT;
pub use http::RequestBody;
pub use http::Transcript;
pub use http::TranscriptEntry;
pub use response::ApiResponse;
pub use response::AssertionError;
pub use response::ITEMS_POINTER;
