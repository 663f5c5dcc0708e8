// api-tests/src/client/auth.rs
// ============================================================================
// Module: Request Credentials
// Description: Auth headers understood by the services under test.
// Purpose: Attach, omit or corrupt credentials per client.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Each service authorises callers from one of three headers. A client
//! carries at most one credential per header; authorisation branches are
//! exercised by building clients with valid, invalid or missing values.

use reqwest::RequestBuilder;

/// Header carrying the legacy internal service token.
pub const INTERNAL_TOKEN_HEADER: &str = "Internal-Token";
/// Header carrying a publishing user's session token.
pub const FLORENCE_TOKEN_HEADER: &str = "X-Florence-Token";
/// Header carrying a service bearer token.
pub const SERVICE_AUTH_HEADER: &str = "Authorization";

/// Credential attached to every request of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Internal-Token: <token>`.
    InternalToken(String),
    /// `X-Florence-Token: <token>`.
    FlorenceToken(String),
    /// `Authorization: Bearer <token>`.
    ServiceAuth(String),
}

impl Credential {
    /// Returns the header name this credential is sent in.
    #[must_use]
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::InternalToken(_) => INTERNAL_TOKEN_HEADER,
            Self::FlorenceToken(_) => FLORENCE_TOKEN_HEADER,
            Self::ServiceAuth(_) => SERVICE_AUTH_HEADER,
        }
    }

    /// Returns the header value, including the `Bearer` scheme where needed.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::InternalToken(token) | Self::FlorenceToken(token) => token.clone(),
            Self::ServiceAuth(token) => format!("Bearer {token}"),
        }
    }

    /// Returns true when both credentials use the same header.
    #[must_use]
    pub fn same_header(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Adds the header to a request.
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(self.header_name(), self.header_value())
    }
}
