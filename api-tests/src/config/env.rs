// api-tests/src/config/env.rs
// ============================================================================
// Module: Acceptance Suite Environment
// Description: Environment-backed configuration for the acceptance suites.
// Purpose: Centralize env parsing with strict UTF-8 validation and defaults.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed. Unset values
//! fall back to the documented local defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default dataset API base URL.
pub const DEFAULT_DATASET_API_URL: &str = "http://localhost:22000";
/// Default filter API base URL.
pub const DEFAULT_FILTER_API_URL: &str = "http://localhost:22100";
/// Default import API base URL.
pub const DEFAULT_IMPORT_API_URL: &str = "http://localhost:21800";
/// Default hierarchy API base URL.
pub const DEFAULT_HIERARCHY_API_URL: &str = "http://localhost:22600";
/// Default code-list API base URL.
pub const DEFAULT_CODE_LIST_API_URL: &str = "http://localhost:22400";
/// Default identity API base URL.
pub const DEFAULT_IDENTITY_API_URL: &str = "http://localhost:25600";
/// Default document store address.
pub const DEFAULT_MONGO_ADDR: &str = "localhost:27017";
/// Default graph store Bolt address.
pub const DEFAULT_NEO4J_ADDR: &str = "bolt://localhost:7687";
/// Default graph store user.
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
/// Default graph store password.
pub const DEFAULT_NEO4J_PASSWORD: &str = "neo4j";
/// Default service token shared with the local service deployments.
pub const DEFAULT_SERVICE_AUTH_TOKEN: &str = "FD0108EA-825D-411C-9B1D-41EF7727F465";
/// Default publisher (florence) token.
pub const DEFAULT_FLORENCE_TOKEN: &str = "85c718c3-9ba1-4a29-8b2b-3dd4e2d6f4e7";
/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for acceptance suite configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTestEnv {
    /// Dataset API base URL.
    DatasetApiUrl,
    /// Filter API base URL.
    FilterApiUrl,
    /// Import API base URL.
    ImportApiUrl,
    /// Hierarchy API base URL.
    HierarchyApiUrl,
    /// Code-list API base URL.
    CodeListApiUrl,
    /// Identity API base URL.
    IdentityApiUrl,
    /// Document store address (`host:port` or `mongodb://` URI).
    MongoAddr,
    /// Graph store Bolt address.
    Neo4jAddr,
    /// Graph store user.
    Neo4jUser,
    /// Graph store password.
    Neo4jPassword,
    /// Service token sent as `Internal-Token` or `Authorization: Bearer`.
    ServiceAuthToken,
    /// Publisher token sent as `X-Florence-Token`.
    FlorenceToken,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional artifact run root override.
    RunRoot,
    /// Optional `tracing` filter directive.
    LogFilter,
    /// Optional log format (`text` or `json`).
    LogFormat,
}

impl ApiTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DatasetApiUrl => "DATASET_API_URL",
            Self::FilterApiUrl => "FILTER_API_URL",
            Self::ImportApiUrl => "IMPORT_API_URL",
            Self::HierarchyApiUrl => "HIERARCHY_API_URL",
            Self::CodeListApiUrl => "CODE_LIST_API_URL",
            Self::IdentityApiUrl => "IDENTITY_API_URL",
            Self::MongoAddr => "MONGODB_BIND_ADDR",
            Self::Neo4jAddr => "NEO4J_BIND_ADDR",
            Self::Neo4jUser => "NEO4J_USER",
            Self::Neo4jPassword => "NEO4J_PASSWORD",
            Self::ServiceAuthToken => "SERVICE_AUTH_TOKEN",
            Self::FlorenceToken => "FLORENCE_TOKEN",
            Self::TimeoutSeconds => "DP_API_TESTS_TIMEOUT_SEC",
            Self::RunRoot => "DP_API_TESTS_RUN_ROOT",
            Self::LogFilter => "DP_API_TESTS_LOG",
            Self::LogFormat => "DP_API_TESTS_LOG_FORMAT",
        }
    }

    /// Returns every key, in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 16] {
        [
            Self::DatasetApiUrl,
            Self::FilterApiUrl,
            Self::ImportApiUrl,
            Self::HierarchyApiUrl,
            Self::CodeListApiUrl,
            Self::IdentityApiUrl,
            Self::MongoAddr,
            Self::Neo4jAddr,
            Self::Neo4jUser,
            Self::Neo4jPassword,
            Self::ServiceAuthToken,
            Self::FlorenceToken,
            Self::TimeoutSeconds,
            Self::RunRoot,
            Self::LogFilter,
            Self::LogFormat,
        ]
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// APIs exercised by the acceptance suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceApi {
    /// Dataset API (datasets, editions, versions, instances).
    Dataset,
    /// Filter API (filter blueprints and outputs).
    Filter,
    /// Import API (import jobs).
    Import,
    /// Hierarchy API (dimension hierarchies).
    Hierarchy,
    /// Code-list API (code lists and codes).
    CodeList,
    /// Identity API (tokens).
    Identity,
}

impl ServiceApi {
    /// Returns a stable label used in logs and artifacts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dataset => "dataset-api",
            Self::Filter => "filter-api",
            Self::Import => "import-api",
            Self::Hierarchy => "hierarchy-api",
            Self::CodeList => "code-list-api",
            Self::Identity => "identity-api",
        }
    }
}

/// Output format for test logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Typed acceptance suite configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTestConfig {
    /// Dataset API base URL without a trailing slash.
    pub dataset_api_url: String,
    /// Filter API base URL without a trailing slash.
    pub filter_api_url: String,
    /// Import API base URL without a trailing slash.
    pub import_api_url: String,
    /// Hierarchy API base URL without a trailing slash.
    pub hierarchy_api_url: String,
    /// Code-list API base URL without a trailing slash.
    pub code_list_api_url: String,
    /// Identity API base URL without a trailing slash.
    pub identity_api_url: String,
    /// Document store address.
    pub mongo_addr: String,
    /// Graph store Bolt address.
    pub neo4j_addr: String,
    /// Graph store user.
    pub neo4j_user: String,
    /// Graph store password.
    pub neo4j_password: String,
    /// Service token.
    pub service_auth_token: String,
    /// Publisher token.
    pub florence_token: String,
    /// Optional timeout override.
    pub timeout: Option<Duration>,
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ApiTestConfig {
    fn default() -> Self {
        Self {
            dataset_api_url: DEFAULT_DATASET_API_URL.to_string(),
            filter_api_url: DEFAULT_FILTER_API_URL.to_string(),
            import_api_url: DEFAULT_IMPORT_API_URL.to_string(),
            hierarchy_api_url: DEFAULT_HIERARCHY_API_URL.to_string(),
            code_list_api_url: DEFAULT_CODE_LIST_API_URL.to_string(),
            identity_api_url: DEFAULT_IDENTITY_API_URL.to_string(),
            mongo_addr: DEFAULT_MONGO_ADDR.to_string(),
            neo4j_addr: DEFAULT_NEO4J_ADDR.to_string(),
            neo4j_user: DEFAULT_NEO4J_USER.to_string(),
            neo4j_password: DEFAULT_NEO4J_PASSWORD.to_string(),
            service_auth_token: DEFAULT_SERVICE_AUTH_TOKEN.to_string(),
            florence_token: DEFAULT_FLORENCE_TOKEN.to_string(),
            timeout: None,
            run_root: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ApiTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, a malformed URL or timeout).
    pub fn load() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            dataset_api_url: http_url_or(ApiTestEnv::DatasetApiUrl, defaults.dataset_api_url)?,
            filter_api_url: http_url_or(ApiTestEnv::FilterApiUrl, defaults.filter_api_url)?,
            import_api_url: http_url_or(ApiTestEnv::ImportApiUrl, defaults.import_api_url)?,
            hierarchy_api_url: http_url_or(
                ApiTestEnv::HierarchyApiUrl,
                defaults.hierarchy_api_url,
            )?,
            code_list_api_url: http_url_or(
                ApiTestEnv::CodeListApiUrl,
                defaults.code_list_api_url,
            )?,
            identity_api_url: http_url_or(ApiTestEnv::IdentityApiUrl, defaults.identity_api_url)?,
            mongo_addr: value_or(ApiTestEnv::MongoAddr, defaults.mongo_addr)?,
            neo4j_addr: bolt_url_or(ApiTestEnv::Neo4jAddr, defaults.neo4j_addr)?,
            neo4j_user: value_or(ApiTestEnv::Neo4jUser, defaults.neo4j_user)?,
            neo4j_password: value_or(ApiTestEnv::Neo4jPassword, defaults.neo4j_password)?,
            service_auth_token: value_or(
                ApiTestEnv::ServiceAuthToken,
                defaults.service_auth_token,
            )?,
            florence_token: value_or(ApiTestEnv::FlorenceToken, defaults.florence_token)?,
            timeout: read_env_nonempty(ApiTestEnv::TimeoutSeconds.as_str())?
                .map(|value| parse_timeout_seconds(ApiTestEnv::TimeoutSeconds.as_str(), &value))
                .transpose()?,
            run_root: read_env_nonempty(ApiTestEnv::RunRoot.as_str())?.map(PathBuf::from),
            log_filter: value_or(ApiTestEnv::LogFilter, defaults.log_filter)?,
            log_format: read_env_nonempty(ApiTestEnv::LogFormat.as_str())?
                .map(|value| parse_log_format(ApiTestEnv::LogFormat.as_str(), &value))
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Returns the base URL for the given API.
    #[must_use]
    pub fn api_url(&self, api: ServiceApi) -> &str {
        match api {
            ServiceApi::Dataset => &self.dataset_api_url,
            ServiceApi::Filter => &self.filter_api_url,
            ServiceApi::Import => &self.import_api_url,
            ServiceApi::Hierarchy => &self.hierarchy_api_url,
            ServiceApi::CodeList => &self.code_list_api_url,
            ServiceApi::Identity => &self.identity_api_url,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Reads a non-empty value or falls back to the default.
fn value_or(key: ApiTestEnv, default: String) -> Result<String, String> {
    Ok(read_env_nonempty(key.as_str())?.unwrap_or(default))
}

/// Reads an HTTP(S) base URL or falls back to the default.
fn http_url_or(key: ApiTestEnv, default: String) -> Result<String, String> {
    let raw = value_or(key, default)?;
    normalize_base_url(key.as_str(), &raw, &["http", "https"])
}

/// Reads a Bolt URL or falls back to the default.
fn bolt_url_or(key: ApiTestEnv, default: String) -> Result<String, String> {
    let raw = value_or(key, default)?;
    normalize_base_url(key.as_str(), &raw, &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s"])
}

/// Validates a base URL scheme and strips trailing slashes.
///
/// # Errors
///
/// Returns an error when the URL does not parse or uses another scheme.
pub(crate) fn normalize_base_url(
    name: &str,
    raw: &str,
    schemes: &[&str],
) -> Result<String, String> {
    let parsed = Url::parse(raw).map_err(|err| format!("{name} must be a valid URL: {err}"))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(format!("{name} must use one of the schemes: {}", schemes.join(", ")));
    }
    if parsed.host_str().is_none() {
        return Err(format!("{name} must include a host"));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} must be a positive integer number of seconds"));
    }
    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses the log format selector.
fn parse_log_format(name: &str, raw: &str) -> Result<LogFormat, String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("text") {
        return Ok(LogFormat::Text);
    }
    if trimmed.eq_ignore_ascii_case("json") {
        return Ok(LogFormat::Json);
    }
    Err(format!("{name} must be text or json"))
}
