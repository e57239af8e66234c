//! Constants for OData metadata retrieval

/// EDMX namespace used by OData v4 documents
pub const EDMX_V4_NAMESPACE: &str = "http://docs.oasis-open.org/odata/ns/edmx";

/// EDMX namespace used by OData v2 (and v3) documents
pub const EDMX_V2_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2007/06/edmx";

/// Metadata resource appended to a service root
pub const METADATA_SUFFIX: &str = "$metadata";

/// Default request timeout; large services can return multi-megabyte documents
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default user agent for metadata requests
pub fn default_user_agent() -> String {
    format!("odata-metadata-sync/{}", env!("CARGO_PKG_VERSION"))
}

/// Standard headers for metadata requests
pub mod headers {
    /// Accept header for $metadata
    pub const ACCEPT_XML: &str = "application/xml";

    /// Highest OData protocol version we understand
    pub const ODATA_MAX_VERSION: &str = "4.0";
}

/// Environment variables consulted for Basic credentials, in priority order
pub mod env {
    pub const USER_VARS: [&str; 2] = ["ODATA_USER", "SAP_USER"];
    pub const PASSWORD_VARS: [&str; 2] = ["ODATA_PASSWORD", "SAP_PASS"];
}
