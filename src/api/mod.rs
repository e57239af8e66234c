//! OData metadata retrieval
//!
//! HTTP access to `$metadata` endpoints plus the structured logging used
//! around refreshes.

pub mod client;
pub mod constants;
pub mod logging;

pub use client::{
    Coordinates, Credentials, MetadataClient, MetadataFetch, RawDocument, build_metadata_url,
    metadata_url_from,
};
pub use logging::{MonitoringConfig, RefreshContext, RefreshLogger};
