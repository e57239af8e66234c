pub mod api;
pub mod config;
pub mod error;
pub mod metadata;
pub mod sync;

pub use api::{Coordinates, Credentials, MetadataClient, MetadataFetch, RawDocument};
pub use error::MetadataError;
pub use metadata::{Fingerprint, NormalizedSchema, ODataVersion, detect_version, parse_metadata};
pub use sync::{
    MetadataSnapshot, RefreshAction, RefreshOutcome, RefreshTrigger, Refresher, ServiceDescriptor,
    analyze_bytes, analyze_document,
};
