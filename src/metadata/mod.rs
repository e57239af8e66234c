//! Metadata parsing, version detection and fingerprinting

pub mod fingerprint;
pub mod models;
pub mod parser;
pub mod version;

pub use fingerprint::{Fingerprint, fingerprint_bytes, fingerprint_document, fingerprint_schema};
pub use models::{
    Association, AssociationEnd, ComplexType, EntitySet, EntityType, Field, NavigationProperty,
    NormalizedSchema, Operation, Parameter, Property, ReferentialConstraint,
};
pub use parser::parse_metadata;
pub use version::{ODataVersion, declared_version, detect_version, has_metadata_root};
