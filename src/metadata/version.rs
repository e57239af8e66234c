//! EDMX dialect detection

use crate::api::constants::{EDMX_V2_NAMESPACE, EDMX_V4_NAMESPACE};
use log::debug;
use roxmltree::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OData protocol version a metadata document was written for.
///
/// `Unknown` is a normal result: detection is advisory and never blocks parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ODataVersion {
    V2,
    V3,
    V4,
    #[default]
    Unknown,
}

impl ODataVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ODataVersion::V2 => "v2",
            ODataVersion::V3 => "v3",
            ODataVersion::V4 => "v4",
            ODataVersion::Unknown => "unknown",
        }
    }

    /// Bucket a declared `Version` attribute ("4.0", "3.0", "1.0", ...) by major digit.
    pub fn from_declared(declared: &str) -> Self {
        match declared.trim().chars().next() {
            Some('4') => ODataVersion::V4,
            Some('3') => ODataVersion::V3,
            Some('2') => ODataVersion::V2,
            _ => ODataVersion::Unknown,
        }
    }
}

impl fmt::Display for ODataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw metadata document.
///
/// Namespace markers win over the declared version: the v4 namespace first,
/// then the v2 namespace. Only without either does the root's `Version`
/// attribute decide.
pub fn detect_version(raw: &str) -> ODataVersion {
    if raw.contains(EDMX_V4_NAMESPACE) {
        return ODataVersion::V4;
    }
    if raw.contains(EDMX_V2_NAMESPACE) {
        return ODataVersion::V2;
    }

    match declared_version(raw) {
        Some(version) => ODataVersion::from_declared(&version),
        None => {
            debug!("No EDMX namespace or Version attribute found, version unknown");
            ODataVersion::Unknown
        }
    }
}

/// `Version` attribute of an `Edmx` root element, any prefix, any case.
pub fn declared_version(raw: &str) -> Option<String> {
    let doc = Document::parse(raw).ok()?;
    let root = doc.root_element();

    if !root.tag_name().name().eq_ignore_ascii_case("edmx") {
        return None;
    }

    root.attributes()
        .find(|attr| attr.name() == "Version")
        .map(|attr| attr.value().to_string())
}

/// Whether `body` contains an element whose local name is `Edmx` (case-insensitive).
///
/// Cheap textual check used to reject HTML error pages served with a 200.
pub fn has_metadata_root(body: &str) -> bool {
    body.split('<').skip(1).any(|tag| {
        let name = tag
            .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .next()
            .unwrap_or("");
        let local = name.rsplit(':').next().unwrap_or(name);
        local.eq_ignore_ascii_case("edmx")
    })
}
