//! Refresh orchestration for service descriptors
//!
//! The persistence layer owns `ServiceDescriptor` records and calls
//! [`Refresher::refresh`] on create, update and read events. The refresher
//! decides whether to fetch, re-derive from the stored document or do
//! nothing, and hands back an updated copy. It never writes anything itself.
//!
//! There is no single-flight protection: two concurrent refreshes of the same
//! descriptor issue two requests. Callers serialize refreshes per record.

use crate::api::client::{Coordinates, MetadataFetch};
use crate::api::logging::RefreshLogger;
use crate::error::MetadataError;
use crate::metadata::{
    Fingerprint, NormalizedSchema, ODataVersion, detect_version, fingerprint_bytes, parse_metadata,
};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered OData service as stored by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    /// Pre-resolved service root or `$metadata` URL
    #[serde(default)]
    pub service_url: Option<String>,
    /// Raw EDMX document
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub schema: Option<NormalizedSchema>,
    #[serde(default)]
    pub version: Option<ODataVersion>,
    #[serde(default)]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default)]
    pub last_refreshed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ServiceDescriptor {
    pub fn from_coordinates(base_url: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            service_name: Some(service_name.into()),
            ..Self::default()
        }
    }

    pub fn from_document(metadata: impl Into<String>) -> Self {
        Self {
            metadata: Some(metadata.into()),
            ..Self::default()
        }
    }

    /// Connection coordinates, if configured. Base URL + service name wins over `service_url`.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (present(&self.base_url), present(&self.service_name)) {
            (Some(base_url), Some(service_name)) => {
                Some(Coordinates::service(base_url, service_name))
            }
            _ => present(&self.service_url).map(Coordinates::Url),
        }
    }

    /// The stored raw document, if it has any content
    pub fn document(&self) -> Option<&str> {
        self.metadata.as_deref().filter(|doc| !doc.trim().is_empty())
    }

    pub fn clear_coordinates(&mut self) {
        self.base_url = None;
        self.service_name = None;
        self.service_url = None;
    }
}

/// The event that triggered a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTrigger {
    Create,
    Update,
    /// Backfill on read: only fetches when no document is stored yet
    Read,
}

/// What a refresh does for a given descriptor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshAction {
    /// Recompute version, schema and fingerprint from the stored document
    Rederive,
    /// Retrieve the document, then derive everything from it
    Fetch(Coordinates),
    /// Nothing to work from, or nothing to do for this trigger
    Noop,
}

impl RefreshAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshAction::Rederive => "rederive",
            RefreshAction::Fetch(_) => "fetch",
            RefreshAction::Noop => "noop",
        }
    }
}

impl fmt::Display for RefreshAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything derived from one raw document.
///
/// Produced all at once: a parse failure yields no snapshot at all.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSnapshot {
    pub schema: NormalizedSchema,
    pub version: ODataVersion,
    pub fingerprint: Fingerprint,
}

/// Run version detection, parsing and fingerprinting over a raw document
pub fn analyze_document(raw: &str) -> Result<MetadataSnapshot, MetadataError> {
    analyze_bytes(raw.as_bytes())
}

/// Like [`analyze_document`] for a body that has not been decoded yet.
///
/// The fingerprint covers `bytes` exactly as given. Bodies that are not valid
/// UTF-8 are rejected as malformed.
pub fn analyze_bytes(bytes: &[u8]) -> Result<MetadataSnapshot, MetadataError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        MetadataError::malformed(format!("document is not valid UTF-8: {}", e))
    })?;

    Ok(MetadataSnapshot {
        schema: parse_metadata(text)?,
        version: detect_version(text),
        fingerprint: fingerprint_bytes(bytes),
    })
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub descriptor: ServiceDescriptor,
    pub action: RefreshAction,
    /// Fingerprint differs from the one stored before this refresh
    pub changed: bool,
}

enum Plan<'a> {
    Rederive(&'a str),
    Fetch(Coordinates),
    Noop,
}

fn decide(descriptor: &ServiceDescriptor, trigger: RefreshTrigger) -> Plan<'_> {
    match (descriptor.document(), descriptor.coordinates(), trigger) {
        // A stored document always wins over re-fetching from coordinates
        (Some(_), _, RefreshTrigger::Read) => Plan::Noop,
        (Some(document), _, _) => Plan::Rederive(document),
        (None, Some(coordinates), _) => Plan::Fetch(coordinates),
        (None, None, _) => Plan::Noop,
    }
}

pub struct Refresher<F: MetadataFetch> {
    fetcher: F,
    logger: RefreshLogger,
}

impl<F: MetadataFetch> Refresher<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_logger(fetcher, RefreshLogger::default())
    }

    pub fn with_logger(fetcher: F, logger: RefreshLogger) -> Self {
        Self { fetcher, logger }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The action `refresh` would take, without doing any I/O
    pub fn plan(&self, descriptor: &ServiceDescriptor, trigger: RefreshTrigger) -> RefreshAction {
        match decide(descriptor, trigger) {
            Plan::Rederive(_) => RefreshAction::Rederive,
            Plan::Fetch(coordinates) => RefreshAction::Fetch(coordinates),
            Plan::Noop => RefreshAction::Noop,
        }
    }

    pub async fn refresh(
        &self,
        descriptor: &ServiceDescriptor,
        trigger: RefreshTrigger,
    ) -> Result<RefreshOutcome, MetadataError> {
        self.refresh_at(descriptor, trigger, Utc::now()).await
    }

    /// Refresh with an explicit clock reading.
    ///
    /// On error the input descriptor is the caller's last good state; nothing
    /// derived from the failed attempt is returned.
    pub async fn refresh_at(
        &self,
        descriptor: &ServiceDescriptor,
        trigger: RefreshTrigger,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, MetadataError> {
        let mut updated = descriptor.clone();
        if trigger == RefreshTrigger::Create && updated.created_at.is_none() {
            updated.created_at = Some(now);
        }

        let (action, context, result) = match decide(descriptor, trigger) {
            Plan::Noop => {
                debug!("Nothing to refresh for {:?} event", trigger);
                return Ok(RefreshOutcome {
                    descriptor: updated,
                    action: RefreshAction::Noop,
                    changed: false,
                });
            }
            Plan::Rederive(document) => {
                let context = self.logger.start_refresh("rederive", None);
                let result = analyze_document(document).map(|snapshot| (None, snapshot));
                (RefreshAction::Rederive, context, result)
            }
            Plan::Fetch(coordinates) => {
                let target = coordinates.metadata_url().ok();
                let context = self.logger.start_refresh("fetch", target.as_deref());
                let result = self
                    .fetch_and_analyze(&coordinates)
                    .await
                    .map(|(body, snapshot)| (Some(body), snapshot));
                (RefreshAction::Fetch(coordinates), context, result)
            }
        };

        let (fetched, snapshot) = match result {
            Ok(derived) => derived,
            Err(e) => {
                self.logger.fail_refresh(&context, &e);
                return Err(e);
            }
        };

        let changed = descriptor.fingerprint != Some(snapshot.fingerprint);

        if let Some(body) = fetched {
            updated.metadata = Some(body);
        }
        updated.version = Some(snapshot.version);
        updated.fingerprint = Some(snapshot.fingerprint);
        updated.schema = Some(snapshot.schema);
        updated.last_refreshed = Some(now);

        self.logger.complete_refresh(
            &context,
            updated.version,
            updated.fingerprint.as_ref(),
            changed,
        );

        Ok(RefreshOutcome {
            descriptor: updated,
            action,
            changed,
        })
    }

    async fn fetch_and_analyze(
        &self,
        coordinates: &Coordinates,
    ) -> Result<(String, MetadataSnapshot), MetadataError> {
        let raw = self.fetcher.fetch(coordinates).await?;
        let snapshot = analyze_bytes(&raw.bytes)?;
        Ok((raw.into_text()?, snapshot))
    }
}
