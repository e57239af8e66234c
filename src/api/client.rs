use super::constants::{self, METADATA_SUFFIX, headers};
use crate::config::FetchSettings;
use crate::error::MetadataError;
use crate::metadata::has_metadata_root;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Where a service's metadata document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coordinates {
    /// Base URL plus service path, e.g. `https://host/sap/opu/odata/sap` + `ZCATALOG_SRV`
    Service {
        base_url: String,
        service_name: String,
    },
    /// Service root or full `$metadata` URL
    Url(String),
}

impl Coordinates {
    pub fn service(base_url: impl Into<String>, service_name: impl Into<String>) -> Self {
        Coordinates::Service {
            base_url: base_url.into(),
            service_name: service_name.into(),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Coordinates::Url(url.into())
    }

    /// Resolve and validate the `$metadata` URL
    pub fn metadata_url(&self) -> Result<String, MetadataError> {
        let url = match self {
            Coordinates::Service {
                base_url,
                service_name,
            } => build_metadata_url(base_url, service_name),
            Coordinates::Url(url) => metadata_url_from(url),
        };
        validate_url(&url)?;
        Ok(url)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinates::Service {
                base_url,
                service_name,
            } => write!(f, "{} + {}", base_url, service_name),
            Coordinates::Url(url) => f.write_str(url),
        }
    }
}

/// Join base URL and service name with exactly one slash and one `$metadata` suffix
pub fn build_metadata_url(base_url: &str, service_name: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let service = strip_metadata_suffix(service_name.trim().trim_matches('/'));

    if service.is_empty() {
        format!("{}/{}", base, METADATA_SUFFIX)
    } else {
        format!("{}/{}/{}", base, service, METADATA_SUFFIX)
    }
}

/// Append `$metadata` to a service root unless it is already there
pub fn metadata_url_from(url: &str) -> String {
    let root = strip_metadata_suffix(url.trim().trim_end_matches('/'));
    format!("{}/{}", root, METADATA_SUFFIX)
}

fn strip_metadata_suffix(path: &str) -> &str {
    match path.strip_suffix(METADATA_SUFFIX) {
        Some(rest) if rest.is_empty() || rest.ends_with('/') => rest.trim_end_matches('/'),
        _ => path,
    }
}

fn validate_url(url: &str) -> Result<(), MetadataError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| MetadataError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(MetadataError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// HTTP Basic credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `ODATA_USER`/`ODATA_PASSWORD`, falling back to `SAP_USER`/`SAP_PASS`
    pub fn from_env() -> Option<Credentials> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Both halves must be present and non-empty, otherwise requests go out unauthenticated
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .find(|value| !value.is_empty())
        };

        let username = first(&constants::env::USER_VARS[..])?;
        let password = first(&constants::env::PASSWORD_VARS[..])?;
        Some(Credentials { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A retrieved metadata document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// URL the document was fetched from
    pub url: String,
    /// Response body exactly as received, undecoded
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            bytes: bytes.into(),
        }
    }

    /// Decode the body as UTF-8 without altering any byte
    pub fn into_text(self) -> Result<String, MetadataError> {
        String::from_utf8(self.bytes).map_err(|e| {
            MetadataError::malformed(format!("document from {} is not valid UTF-8: {}", self.url, e))
        })
    }
}

/// Retrieval seam used by the refresher; swapped for a fake in tests
#[async_trait]
pub trait MetadataFetch: Send + Sync {
    async fn fetch(&self, coordinates: &Coordinates) -> Result<RawDocument, MetadataError>;
}

/// Fetches `$metadata` documents over HTTP. No retries are performed.
#[derive(Clone)]
pub struct MetadataClient {
    http_client: reqwest::Client,
    credentials: Option<Credentials>,
}

impl MetadataClient {
    pub fn new(
        settings: &FetchSettings,
        credentials: Option<Credentials>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self::with_custom_client(http_client, credentials))
    }

    /// Create a client around an existing HTTP client
    pub fn with_custom_client(http_client: reqwest::Client, credentials: Option<Credentials>) -> Self {
        Self {
            http_client,
            credentials,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Fetch the raw metadata document for `coordinates`
    pub async fn fetch_metadata(&self, coordinates: &Coordinates) -> Result<RawDocument, MetadataError> {
        let url = coordinates.metadata_url()?;
        info!("Fetching metadata from {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header("Accept", headers::ACCEPT_XML)
            .header("OData-MaxVersion", headers::ODATA_MAX_VERSION);

        if let Some(credentials) = &self.credentials {
            debug!("Attaching Basic credentials for user {}", credentials.username);
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| MetadataError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!("Metadata response status: {}", status);

        if !status.is_success() {
            warn!("Metadata fetch from {} failed with status {}", url, status);
            return Err(MetadataError::FetchFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                url,
            });
        }

        let bytes = response.bytes().await.map_err(|e| MetadataError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;

        // Lossy view for the root check only; the bytes are kept untouched
        if !has_metadata_root(&String::from_utf8_lossy(&bytes)) {
            warn!("Response from {} is not an EDMX document", url);
            return Err(MetadataError::InvalidMetadataDocument { url });
        }

        debug!("Fetched {} bytes of metadata from {}", bytes.len(), url);
        Ok(RawDocument::new(url, bytes))
    }
}

#[async_trait]
impl MetadataFetch for MetadataClient {
    async fn fetch(&self, coordinates: &Coordinates) -> Result<RawDocument, MetadataError> {
        self.fetch_metadata(coordinates).await
    }
}
