//! HTTP client for the Notion API.
//!
//! Two operations back the pipeline: querying a database for published
//! records, and retrieving a single record property as a typed value.
//! Transport and API failures propagate as [`NotipressError::Store`]
//! unchanged; this client never retries.

use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use notipress_shared::config::NotionConfig;
use notipress_shared::{NotipressError, Result};

use crate::property::{PropertyValue, QueryResponse, RawRecord};

/// Notion API protocol version sent with every request.
const NOTION_VERSION: &str = "2022-06-28";

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("notipress/", env!("CARGO_PKG_VERSION"));

/// Name of the status property gating publication.
const STATUS_PROPERTY: &str = "Status";

/// Select-option value marking a record as published.
const PUBLISHED_MARKER: &str = "Published";

// ---------------------------------------------------------------------------
// NotionClient
// ---------------------------------------------------------------------------

/// Client for one content store, built once at startup and shared across
/// requests. Holds the static bearer credential.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl NotionClient {
    /// Build a client from the `[notion]` config section.
    ///
    /// The configured timeout bounds every store round trip; an expired
    /// request surfaces as a store error and fails the digest build.
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            NotipressError::config(format!("invalid store base URL {}: {e}", config.base_url))
        })?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotipressError::Store(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Query a database for its published records.
    ///
    /// Issues exactly one query with the fixed status filter and returns
    /// the store's result page as-is: store order, store page size. The
    /// store's default page limit is a known boundary, not paginated over.
    #[instrument(skip_all, fields(database_id = %database_id))]
    pub async fn query_published(&self, database_id: &str) -> Result<Vec<RawRecord>> {
        let url = self.endpoint(&format!("/v1/databases/{database_id}/query"))?;

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&json!({
                "filter": {
                    "property": STATUS_PROPERTY,
                    "select": { "equals": PUBLISHED_MARKER }
                }
            }))
            .send()
            .await
            .map_err(|e| NotipressError::Store(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotipressError::Store(format!("{url}: HTTP {status}")));
        }

        let page: QueryResponse = response
            .json()
            .await
            .map_err(|e| NotipressError::Store(format!("{url}: invalid query response: {e}")))?;

        debug!(records = page.results.len(), "published query returned");
        Ok(page.results)
    }

    /// Retrieve one named property of a record as a typed value.
    ///
    /// The record's own property map supplies the name → store-internal id
    /// mapping; a name absent from that map is a missing-field error. The
    /// value retrieval itself is a store round trip, so callers fetch
    /// independent fields concurrently.
    pub async fn get_field(&self, record: &RawRecord, name: &str) -> Result<PropertyValue> {
        let property_id = record
            .property_id(name)
            .ok_or_else(|| NotipressError::missing_field(name))?;

        let url = self.endpoint(&format!("/v1/pages/{}/properties/{property_id}", record.id))?;

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| NotipressError::Store(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotipressError::Store(format!("{url}: HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| NotipressError::Store(format!("{url}: invalid property payload: {e}")))
    }

    // Join failures can only stem from a malformed configured base URL,
    // so they surface as configuration errors rather than store errors.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| {
            NotipressError::config(format!("cannot build endpoint {path} on {}: {e}", self.base_url))
        })
    }
}
