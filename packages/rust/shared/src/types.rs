//! Domain output types: the normalized post summary and the per-request
//! page digest handed to the rendering collaborator.
//!
//! Both serialize in camelCase because the renderer consumes them as JSON
//! page props.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PostSummary
// ---------------------------------------------------------------------------

/// One published post, normalized from the store's loosely-typed record.
///
/// Created fresh per request and never persisted. Ordering within a digest
/// follows the store's result page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Stable post identifier, sourced from the record's title property.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Publication date (ISO 8601 date string), if set on the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-modified timestamp (ISO 8601), maintained by the store.
    pub updated_at: String,
    /// Category display name, if the select property has a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Header image URL derived from the record's attachment list, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
}

// ---------------------------------------------------------------------------
// PageDigest
// ---------------------------------------------------------------------------

/// The assembled per-request payload: site display metadata plus the
/// ordered post summaries. Consumed solely by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDigest {
    /// Host of the resolved site (not necessarily the requested host:
    /// unknown hosts fall back to the default site).
    pub host: String,
    /// Site display title.
    pub title: String,
    /// Site subtitle, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    /// Copyright notice, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Resolved custom stylesheet content, if the site configures one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    /// Published posts in store order.
    pub posts: Vec<PostSummary>,
}
