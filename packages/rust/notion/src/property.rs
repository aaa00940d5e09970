//! Serde model of the store's query and property payloads.
//!
//! The store is duck-typed on the wire: every property value arrives with a
//! `type` discriminant naming which sub-payload is legal to read.
//! [`PropertyValue`] models that as an internally tagged union so the
//! normalizer can match exhaustively.

use std::collections::BTreeMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Query response
// ---------------------------------------------------------------------------

/// One page of results from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Records in store order. Not re-sorted by this crate.
    pub results: Vec<RawRecord>,
}

/// A record as returned by a database query: its id plus the map of
/// property names to store-internal property ids. Values are retrieved
/// per property in a separate round trip.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Store-assigned record (page) id.
    pub id: String,
    /// Property name → store-internal property id.
    pub properties: BTreeMap<String, PropertyRef>,
}

/// The store's handle for one property of one record.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRef {
    /// Store-internal property id, used for per-property retrieval.
    pub id: String,
}

impl RawRecord {
    /// Look up the store-internal id for a property name, if the record
    /// has that property at all.
    pub fn property_id(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Property values
// ---------------------------------------------------------------------------

/// A retrieved property value, tagged with its shape discriminant.
///
/// Each variant carries only the sub-payload that is legal for its shape;
/// reading the wrong payload is unrepresentable.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Title text (the record's identifier property shape).
    Title { title: TextValue },
    /// Rich text, read as its plain-text projection.
    RichText { rich_text: TextValue },
    /// A date, absent when the property is unset on the record.
    Date { date: Option<DateValue> },
    /// Store-maintained last-modified timestamp (ISO 8601).
    LastEditedTime { last_edited_time: String },
    /// Single-select, absent when no option is chosen.
    Select { select: Option<SelectValue> },
    /// File-attachment list (possibly empty).
    Files { files: Vec<FileAttachment> },
}

impl PropertyValue {
    /// The wire name of this value's shape discriminant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::RichText { .. } => "rich_text",
            Self::Date { .. } => "date",
            Self::LastEditedTime { .. } => "last_edited_time",
            Self::Select { .. } => "select",
            Self::Files { .. } => "files",
        }
    }
}

/// Plain-text projection of a title or rich-text payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub plain_text: String,
}

/// A date payload. Only `start` is used by the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    /// ISO 8601 date (or datetime) string.
    pub start: String,
    /// End of a date range, unused here.
    #[serde(default)]
    pub end: Option<String>,
}

/// A chosen single-select option.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectValue {
    pub name: String,
}

// ---------------------------------------------------------------------------
// File attachments
// ---------------------------------------------------------------------------

/// One entry of a file-attachment list.
///
/// Sub-shapes the pipeline does not recognize deserialize as [`Other`]
/// rather than failing: a record with an odd attachment renders without a
/// header image, it does not fail the request. That includes elements with
/// an unknown `type` tag, a missing `type` tag, and recognized tags whose
/// expected payload is absent.
///
/// [`Other`]: FileAttachment::Other
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "AttachmentRepr")]
pub enum FileAttachment {
    /// A file uploaded to the store, served from a store-hosted URL.
    File { file: HostedFile },
    /// A link to an externally hosted file.
    External { external: ExternalLink },
    /// Any unrecognized attachment sub-shape.
    Other,
}

/// Wire form of one attachment element. Folded into [`FileAttachment`]
/// infallibly, so lenient handling cannot be bypassed by an odd payload.
#[derive(Debug, Clone, Deserialize)]
struct AttachmentRepr {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    file: Option<HostedFile>,
    #[serde(default)]
    external: Option<ExternalLink>,
}

impl From<AttachmentRepr> for FileAttachment {
    fn from(repr: AttachmentRepr) -> Self {
        match (repr.kind.as_deref(), repr.file, repr.external) {
            (Some("file"), Some(file), _) => Self::File { file },
            (Some("external"), _, Some(external)) => Self::External { external },
            _ => Self::Other,
        }
    }
}

impl FileAttachment {
    /// The display URL for this attachment, or `None` for unrecognized
    /// sub-shapes.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::File { file } => Some(&file.url),
            Self::External { external } => Some(&external.url),
            Self::Other => None,
        }
    }
}

/// Store-hosted file payload.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedFile {
    pub url: String,
}

/// External-link file payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalLink {
    pub url: String,
}
