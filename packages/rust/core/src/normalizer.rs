//! Record normalizer: one raw store record → one [`PostSummary`].
//!
//! Exactly six named properties are retrieved per record, concurrently.
//! Each retrieved value's shape discriminant is validated against the
//! shape its role requires; any mismatch fails the whole request — there
//! are no partially-populated summaries and no retries.

use notipress_notion::{FileAttachment, NotionClient, PropertyValue, RawRecord};
use notipress_shared::{NotipressError, PostSummary, Result};

/// Post identifier property (title shape).
pub const FIELD_ID: &str = "ID";
/// Display title property (rich-text shape).
pub const FIELD_TITLE: &str = "Title";
/// Category property (single-select shape).
pub const FIELD_CATEGORY: &str = "Category";
/// Publication date property (date shape).
pub const FIELD_CREATED_AT: &str = "PublishedAt";
/// Last-modified property (store-maintained timestamp shape).
pub const FIELD_UPDATED_AT: &str = "UpdatedAt";
/// Header image property (file-attachment-list shape).
pub const FIELD_HEADER_IMAGE: &str = "HeaderImage";

/// Normalize one record into a post summary.
///
/// The six field retrievals are issued concurrently; the first failure
/// wins and the remaining retrievals are dropped, not awaited.
pub async fn normalize(client: &NotionClient, record: &RawRecord) -> Result<PostSummary> {
    let (id, title, category, created_at, updated_at, photo) = tokio::try_join!(
        client.get_field(record, FIELD_ID),
        client.get_field(record, FIELD_TITLE),
        client.get_field(record, FIELD_CATEGORY),
        client.get_field(record, FIELD_CREATED_AT),
        client.get_field(record, FIELD_UPDATED_AT),
        client.get_field(record, FIELD_HEADER_IMAGE),
    )?;

    let id = match id {
        PropertyValue::Title { title } => title.plain_text,
        other => return Err(NotipressError::unexpected_shape(FIELD_ID, other.kind())),
    };

    let title = match title {
        PropertyValue::RichText { rich_text } => rich_text.plain_text,
        other => return Err(NotipressError::unexpected_shape(FIELD_TITLE, other.kind())),
    };

    let created_at = match created_at {
        PropertyValue::Date { date } => date.map(|d| d.start),
        other => return Err(NotipressError::unexpected_shape(FIELD_CREATED_AT, other.kind())),
    };

    let updated_at = match updated_at {
        PropertyValue::LastEditedTime { last_edited_time } => last_edited_time,
        other => return Err(NotipressError::unexpected_shape(FIELD_UPDATED_AT, other.kind())),
    };

    let header_image = match photo {
        PropertyValue::Files { files } => header_image_url(&files),
        other => return Err(NotipressError::unexpected_shape(FIELD_HEADER_IMAGE, other.kind())),
    };

    let category = match category {
        PropertyValue::Select { select } => select.map(|s| s.name),
        other => return Err(NotipressError::unexpected_shape(FIELD_CATEGORY, other.kind())),
    };

    Ok(PostSummary {
        id,
        title,
        created_at,
        updated_at,
        category,
        header_image,
    })
}

/// Derive the header-image URL from an attachment list.
///
/// Only the first attachment is considered. Unrecognized sub-shapes and
/// empty lists mean "no image", deliberately not an error (lenient where
/// the shape checks above are strict, matching the reference behavior).
fn header_image_url(files: &[FileAttachment]) -> Option<String> {
    files.first()?.url().map(String::from)
}
