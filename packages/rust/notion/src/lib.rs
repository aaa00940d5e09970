//! Notion API client: the content fetcher and typed-property accessor.
//!
//! This crate talks to the external content store. It provides:
//! - [`NotionClient`] — queries a database for published records and
//!   retrieves individual record properties as typed values
//! - [`PropertyValue`] — the tagged union over the property shapes a
//!   record field may legally carry
//! - [`RawRecord`] — the store's opaque per-record query result

mod client;
mod property;

pub use client::NotionClient;
pub use property::{
    DateValue, FileAttachment, PropertyRef, PropertyValue, QueryResponse, RawRecord, SelectValue,
    TextValue,
};
