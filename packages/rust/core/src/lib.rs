//! Core pipeline orchestration for notipress.
//!
//! This crate ties together site resolution, the content store client, and
//! record normalization into the per-request digest build ([`build_digest`]).

pub mod normalizer;
pub mod pipeline;

pub use normalizer::normalize;
pub use pipeline::build_digest;
