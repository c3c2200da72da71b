//! Foundation types for Keepsake.
//!
//! This crate provides the journal record types shared by the archive, the
//! media store, and the HTTP layer. Every other Keepsake crate depends on
//! `keepsake-types`.
//!
//! # Key Types
//!
//! - [`Entry`] — One journal record (text, image, video, or audio)
//! - [`EntryKind`] — The record's media category
//! - [`EntryPatch`] — Field-level partial update applied over an existing entry
//! - [`ApiResponse`] — The `{success, data?, error?}` JSON envelope
//! - [`date_key`] — Chronological ordering key tolerant of malformed dates

pub mod entry;
pub mod envelope;
pub mod order;

pub use entry::{Entry, EntryKind, EntryPatch, DEFAULT_DOMINANT_COLOR};
pub use envelope::ApiResponse;
pub use order::date_key;
