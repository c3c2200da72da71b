//! Media blob storage for Keepsake.
//!
//! This crate accepts binary uploads, assigns them stable retrievable keys,
//! and serves them back efficiently -- including the byte-range reads that
//! make video and audio seekable. Keys are namespaced by a coarse media
//! category plus a random unique suffix, so concurrent uploads never collide
//! and a key is never reused for different content.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one data file plus a metadata sidecar per key
//!
//! # Degraded Mode
//!
//! A [`MediaStore`] built without a backend is *sandboxed*: uploads return
//! [`UploadOutcome::Sandboxed`] instead of failing, so the caller can keep
//! the entry with only its locally generated preview, while reads fail
//! loudly with [`MediaError::BackendUnconfigured`].

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
pub mod range;
pub mod store;
pub mod traits;

pub use blob::{category_for, resolve_content_type, Blob};
pub use error::{MediaError, MediaResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use range::ByteRange;
pub use store::{MediaConfig, MediaRead, MediaStore, ReadStatus, UploadOutcome};
pub use traits::BlobStore;
