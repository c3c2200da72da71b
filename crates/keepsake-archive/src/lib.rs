//! Durable journal entry storage for Keepsake.
//!
//! This crate implements the entry archive: a key-value record store that
//! owns validation, one-time schema migration, and deterministic
//! chronological reads. One [`Archive`] instance is one partition -- all
//! mutations for that partition serialize through a single write guard, the
//! way the deployed system serialized them through a single storage owner.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FsKvStore`] -- one file per key under a root directory
//!
//! # Design Rules
//!
//! 1. Reads recompute the sorted view from durable state; ordering is never
//!    stored.
//! 2. Migration runs at most once per storage lifetime, is idempotent, and
//!    is safe to interrupt: new-format records are written first, the legacy
//!    blob is deleted next, and the completion flag is set last.
//! 3. Validation failures are client errors and are never retried; storage
//!    failures propagate unchanged to the caller.
//! 4. A failed write never leaves the collection partially updated.

pub mod archive;
pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod record;
pub mod traits;

pub use archive::Archive;
pub use config::ArchiveConfig;
pub use error::{ArchiveError, ArchiveResult};
pub use fs::FsKvStore;
pub use memory::InMemoryKvStore;
pub use traits::KvStore;
