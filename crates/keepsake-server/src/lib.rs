//! HTTP server for Keepsake.
//!
//! A thin axum routing layer over the two real components: the entry
//! [`Archive`](keepsake_archive::Archive) and the
//! [`MediaStore`](keepsake_media::MediaStore). Handlers translate between
//! HTTP and the component contracts -- the `{success, data?, error?}`
//! envelope for JSON endpoints, raw bodies with range/cache headers for
//! media delivery -- and own nothing else.

pub mod config;
pub mod entries;
pub mod error;
pub mod handler;
pub mod media;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::KeepsakeServer;
pub use state::AppState;
