//! # filenode-server
//!
//! HTTP transport adapter for the filenode coordinator: routes, auth,
//! request middleware, configuration, and process bootstrap.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 HTTP clients                   │
//! └───────────────────────┬───────────────────────┘
//!                         │
//! ┌───────────────────────▼───────────────────────┐
//! │        auth · request-id · logging · CORS      │
//! ├─────────────────────────────────────────────────┤
//! │                route handlers                   │
//! ├─────────────────────────────────────────────────┤
//! │                 filenode-core                   │
//! │   (FileNode: BlobStore + Index + QuotaClient)    │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::NodeConfig;
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
