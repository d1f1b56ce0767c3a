//! # SNBP
//!
//! School-side portal for the SNBP (merit-based national university admission) track:
//! student report-card data, counselor and principal review, admin selection, and the public
//! result lookup. Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! snbp = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snbp::auth::SessionKeys;
//! use snbp::notify::LogNotifier;
//! use snbp::server::{AppState, create_router};
//! use snbp::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/snbp.db").unwrap();
//! store.initialize().unwrap();
//!
//! let sessions = SessionKeys::new("secret", chrono::Duration::hours(2));
//! let state = Arc::new(AppState::new(Arc::new(store), sessions, Arc::new(LogNotifier)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod server;
pub mod store;
pub mod types;
pub mod workflow;
