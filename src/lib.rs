//! # Toolforge
//!
//! Backend for a merchant-platform embedded admin app that installs
//! AI-generated storefront tools via script tags, usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolforge::ai::GeminiClient;
//! use toolforge::config::Credentials;
//! use toolforge::remote::ShopifyClient;
//! use toolforge::server::{AppState, create_router};
//! use toolforge::store::{SqliteStore, Store};
//!
//! let credentials = Credentials::from_env().unwrap();
//! let store = SqliteStore::new("./data/toolforge.db").unwrap();
//! store.initialize().unwrap();
//!
//! let platform = ShopifyClient::new(&credentials.api_key, &credentials.api_secret).unwrap();
//! let generator = GeminiClient::new(&credentials.ai_api_key).unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     Arc::new(platform),
//!     Arc::new(generator),
//!     credentials,
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod provision;
pub mod remote;
pub mod server;
pub mod store;
pub mod types;
