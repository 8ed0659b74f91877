//! # postfile HTTP Server Module
//!
//! Axum server exposing the post store.
//!
//! # Endpoints
//!
//! - `/posts`, `/posts/:id` - CRUD on posts
//! - `/health` - Health check
//! - `/metrics` - Request and mutation counters

pub mod config;
pub mod observability_routes;
pub mod posts_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use observability_routes::REQUEST_ID_HEADER;
pub use posts_routes::{ErrorResponse, PostResponse, PostsListResponse};
pub use server::HttpServer;
