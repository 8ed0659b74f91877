//! postfile - CRUD over posts persisted to a single JSON file
//!
//! The [`store`] module owns the backing file; [`http_server`] exposes it
//! over HTTP; [`cli`] wires configuration, startup and shutdown.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
