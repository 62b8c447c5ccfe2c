//! Catalog service for a small online plant store: record schema and
//! validation, listing queries, a MongoDB-backed store, the HTTP API, and a
//! client with the local listing state the storefront keeps.

pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod query;
pub mod schema;
pub mod seed;
pub mod store;
pub mod telemetry;
pub mod view;
