//! PostgreSQL storage implementation
//!
//! - [`client`] - pooled connection handling and query helpers
//! - [`adapter`] - storage-trait implementations
//! - [`models`] - row-to-domain conversions

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgresAdapter;
pub use client::PostgresClient;
