//! # meridian-link
//!
//! Client core for the Meridian admin portal.
//!
//! The Meridian server describes every table and value with a small
//! structural type algebra and returns query rows as positional arrays
//! of self-describing JSON values. This crate owns the pieces of the
//! portal that have to understand that encoding:
//!
//! - **Type resolution** ([`resolver`]): algebraic type descriptors
//!   (primitive / product / sum / ref) become canonical display tags,
//!   with refs resolved against the schema document's typespace and the
//!   built-in composite types (Timestamp, Identity, Duration) recognized
//!   by their reserved field names.
//! - **Value decoding** ([`decode`]): raw positional wire rows become
//!   named rows of plain values, with the wire format's single-element
//!   array wrappers unwrapped.
//! - **Schema caching** ([`cache`]): discovered table metadata is held
//!   behind a TTL so the portal's pages do not re-query schema on every
//!   render. The clock is injected, so tests assert expiry without
//!   sleeping.
//! - **HTTP transport** ([`client`]): a thin reqwest wrapper over the
//!   server's schema/SQL/logs/reducer endpoints that doubles as the
//!   cache's discovery collaborator.
//!
//! Resolution and decoding are pure and synchronous; all I/O lives in
//! the client and behind the [`cache::SchemaDiscovery`] trait.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meridian_link::{MeridianClient, SchemaCache, decode};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MeridianClient::builder()
//!     .base_url("http://localhost:3000")
//!     .build()?;
//!
//! let cache = SchemaCache::new(Arc::new(client.clone()), Duration::from_secs(30));
//! let tables = cache.get_all_tables(false).await?;
//!
//! for result in client.sql("SELECT * FROM players").await? {
//!     let decoded = decode::decode_query_result(&result, &Default::default())?;
//!     println!("{} rows", decoded.rows.len());
//! }
//! # let _ = tables;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod decode;
pub mod error;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use cache::{CacheStatus, Clock, SchemaCache, SchemaDiscovery, SystemClock};
pub use client::{AuthProvider, MeridianClient, MeridianClientBuilder};
pub use decode::{DecodedResult, DecodedRow};
pub use error::{MeridianLinkError, Result, RowShapeError, TypeResolutionError};
pub use models::{
    AlgebraicType, ColumnDescriptor, ColumnType, OptionalName, PrimitiveType, ProductElement,
    QueryResult, ReducerDescriptor, SchemaDocument, SumVariant, TableDescriptor, TableEntry,
    Typespace,
};
