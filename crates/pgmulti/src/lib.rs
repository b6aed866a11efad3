//! # pgmulti
//!
//! Insert many rows into one PostgreSQL table with a single statement.
//!
//! ## Features
//!
//! - **One round trip**: rows are rendered into `INSERT ... VALUES (...),(...)` with `$n`
//!   placeholders numbered across the whole statement
//! - **Generated ids**: an optional single `RETURNING` column is collected as `Vec<i64>`
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **SQL tracing**: optional `tracing` events for every executed statement
//!
//! ```ignore
//! use pgmulti::{MultiInserter, params};
//!
//! let mut inserter = MultiInserter::new("users", "name,age", Some("id"))?;
//! inserter.add(params!["alice", 30_i32])?;
//! inserter.add(params!["bob", 40_i32])?;
//!
//! let ids = inserter.insert(&client).await?;
//! ```

pub mod client;
pub mod error;
pub mod inserter;
pub mod param;

pub use client::{GenericClient, PgCursor, RowCursor};
pub use error::{BatchError, BatchResult};
pub use inserter::MultiInserter;
pub use param::{Param, ParamList};

#[cfg(feature = "tracing")]
pub mod tracing_client;

#[cfg(feature = "tracing")]
pub use tracing_client::TracingClient;
