//! Fluent query builder and DynamoDB expression compiler.
//!
//! Requests start at a [`Connection`], accumulate clauses and options on a
//! [`RequestBuilder`], compile through the [`grammar`] into wire parameters
//! and come back through the [`processor`] as plain items.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod grammar;
pub mod key;
pub mod placeholder;
pub mod predicate;
pub mod processor;
pub mod update;

pub use builder::{Compiled, Outcome, RequestBuilder};
pub use client::{DisconnectedClient, StoreClient, StoreFuture, StoreResponse};
pub use config::QueryConfig;
pub use connection::Connection;
pub use dispatch::{ShorthandArgs, Slot};
pub use error::{QueryError, QueryResult};
pub use grammar::BatchRequest;
pub use key::KeySchema;
pub use predicate::{Connector, PredicateBuilder, WhereArgs};
pub use processor::{
    BatchGetResult, BatchWriteResult, Decoder, FromItem, ItemCollection, ItemResult, Metadata,
    Record,
};

#[cfg(test)]
pub(crate) fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}
