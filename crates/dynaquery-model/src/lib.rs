//! DynamoDB wire model for dynaquery.
//!
//! This crate holds the types that cross the wire: typed attribute values,
//! request parameters, response shapes and store errors, plus the plain
//! [`Value`] model application code works with and the codec between the two.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod codec;
pub mod error;
pub mod operations;
pub mod ordered;
pub mod output;
pub mod params;
pub mod types;
pub mod value;

pub use attribute_value::{AttributeMap, AttributeValue};
pub use codec::CodecError;
pub use error::{StoreError, StoreErrorCode};
pub use operations::Operation;
pub use ordered::OrderedMap;
pub use params::{RequestItems, RequestParams};
pub use value::{Item, Value};
