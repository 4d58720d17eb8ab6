//! # echo-types
//!
//! Operation and transaction model for the Echo SDK.
//!
//! - [`Operation`]: closed sum of every operation kind, each with a fixed
//!   consensus field order and a `[tag, {..}]` JSON form
//! - [`Transaction`]: signing payload assembly, fee injection, signing
//! - [`BlockData`]: the TaPoS reference-block fingerprint
//! - [`TxBuilder`]: fluent assembly of a transaction from chain head state

#![warn(missing_docs)]
#![warn(clippy::all)]

mod authority;
mod block_data;
mod error;
mod extensions;
mod options;
mod properties;
mod time;
mod transaction;
mod tx_builder;

pub mod operations;

pub use authority::Authority;
pub use block_data::{BlockData, DEFAULT_EXPIRATION_WINDOW_SECS};
pub use error::TypesError;
pub use extensions::Extensions;
pub use operations::{Operation, OperationBody, OperationKind, Validate};
pub use options::{AccountOptions, AssetOptions, BitassetOptions, Price, PERCENT_100};
pub use properties::DynamicGlobalProperties;
pub use time::{format_chain_time, parse_chain_time};
pub use transaction::{SignedTransaction, Transaction, MAX_OPERATIONS};
pub use tx_builder::TxBuilder;
