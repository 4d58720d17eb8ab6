//! # echo-sdk
//!
//! Rust SDK for the Echo blockchain.
//!
//! ## Features
//!
//! - **EchoClient**: socket client multiplexing calls, subscriptions and broadcasts
//! - **Dispatcher**: call id correlation over one shared socket
//! - **Subscriptions**: account, block, blockchain data and broadcast result listeners
//! - **Wallet**: signing key management
//! - **WsTransport**: WebSocket transport (feature `ws`, on by default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use echo_sdk::{ClientConfig, EchoClient, Wallet};
//! use echo_sdk::{AssetAmount, ObjectId, Secp256k1Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EchoClient::connect(ClientConfig::new("ws://127.0.0.1:6311")).await?;
//!
//!     // Watch the head block
//!     client
//!         .subscribe_blocks(|props| println!("head #{}", props.head_block_number))
//!         .await?;
//!
//!     // Transfer 500 core units from 1.2.100 to 1.2.200
//!     let wallet = Wallet::from_wif(
//!         "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ",
//!         &Secp256k1Provider,
//!     )?;
//!     let confirmation = client
//!         .transfer(
//!             &wallet,
//!             ObjectId::account(100),
//!             ObjectId::account(200),
//!             AssetAmount::core(500),
//!         )
//!         .await?;
//!     println!("confirmed: {}", confirmation);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
pub mod rpc;
mod session;
pub mod subscription;
mod transport;
mod wallet;

// Re-export main types
pub use client::EchoClient;
pub use config::ClientConfig;
pub use error::SdkError;
pub use rpc::{Api, CallState, Dispatcher, SocketOperation};
pub use session::Session;
pub use subscription::{AccountEvent, SubscriptionId, Topic};
pub use transport::{InboundHandler, MockTransport, Transport};
pub use wallet::Wallet;

#[cfg(feature = "ws")]
pub use transport::{WsDriver, WsTransport};

// Re-export model and primitives for convenience
pub use echo_crypto::{CryptoProvider, Secp256k1Provider};
pub use echo_primitives::{AccountId, AssetAmount, AssetId, ChainId, ObjectId, PublicKey};
pub use echo_types::{Operation, SignedTransaction, Transaction, TxBuilder};
