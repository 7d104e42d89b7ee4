//! Client SDK for the Meridian delegated ledger.
//!
//! Builds send blocks, computes their canonical hashes, signs and verifies
//! them, generates proof of work, and submits them to the consensus delegate
//! each block routes to.
//!
//! ```
//! use meridian_sdk::blocks::SendBlock;
//! use meridian_sdk::keys::{Hash, Private};
//!
//! # fn main() -> Result<(), meridian_sdk::util::Error> {
//! let key = Private::random();
//! let mut block = SendBlock::new(key.to_public());
//! block.set_previous(Hash::zero()); // first block of the account
//! block.set_sequence(0);
//! block.set_fee("0".parse()?);
//! block.add_transaction(&Private::random().to_public().to_address(), "100")?;
//! assert!(block.sign(&key)?);
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod keys;
pub mod rpc;
pub mod util;

pub use blocks::{Amount, Block, BlockKind, SendBlock, SendEntry};
pub use keys::{Hash, NetworkMode, Private, Public, Signature, Work};
pub use rpc::{Endpoint, PublishConfig, Publisher};
pub use util::Error;
