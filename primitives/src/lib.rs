#![cfg_attr(not(feature = "std"), no_std)]

pub mod assets;
pub mod ecosystem;
pub mod memo;
pub mod pool;
pub mod vault;

pub use assets::*;
pub use ecosystem::*;
pub use memo::*;
pub use pool::*;
pub use vault::*;

/// Identifier of an observed transaction (inbound or outbound) on any chain.
pub type TxId = [u8; 32];

/// Public key identifying a custodial vault. For single-node vaults this is also the
/// operator's node key.
pub type VaultKey = [u8; 32];

/// The blank transaction id marks internally generated payments with no originating inbound.
pub const BLANK_TX_ID: TxId = [0u8; 32];

/// Whether `id` is the blank transaction id.
pub fn is_blank_tx_id(id: &TxId) -> bool {
  id == &BLANK_TX_ID
}
