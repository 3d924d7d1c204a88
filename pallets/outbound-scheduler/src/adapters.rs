//! Collaborator traits for the outbound scheduler.
//!
//! Everything the engine needs from the rest of the runtime goes through one of these seams,
//! so the pallet stays independent of how balances, nodes and fee estimates are kept.

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

use frame::prelude::*;

use crate::types::{
  Address, AdmissionError, AdmissionOutcome, Asset, Balance, Chain, Coin, ModuleKind,
  OutboundMemo, OutboundParameters, PaymentRequest, TxId, Vault, VaultKey,
};

/// Per-chain transaction cost estimates.
pub trait GasEstimator {
  /// Outbound fee for paying `asset` on `chain`, denominated in `asset`.
  fn fee(
    chain: Chain,
    asset: Asset,
    params: &OutboundParameters,
  ) -> Result<Balance, DispatchError>;

  /// Upper bound of gas one outbound on `chain` may burn, in the chain's gas asset.
  fn max_gas(chain: Chain, params: &OutboundParameters) -> Result<Coin, DispatchError>;

  fn gas_rate(chain: Chain, params: &OutboundParameters) -> Result<u64, DispatchError>;
}

/// Distributes affiliate fees out of a swap payout.
pub trait AffiliateFeeSkimmer {
  /// Returns how much of `coin` was paid out to affiliates.
  fn skim(in_hash: &TxId, coin: &Coin, memo: &OutboundMemo) -> Result<Balance, DispatchError>;
}

/// Native-chain balances held by module accounts and users.
pub trait NativeLedger {
  /// Module whose account lives at `address`, if any.
  fn module_by_address(address: &[u8]) -> Option<ModuleKind>;

  fn transfer_to_module(from: ModuleKind, to: ModuleKind, coin: Coin) -> DispatchResult;

  fn transfer_to_address(from: ModuleKind, to: &[u8], coin: Coin) -> DispatchResult;

  fn burn(from: ModuleKind, coin: Coin) -> DispatchResult;

  fn credit_trade_account(from: ModuleKind, to: &[u8], coin: Coin) -> DispatchResult;
}

/// Orders vaults by how safe they are to draw from. `Ordering::Less` is preferred.
pub trait SecurityPolicy {
  fn compare(a: &Vault, b: &Vault) -> Ordering;

  /// Stable sort, so vaults the policy considers equal keep their prior order.
  fn rank(vaults: &mut [Vault]) {
    vaults.sort_by(Self::compare);
  }
}

/// Prefers the vault with the highest security score, then the lowest key.
pub struct BySecurityScore;

impl SecurityPolicy for BySecurityScore {
  fn compare(a: &Vault, b: &Vault) -> Ordering {
    b.security.cmp(&a.security).then_with(|| a.pub_key.cmp(&b.pub_key))
  }
}

pub trait NodeStatus {
  fn is_jailed(node: &VaultKey) -> bool;
}

pub trait NetworkState {
  /// The network is unwinding and returning all funds.
  fn ragnarok_in_progress() -> bool;

  /// Pools are still being seeded and their native side must not move.
  fn liquidity_auction_active() -> bool;
}

pub trait VaultAddressing {
  fn address_of(vault: &VaultKey, chain: Chain) -> Option<Address>;
}

/// Entry points for sibling pallets that need to send funds out.
pub trait OutboundQueue<BlockNumber> {
  fn try_add(
    request: PaymentRequest,
    min_out: Balance,
  ) -> Result<AdmissionOutcome<BlockNumber>, AdmissionError>;

  /// Queues `request` at `height` without fees or vault discovery.
  fn force_enqueue(request: PaymentRequest, height: BlockNumber) -> DispatchResult;

  fn target_height(request: &PaymentRequest) -> Result<BlockNumber, DispatchError>;

  fn outbound_items(height: BlockNumber) -> Vec<PaymentRequest>;
}

impl AffiliateFeeSkimmer for () {
  fn skim(_: &TxId, _: &Coin, _: &OutboundMemo) -> Result<Balance, DispatchError> {
    Ok(0)
  }
}

impl NativeLedger for () {
  fn module_by_address(_: &[u8]) -> Option<ModuleKind> {
    None
  }

  fn transfer_to_module(_: ModuleKind, _: ModuleKind, _: Coin) -> DispatchResult {
    Ok(())
  }

  fn transfer_to_address(_: ModuleKind, _: &[u8], _: Coin) -> DispatchResult {
    Ok(())
  }

  fn burn(_: ModuleKind, _: Coin) -> DispatchResult {
    Ok(())
  }

  fn credit_trade_account(_: ModuleKind, _: &[u8], _: Coin) -> DispatchResult {
    Ok(())
  }
}

impl NodeStatus for () {
  fn is_jailed(_: &VaultKey) -> bool {
    false
  }
}

impl NetworkState for () {
  fn ragnarok_in_progress() -> bool {
    false
  }

  fn liquidity_auction_active() -> bool {
    false
  }
}

impl VaultAddressing for () {
  fn address_of(_: &VaultKey, _: Chain) -> Option<Address> {
    None
  }
}
