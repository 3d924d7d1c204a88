//! Vault selection: which vaults fund a payment and how much each contributes.

extern crate alloc;

use alloc::vec::Vec;

use frame::prelude::*;

use crate::{
  adapters::{NodeStatus, SecurityPolicy, VaultAddressing},
  types::{Asset, Balance, Coin, PaymentRequest, Vault, VaultKey, VaultKind, VaultStatus},
  Config, Pallet, Vaults, Voters, LOG_TARGET,
};

/// One vault's share of a payment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Allocation {
  pub vault: VaultKey,
  pub status: VaultStatus,
  pub amount: Balance,
}

/// What `vault` can put towards a payment of `asset`, keeping `reserve` back.
pub fn spendable(vault: &Vault, asset: &Asset, reserve: Balance) -> Balance {
  vault.available(asset).saturating_sub(reserve)
}

/// How many copies of `available` it would take to cover `requested`.
pub fn vaults_necessary(requested: Balance, available: Balance) -> Balance {
  if available == 0 {
    return Balance::MAX;
  }
  requested / available
}

/// Moves the vaults closest to covering `requested` on their own to the front. The sort is
/// stable, so equal counts keep the security order they arrived in.
pub fn order_by_vaults_necessary(
  vaults: &mut [Vault],
  asset: &Asset,
  requested: Balance,
  reserve: Balance,
) {
  if vaults.len() < 2 {
    return;
  }
  vaults.sort_by_key(|v| vaults_necessary(requested, spendable(v, asset, reserve)));
}

/// Walks `candidates` taking the remainder from the first vault that covers it, or everything
/// a vault can spend otherwise. Returns what is still uncovered.
pub fn fill(
  candidates: &[Vault],
  asset: &Asset,
  requested: Balance,
  reserve: Balance,
  allocations: &mut Vec<Allocation>,
) -> Balance {
  let mut remaining = requested;
  for vault in candidates {
    if remaining == 0 {
      break;
    }
    let available = spendable(vault, asset, reserve);
    if available == 0 {
      continue;
    }
    let amount = remaining.min(available);
    allocations.push(Allocation { vault: vault.pub_key, status: vault.status, amount });
    remaining -= amount;
  }
  remaining
}

impl<T: Config> Pallet<T> {
  /// Splits `request` across vaults in preference order: single-node vaults that observed the
  /// inbound, then active shared vaults, then retiring ones. Paying out the gas asset never
  /// dips into the `max_gas` a vault needs to send it.
  pub fn select_vaults(
    request: &PaymentRequest,
    fee: Balance,
    max_gas: &Coin,
  ) -> (Vec<Allocation>, Balance) {
    let asset = request.coin.asset;
    let gas_asset = request.chain.gas_asset();
    let reserve = if asset == max_gas.asset { max_gas.amount } else { 0 };
    let signers = if request.has_inbound() {
      Voters::<T>::get(request.in_hash).map(|v| v.signers.into_inner()).unwrap_or_default()
    } else {
      Vec::new()
    };

    let mut single_node = Vec::new();
    let mut active = Vec::new();
    let mut retiring = Vec::new();
    for vault in Vaults::<T>::iter_values() {
      match (vault.kind, vault.status) {
        (VaultKind::SingleNode, VaultStatus::Active) => {
          if vault.available(&gas_asset) > 0 &&
            signers.contains(&vault.pub_key) &&
            !T::NodeStatus::is_jailed(&vault.pub_key)
          {
            single_node.push(vault);
          }
        },
        (VaultKind::SharedNetwork, VaultStatus::Active) => active.push(vault),
        (VaultKind::SharedNetwork, VaultStatus::Retiring) => retiring.push(vault),
        _ => {},
      }
    }

    let mut allocations = Vec::new();
    let mut remaining = request.coin.amount;
    for mut tier in [single_node, active, retiring] {
      if remaining == 0 {
        break;
      }
      tier.retain(|vault| Self::can_fund(vault, request, fee, max_gas, reserve));
      T::SecurityPolicy::rank(&mut tier);
      order_by_vaults_necessary(&mut tier, &asset, remaining, reserve);
      remaining = fill(&tier, &asset, remaining, reserve, &mut allocations);
    }
    (allocations, remaining)
  }

  fn can_fund(
    vault: &Vault,
    request: &PaymentRequest,
    fee: Balance,
    max_gas: &Coin,
    reserve: Balance,
  ) -> bool {
    let available = spendable(vault, &request.coin.asset, reserve);
    if available == 0 || available <= fee {
      return false;
    }
    if vault.is_frozen(request.chain) {
      log::debug!(target: LOG_TARGET, "vault {:?} frozen on {}", vault.pub_key, request.chain);
      return false;
    }
    if T::VaultAddresses::address_of(&vault.pub_key, request.chain)
      .is_some_and(|own| own == request.to_address)
    {
      return false;
    }
    let gas = vault.available(&max_gas.asset);
    gas > 0 && gas >= max_gas.amount
  }
}
