//! Fee engine: quote the outbound fee for a request, then charge it output by output.

extern crate alloc;

use alloc::vec::Vec;

use frame::prelude::*;
use primitives::mul_div;

use crate::{
  adapters::{GasEstimator, NativeLedger},
  types::{Asset, Balance, Coin, ModuleKind, OutboundParameters, PaymentRequest},
  Config, Error, Event, Pallet, Pools, LOG_TARGET,
};

/// Splits `fee` across outputs in proportion to their gross amounts. Rounding dust goes to the
/// first output. Never hands out more than the outputs hold in total.
pub fn apportion(fee: Balance, gross: &[Balance]) -> Vec<Balance> {
  let total = gross.iter().fold(0, |acc: Balance, g| acc.saturating_add(*g));
  if total == 0 {
    return gross.iter().map(|_| 0).collect();
  }
  let fee = fee.min(total);
  let mut shares: Vec<Balance> = gross.iter().map(|g| mul_div(fee, *g, total)).collect();
  let assigned = shares.iter().fold(0, |acc: Balance, s| acc.saturating_add(*s));
  if let Some(first) = shares.first_mut() {
    *first = first.saturating_add(fee.saturating_sub(assigned));
  }
  shares
}

impl<T: Config> Pallet<T> {
  /// Outbound fee for the whole request, in the request's asset. Zero for internal movements.
  pub fn quote_fee(
    request: &PaymentRequest,
    params: &OutboundParameters,
  ) -> Result<Balance, DispatchError> {
    if request.memo.is_fee_exempt() {
      return Ok(0);
    }
    T::GasEstimator::fee(request.chain, request.coin.asset, params)
  }

  /// Deducts `share` from `output` and books it: native fees go to the reserve, asset fees
  /// into the asset's pool with the native equivalent moved from pool to reserve.
  pub fn apply_fee(
    output: &mut PaymentRequest,
    share: Balance,
    liquidity_auction: bool,
  ) -> DispatchResult {
    let deducted = share.min(output.coin.amount);
    output.coin.amount -= deducted;
    let asset = output.coin.asset;

    let (rune_value, reserve_source) = if asset.is_rune() {
      let source = match output.module {
        ModuleKind::Bond => ModuleKind::Bond,
        _ => ModuleKind::Asgard,
      };
      Self::credit_reserve(source, deducted);
      (deducted, source)
    } else {
      let key = asset.layer1();
      let mut pool = Pools::<T>::get(key).ok_or(Error::<T>::PoolNotFound)?;
      let mut rune_fee = pool.asset_value_in_rune(deducted);
      if asset.is_synth() {
        if let Err(e) = T::Ledger::burn(ModuleKind::Asgard, Coin::new(asset, deducted)) {
          log::error!(
            target: LOG_TARGET,
            "failed to burn synth fee {} {}: {:?}",
            deducted,
            asset,
            e
          );
        }
      } else {
        pool.balance_asset = pool.balance_asset.saturating_add(deducted);
      }
      if liquidity_auction {
        rune_fee = 0;
      } else {
        rune_fee = rune_fee.min(pool.balance_rune);
        pool.balance_rune -= rune_fee;
        Self::credit_reserve(ModuleKind::Asgard, rune_fee);
      }
      Pools::<T>::insert(key, pool);
      (rune_fee, ModuleKind::Asgard)
    };

    Self::deposit_event(Event::OutboundFee {
      in_hash: output.in_hash,
      coin: Coin::new(asset, deducted),
      rune_value,
      reserve_source,
    });
    Ok(())
  }

  /// Moves native fees into the reserve. A failed transfer is logged and skipped.
  fn credit_reserve(from: ModuleKind, amount: Balance) {
    if amount == 0 {
      return;
    }
    let coin = Coin::new(Asset::rune(), amount);
    if let Err(e) = T::Ledger::transfer_to_module(from, ModuleKind::Reserve, coin) {
      log::error!(
        target: LOG_TARGET,
        "failed to credit {} to reserve from {}: {:?}",
        amount,
        from.name(),
        e
      );
    }
  }
}
