//! Block dispatcher and end-of-block maintenance of the outbound queue.

extern crate alloc;

use alloc::{collections::BTreeMap, vec::Vec};

use frame::prelude::*;

use crate::{
  adapters::{GasEstimator, NativeLedger},
  types::{Balance, Chain, Coin, OutboundStatus, PaymentRequest, TxId},
  Config, Error, Event, Pallet, Parameters, ScheduledOutbounds, ScheduledValue, Vaults, Voters,
  LOG_TARGET,
};

impl<T: Config> Pallet<T> {
  /// Settles a native-chain output on the spot, or appends any other output to the block at
  /// `height` and reserves it in its vault.
  pub fn dispatch_output(mut output: PaymentRequest, height: BlockNumberFor<T>) -> DispatchResult {
    if output.chain.is_native() {
      Self::settle_native(&output)?;
      output.status = OutboundStatus::Confirmed;
      Self::deposit_event(Event::NativeOutboundExecuted {
        in_hash: output.in_hash,
        to_address: output.to_address.clone(),
        coin: output.coin,
      });
    } else {
      output.status = OutboundStatus::Queued;
      if let Some(key) = output.vault_pub_key {
        Vaults::<T>::try_mutate(key, |maybe| -> DispatchResult {
          let vault = maybe.as_mut().ok_or(Error::<T>::VaultNotFound)?;
          vault.reserve(output.coin).map_err(|_| Error::<T>::TooManyVaultCoins)?;
          Ok(())
        })?;
      }
      // pool-less assets add nothing to the throttle window
      let value = Self::rune_value(&output.coin).unwrap_or(0);
      let index =
        ScheduledOutbounds::<T>::try_mutate(height, |items| -> Result<u32, DispatchError> {
          items.try_push(output.clone()).map_err(|_| Error::<T>::ScheduledBlockFull)?;
          Ok(items.len().saturating_sub(1) as u32)
        })?;
      ScheduledValue::<T>::mutate(height, |v| *v = v.saturating_add(value));
      Self::deposit_event(Event::OutboundScheduled {
        height,
        index,
        in_hash: output.in_hash,
        chain: output.chain,
        vault: output.vault_pub_key,
        coin: output.coin,
      });
    }
    Self::record_action(output)
  }

  fn settle_native(output: &PaymentRequest) -> DispatchResult {
    let from = output.module;
    let to = output.to_address.as_slice();
    if let Some(module) = T::Ledger::module_by_address(to) {
      T::Ledger::transfer_to_module(from, module, output.coin)
    } else if output.coin.asset.is_trade() {
      T::Ledger::credit_trade_account(from, to, output.coin)
    } else {
      T::Ledger::transfer_to_address(from, to, output.coin)
    }
  }

  fn record_action(output: PaymentRequest) -> DispatchResult {
    if !output.has_inbound() {
      return Ok(());
    }
    Voters::<T>::try_mutate(output.in_hash, |maybe| -> DispatchResult {
      let voter = maybe.get_or_insert_with(Default::default);
      voter.actions.try_push(output).map_err(|_| Error::<T>::TooManyVoterActions)?;
      Ok(())
    })
  }

  /// Refreshes gas estimates of the payments due at `now` and marks them due.
  ///
  /// Every unsettled payment at `now` becomes due. Max gas only ever goes up; the gas rate is
  /// always overwritten. Gas is kept as-is for payments whose inbound was scheduled for an
  /// earlier height and for chains without an estimate. Returns how many payments became due
  /// or were already due.
  pub fn end_block(now: BlockNumberFor<T>) -> u32 {
    let mut items = ScheduledOutbounds::<T>::get(now);
    if items.is_empty() {
      return 0;
    }
    let params = Parameters::<T>::get();
    let mut estimates: BTreeMap<Chain, Option<(Coin, u64)>> = BTreeMap::new();
    let mut touched = 0u32;

    for item in items.iter_mut() {
      if item.status.is_settled() {
        continue;
      }
      if item.status.can_advance_to(OutboundStatus::Due) {
        item.status = OutboundStatus::Due;
      }
      touched += 1;

      let mut voter = if item.has_inbound() { Voters::<T>::get(item.in_hash) } else { None };
      if voter.as_ref().and_then(|v| v.outbound_height).is_some_and(|h| h < now) {
        continue;
      }

      let chain = item.chain;
      let estimate = *estimates.entry(chain).or_insert_with(|| {
        let max_gas = T::GasEstimator::max_gas(chain, &params);
        let gas_rate = T::GasEstimator::gas_rate(chain, &params);
        match (max_gas, gas_rate) {
          (Ok(max_gas), Ok(gas_rate)) => Some((max_gas, gas_rate)),
          (Err(e), _) | (_, Err(e)) => {
            log::error!(target: LOG_TARGET, "no gas estimate for {}: {:?}", chain, e);
            None
          },
        }
      });
      let Some((max_gas, gas_rate)) = estimate else { continue };

      let previous = item.clone();
      let raise = item.max_gas.is_none_or(|current| max_gas.amount > current.amount);
      if raise {
        item.max_gas = Some(max_gas);
      }
      item.gas_rate = gas_rate;
      if let Some(voter) = voter.as_mut() {
        if let Some(action) = voter.actions.iter_mut().find(|a| a.same_payment(&previous)) {
          if raise {
            action.max_gas = Some(max_gas);
          }
          action.gas_rate = gas_rate;
        }
        Voters::<T>::insert(item.in_hash, &*voter);
      }
    }

    log::debug!(target: LOG_TARGET, "{} outbound(s) due at {:?}", touched, now);
    ScheduledOutbounds::<T>::insert(now, items);
    touched
  }

  pub fn outbound_items(height: BlockNumberFor<T>) -> Vec<PaymentRequest> {
    ScheduledOutbounds::<T>::get(height).into_inner()
  }

  pub fn outbound_items_to(height: BlockNumberFor<T>, address: &[u8]) -> Vec<PaymentRequest> {
    ScheduledOutbounds::<T>::get(height)
      .into_iter()
      .filter(|item| item.to_address.as_slice() == address)
      .collect()
  }

  /// Drops the block at `height`, releasing vault reservations of anything not yet confirmed.
  pub fn clear_outbound_items(height: BlockNumberFor<T>) {
    for item in ScheduledOutbounds::<T>::take(height) {
      if item.status == OutboundStatus::Confirmed {
        continue;
      }
      if let Some(key) = item.vault_pub_key {
        Vaults::<T>::mutate_exists(key, |maybe| {
          if let Some(vault) = maybe.as_mut() {
            vault.release(item.coin);
          }
        });
      }
    }
    ScheduledValue::<T>::remove(height);
  }

  pub(crate) fn advance_item(
    height: BlockNumberFor<T>,
    index: u32,
    next: OutboundStatus,
  ) -> Result<PaymentRequest, DispatchError> {
    ScheduledOutbounds::<T>::try_mutate(height, |items| -> Result<PaymentRequest, DispatchError> {
      let item = items.get_mut(index as usize).ok_or(Error::<T>::OutboundNotFound)?;
      ensure!(item.status.can_advance_to(next), Error::<T>::InvalidStatusTransition);
      item.status = next;
      Ok(item.clone())
    })
  }

  /// Books an observed outbound: releases the reservation and debits what actually left.
  pub(crate) fn settle_confirmed(
    item: &PaymentRequest,
    out_hash: TxId,
    gas_used: Balance,
  ) -> DispatchResult {
    if let Some(key) = item.vault_pub_key {
      Vaults::<T>::try_mutate(key, |maybe| -> DispatchResult {
        let vault = maybe.as_mut().ok_or(Error::<T>::VaultNotFound)?;
        vault.release(item.coin);
        vault.debit(item.coin);
        vault.debit(Coin::new(item.chain.gas_asset(), gas_used));
        Ok(())
      })?;
    }
    if item.has_inbound() {
      Voters::<T>::try_mutate(item.in_hash, |maybe| -> DispatchResult {
        let voter = maybe.get_or_insert_with(Default::default);
        voter.out_txs.try_push(out_hash).map_err(|_| Error::<T>::TooManyVoterActions)?;
        Ok(())
      })?;
    }
    Ok(())
  }
}
