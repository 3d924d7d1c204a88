//! Congestion scheduler: throttles how much native value leaves per block by pushing new
//! payments further out as the schedule fills up.

use frame::prelude::*;
use polkadot_sdk::sp_runtime::traits::{One, Saturating};

use crate::{
  types::{Balance, Coin, OutboundParameters, PaymentRequest},
  Config, Error, Pallet, Pools, ScheduledValue,
};

impl<T: Config> Pallet<T> {
  /// Native value of `coin` through its pool.
  pub fn rune_value(coin: &Coin) -> Result<Balance, DispatchError> {
    if coin.asset.is_rune() {
      return Ok(coin.amount);
    }
    let pool = Pools::<T>::get(coin.asset.layer1()).ok_or(Error::<T>::PoolNotFound)?;
    Ok(pool.asset_value_in_rune(coin.amount))
  }

  /// Height `request` may execute at, with its native value.
  ///
  /// Reads only the schedule and the pools, so identical state gives an identical answer.
  pub fn target_height(
    request: &PaymentRequest,
    params: &OutboundParameters,
  ) -> Result<(BlockNumberFor<T>, Balance), DispatchError> {
    let now = frame_system::Pallet::<T>::block_number();
    let value = Self::rune_value(&request.coin)?;
    if !request.memo.is_delayable() || params.throttling_disabled() {
      return Ok((now, value));
    }

    let offset = BlockNumberFor::<T>::from(params.max_offset_blocks);
    let horizon = now.saturating_add(offset);
    let mut sum = value;
    let mut height = now;
    for _ in 0..params.delay_max_blocks {
      height = height.saturating_add(One::one());
      let scheduled = ScheduledValue::<T>::get(height);
      // past the offset an empty block means the rest of the window is empty too
      if height > horizon && scheduled == 0 {
        break;
      }
      sum = sum.saturating_add(scheduled);
    }

    let rate = params.delay_rate.saturating_sub(sum / params.volume_threshold).max(1);
    let min_blocks = (value / rate).min(Balance::from(params.max_offset_blocks));
    // bounded by max_offset_blocks, which is a u32
    let mut target = now.saturating_add(BlockNumberFor::<T>::from(min_blocks as u32));

    for _ in 0..params.delay_max_blocks {
      let scheduled = ScheduledValue::<T>::get(target);
      if scheduled == 0 || scheduled.saturating_add(value) <= params.volume_threshold {
        break;
      }
      target = target.saturating_add(One::one());
    }
    Ok((target, value))
  }
}
