//! Gas estimates derived from observed network fees.

use core::marker::PhantomData;

use frame::prelude::*;
use primitives::{mul_div, params::BPS_DENOMINATOR};

use crate::{
  adapters::GasEstimator,
  types::{Asset, Balance, Chain, Coin, OutboundParameters},
  Config, Error, NetworkFees, Pools,
};

/// Estimates gas from the per-chain fees observers report through `set_network_fee`, scaled
/// by the configured gas multiplier.
///
/// The outbound fee is the larger of the native floor and the max gas valued in the native
/// asset, then converted into the paid asset through its pool.
pub struct NetworkFeeEstimator<T>(PhantomData<T>);

impl<T: Config> NetworkFeeEstimator<T> {
  fn scaled(amount: Balance, params: &OutboundParameters) -> Balance {
    mul_div(amount, Balance::from(params.gas_multiplier_bps), Balance::from(BPS_DENOMINATOR))
  }

  fn gas_in_rune(chain: Chain, params: &OutboundParameters) -> Result<Balance, DispatchError> {
    if chain.is_native() {
      return Ok(0);
    }
    let max_gas = Self::max_gas(chain, params)?;
    let pool = Pools::<T>::get(max_gas.asset).ok_or(Error::<T>::PoolNotFound)?;
    Ok(pool.asset_value_in_rune(max_gas.amount))
  }
}

impl<T: Config> GasEstimator for NetworkFeeEstimator<T> {
  fn fee(
    chain: Chain,
    asset: Asset,
    params: &OutboundParameters,
  ) -> Result<Balance, DispatchError> {
    let rune_fee = params.native_outbound_fee.max(Self::gas_in_rune(chain, params)?);
    if asset.is_rune() {
      return Ok(rune_fee);
    }
    let pool = Pools::<T>::get(asset.layer1()).ok_or(Error::<T>::PoolNotFound)?;
    Ok(pool.rune_value_in_asset(rune_fee))
  }

  fn max_gas(chain: Chain, params: &OutboundParameters) -> Result<Coin, DispatchError> {
    let gas_asset = chain.gas_asset();
    if chain.is_native() {
      return Ok(Coin::new(gas_asset, params.native_outbound_fee));
    }
    let fee = NetworkFees::<T>::get(chain).ok_or(Error::<T>::NetworkFeeNotFound)?;
    let raw = Balance::from(fee.transaction_size).saturating_mul(Balance::from(fee.fee_rate));
    Ok(Coin::new(gas_asset, Self::scaled(raw, params)))
  }

  fn gas_rate(chain: Chain, params: &OutboundParameters) -> Result<u64, DispatchError> {
    if chain.is_native() {
      return Ok(0);
    }
    let fee = NetworkFees::<T>::get(chain).ok_or(Error::<T>::NetworkFeeNotFound)?;
    let rate = Self::scaled(Balance::from(fee.fee_rate), params);
    Ok(u64::try_from(rate).unwrap_or(u64::MAX))
  }
}
