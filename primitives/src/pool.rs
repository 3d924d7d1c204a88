//! Liquidity pool state and the native/asset value conversions derived from it.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};

use crate::{assets::Asset, ecosystem::Balance};

/// Constant-product pool pairing the native asset with one layer-1 asset.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct Pool {
  pub asset: Asset,
  pub balance_rune: Balance,
  pub balance_asset: Balance,
}

impl Pool {
  pub fn new(asset: Asset, balance_rune: Balance, balance_asset: Balance) -> Self {
    Self { asset: asset.layer1(), balance_rune, balance_asset }
  }

  /// A pool with either side empty cannot price anything.
  pub fn is_empty(&self) -> bool {
    self.balance_rune == 0 || self.balance_asset == 0
  }

  /// Native value of `amount` units of the pool asset at the current ratio. Zero for an
  /// empty pool.
  pub fn asset_value_in_rune(&self, amount: Balance) -> Balance {
    if self.is_empty() {
      return 0;
    }
    mul_div(amount, self.balance_rune, self.balance_asset)
  }

  /// Pool-asset value of `amount` native units at the current ratio. Zero for an empty pool.
  pub fn rune_value_in_asset(&self, amount: Balance) -> Balance {
    if self.is_empty() {
      return 0;
    }
    mul_div(amount, self.balance_asset, self.balance_rune)
  }
}

/// `a * b / c` rounded down, saturating on overflow. Zero when `c` is zero.
pub fn mul_div(a: Balance, b: Balance, c: Balance) -> Balance {
  if c == 0 {
    return 0;
  }
  multiply_by_rational_with_rounding(a, b, c, Rounding::Down).unwrap_or(Balance::MAX)
}
