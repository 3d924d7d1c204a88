//! Ecosystem constants for the outbound scheduler.
//!
//! Module account identities and the default economic parameters the scheduler falls back
//! to when governance has not overridden them.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Balance type alias for consistency across the ecosystem
pub type Balance = u128;

/// Internal module accounts holding native-chain funds.
///
/// - `Asgard`: custody of native assets backing the shared vaults.
/// - `Bond`: node operator bonds.
/// - `Reserve`: protocol reserve receiving outbound fees.
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
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum ModuleKind {
  #[default]
  Asgard,
  Bond,
  Reserve,
}

impl ModuleKind {
  pub const fn name(self) -> &'static str {
    match self {
      ModuleKind::Asgard => "asgard",
      ModuleKind::Bond => "bond",
      ModuleKind::Reserve => "reserve",
    }
  }
}

/// Ecosystem parameters. Amounts are in base units of 10^-8.
pub mod params {
  use super::Balance;

  /// One whole unit of any asset (10^8 base units).
  pub const ONE: Balance = 100_000_000;

  /// Denominator for basis-point multipliers.
  pub const BPS_DENOMINATOR: u32 = 10_000;

  /// Native value that may leave per block before delays grow (25 RUNE).
  pub const DEFAULT_DELAY_RATE: Balance = 25 * ONE;

  /// Hard cap on how far ahead of the current block a payment is scheduled.
  pub const DEFAULT_DELAY_MAX_BLOCKS: u32 = 17_280;

  /// Cap on the minimum delay derived from the payment's own value.
  pub const DEFAULT_MAX_OFFSET_BLOCKS: u32 = 720;

  /// Native value already scheduled for a block beyond which new payments move later.
  pub const DEFAULT_VOLUME_THRESHOLD: Balance = 1_000 * ONE;

  /// Floor for the outbound fee, denominated in the native asset (0.02 RUNE).
  pub const DEFAULT_NATIVE_OUTBOUND_FEE: Balance = 2_000_000;

  /// Multiplier applied to gas estimates, in basis points (1.5x).
  pub const DEFAULT_GAS_MULTIPLIER_BPS: u32 = 15_000;

  /// Destination that discards a payment entirely.
  pub const NOOP_ADDRESS: &[u8] = b"noop";
}

#[cfg(test)]
mod tests {
  use super::params::*;

  #[test]
  fn congestion_defaults_are_consistent() {
    assert!(DEFAULT_MAX_OFFSET_BLOCKS <= DEFAULT_DELAY_MAX_BLOCKS);
    assert!(DEFAULT_VOLUME_THRESHOLD > DEFAULT_DELAY_RATE);
    assert!(DEFAULT_GAS_MULTIPLIER_BPS >= BPS_DENOMINATOR);
  }
}
