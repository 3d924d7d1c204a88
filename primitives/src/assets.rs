use core::fmt;

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::ecosystem::Balance;

/// Maximum number of bytes in an asset ticker.
pub const SYMBOL_LEN: usize = 12;

/// Blockchains the network custodies funds on.
///
/// `Thor` is the native chain: payments to it are settled by internal ledger transfers
/// instead of being signed by a vault.
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
pub enum Chain {
  #[default]
  Thor,
  Btc,
  Bch,
  Ltc,
  Doge,
  Eth,
  Bsc,
  Avax,
  Base,
  Gaia,
}

/// Canonical burn address on EVM chains.
const EVM_NULL_ADDRESS: &[u8] = b"0x0000000000000000000000000000000000000000";

impl Chain {
  /// Whether payments on this chain are settled by the local ledger.
  pub const fn is_native(self) -> bool {
    matches!(self, Chain::Thor)
  }

  /// Account-based chains keep balances per address instead of unspent outputs.
  pub const fn is_account_based(self) -> bool {
    matches!(
      self,
      Chain::Thor | Chain::Eth | Chain::Bsc | Chain::Avax | Chain::Base | Chain::Gaia
    )
  }

  /// Address that burns anything sent to it, if the chain has one.
  pub const fn null_address(self) -> Option<&'static [u8]> {
    match self {
      Chain::Eth | Chain::Bsc | Chain::Avax | Chain::Base => Some(EVM_NULL_ADDRESS),
      _ => None,
    }
  }

  /// Whether `address` is this chain's burn address. Comparison ignores ASCII case since
  /// EVM addresses are frequently checksummed.
  pub fn is_null_address(self, address: &[u8]) -> bool {
    self
      .null_address()
      .is_some_and(|null| null.eq_ignore_ascii_case(address))
  }

  /// Asset spent on transaction fees on this chain.
  pub const fn gas_asset(self) -> Asset {
    match self {
      Chain::Thor => Asset::rune(),
      Chain::Btc => Asset::new(Chain::Btc, b"BTC"),
      Chain::Bch => Asset::new(Chain::Bch, b"BCH"),
      Chain::Ltc => Asset::new(Chain::Ltc, b"LTC"),
      Chain::Doge => Asset::new(Chain::Doge, b"DOGE"),
      Chain::Eth => Asset::new(Chain::Eth, b"ETH"),
      Chain::Bsc => Asset::new(Chain::Bsc, b"BNB"),
      Chain::Avax => Asset::new(Chain::Avax, b"AVAX"),
      Chain::Base => Asset::new(Chain::Base, b"ETH"),
      Chain::Gaia => Asset::new(Chain::Gaia, b"ATOM"),
    }
  }

  pub const fn ticker(self) -> &'static str {
    match self {
      Chain::Thor => "THOR",
      Chain::Btc => "BTC",
      Chain::Bch => "BCH",
      Chain::Ltc => "LTC",
      Chain::Doge => "DOGE",
      Chain::Eth => "ETH",
      Chain::Bsc => "BSC",
      Chain::Avax => "AVAX",
      Chain::Base => "BASE",
      Chain::Gaia => "GAIA",
    }
  }
}

impl fmt::Display for Chain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.ticker())
  }
}

/// Fixed-width, zero-padded ticker.
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
pub struct Symbol(pub [u8; SYMBOL_LEN]);

impl Symbol {
  /// Builds a symbol from raw bytes, truncating anything past `SYMBOL_LEN`.
  pub const fn new(bytes: &[u8]) -> Self {
    let mut out = [0u8; SYMBOL_LEN];
    let mut i = 0;
    while i < bytes.len() && i < SYMBOL_LEN {
      out[i] = bytes[i];
      i += 1;
    }
    Symbol(out)
  }

  /// Ticker bytes without the zero padding.
  pub fn as_bytes(&self) -> &[u8] {
    let end = self.0.iter().position(|b| *b == 0).unwrap_or(SYMBOL_LEN);
    &self.0[..end]
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match core::str::from_utf8(self.as_bytes()) {
      Ok(s) => f.write_str(s),
      Err(_) => write!(f, "{:?}", self.as_bytes()),
    }
  }
}

/// How the asset is held.
///
/// - `Layer1`: the real asset on its home chain.
/// - `Synth`: a synthetic claim living on the native chain, backed by pool liquidity.
/// - `Trade`: a trade-account balance on the native chain.
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
pub enum AssetClass {
  #[default]
  Layer1,
  Synth,
  Trade,
}

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
pub struct Asset {
  pub chain: Chain,
  pub symbol: Symbol,
  pub class: AssetClass,
}

impl Asset {
  pub const fn new(chain: Chain, symbol: &[u8]) -> Self {
    Self { chain, symbol: Symbol::new(symbol), class: AssetClass::Layer1 }
  }

  /// The native asset.
  pub const fn rune() -> Self {
    Self::new(Chain::Thor, b"RUNE")
  }

  pub const fn synth(self) -> Self {
    Self { class: AssetClass::Synth, ..self }
  }

  pub const fn trade(self) -> Self {
    Self { class: AssetClass::Trade, ..self }
  }

  /// The layer-1 asset a synth or trade asset is backed by.
  pub const fn layer1(self) -> Self {
    Self { class: AssetClass::Layer1, ..self }
  }

  pub fn is_rune(&self) -> bool {
    *self == Self::rune()
  }

  pub const fn is_synth(&self) -> bool {
    matches!(self.class, AssetClass::Synth)
  }

  pub const fn is_trade(&self) -> bool {
    matches!(self.class, AssetClass::Trade)
  }

  /// Whether this is the gas asset of its own chain.
  pub fn is_gas_asset(&self) -> bool {
    *self == self.chain.gas_asset()
  }

  /// Chain a payment of this asset is settled on. Synths, trade balances and the native
  /// asset all live on the native chain.
  pub fn outbound_chain(&self) -> Chain {
    if self.is_synth() || self.is_trade() || self.is_rune() { Chain::Thor } else { self.chain }
  }
}

impl fmt::Display for Asset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let separator = match self.class {
      AssetClass::Layer1 => '.',
      AssetClass::Synth => '/',
      AssetClass::Trade => '~',
    };
    write!(f, "{}{}{}", self.chain, separator, self.symbol)
  }
}

/// An amount of one asset.
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
pub struct Coin {
  pub asset: Asset,
  pub amount: Balance,
}

impl Coin {
  pub const fn new(asset: Asset, amount: Balance) -> Self {
    Self { asset, amount }
  }

  pub const fn is_empty(&self) -> bool {
    self.amount == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gas_assets_belong_to_their_chain() {
    for chain in [
      Chain::Thor,
      Chain::Btc,
      Chain::Bch,
      Chain::Ltc,
      Chain::Doge,
      Chain::Eth,
      Chain::Bsc,
      Chain::Avax,
      Chain::Base,
      Chain::Gaia,
    ] {
      let gas = chain.gas_asset();
      assert_eq!(gas.chain, chain);
      assert!(gas.is_gas_asset());
    }
    assert!(Chain::Thor.gas_asset().is_rune());
  }

  #[test]
  fn derived_assets_settle_on_native_chain() {
    let usdt = Asset::new(Chain::Eth, b"USDT");
    assert_eq!(usdt.outbound_chain(), Chain::Eth);
    assert_eq!(usdt.synth().outbound_chain(), Chain::Thor);
    assert_eq!(usdt.trade().outbound_chain(), Chain::Thor);
    assert_eq!(usdt.synth().layer1(), usdt);
    assert!(!usdt.is_gas_asset());
    assert!(!Chain::Eth.gas_asset().synth().is_gas_asset());
  }

  #[test]
  fn null_address_only_on_evm_chains() {
    assert!(Chain::Eth.is_null_address(b"0x0000000000000000000000000000000000000000"));
    assert!(Chain::Base.is_null_address(b"0X0000000000000000000000000000000000000000"));
    assert!(!Chain::Eth.is_null_address(b"0x0000000000000000000000000000000000000001"));
    assert!(!Chain::Btc.is_null_address(b"0x0000000000000000000000000000000000000000"));
    assert!(Chain::Gaia.is_account_based());
    assert!(!Chain::Btc.is_account_based());
  }

  #[test]
  fn symbol_truncates_and_trims_padding() {
    let long = Symbol::new(b"ABCDEFGHIJKLMNOP");
    assert_eq!(long.as_bytes(), b"ABCDEFGHIJKL");
    assert_eq!(Symbol::new(b"BTC").as_bytes(), b"BTC");
  }

  #[test]
  fn asset_display_marks_class() {
    let usdt = Asset::new(Chain::Eth, b"USDT");
    assert_eq!(format!("{}", usdt), "ETH.USDT");
    assert_eq!(format!("{}", usdt.synth()), "ETH/USDT");
    assert_eq!(format!("{}", usdt.trade()), "ETH~USDT");
  }
}
