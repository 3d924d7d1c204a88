use core::fmt;

use frame::prelude::*;
pub use primitives::{
  params, Asset, Balance, Chain, Coin, ModuleKind, OutboundMemo, Pool, TxId, VaultKey, VaultKind,
  VaultStatus,
};
use primitives::is_blank_tx_id;

pub const MAX_ADDRESS_LEN: u32 = 128;
pub const MAX_VAULT_COINS: u32 = 64;
pub const MAX_FROZEN_CHAINS: u32 = 16;
pub const MAX_SIGNERS: u32 = 128;
pub const MAX_VOTER_ACTIONS: u32 = 64;

/// Destination address on an external chain, kept as raw bytes.
pub type Address = BoundedVec<u8, ConstU32<MAX_ADDRESS_LEN>>;

pub type CoinList = BoundedVec<Coin, ConstU32<MAX_VAULT_COINS>>;

/// Lifecycle of one queued payment.
///
/// `Queued -> Due -> Dispatched -> Confirmed`, one step at a time. Native-chain transfers are
/// settled in place and recorded as `Confirmed` directly.
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
)]
pub enum OutboundStatus {
  #[default]
  Queued,
  Due,
  Dispatched,
  Confirmed,
}

impl OutboundStatus {
  pub fn can_advance_to(self, next: OutboundStatus) -> bool {
    matches!(
      (self, next),
      (OutboundStatus::Queued, OutboundStatus::Due)
        | (OutboundStatus::Due, OutboundStatus::Dispatched)
        | (OutboundStatus::Dispatched, OutboundStatus::Confirmed)
    )
  }

  /// Whether the external signer has already picked the payment up.
  pub fn is_settled(self) -> bool {
    matches!(self, OutboundStatus::Dispatched | OutboundStatus::Confirmed)
  }
}

/// One payment leaving the network.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct PaymentRequest {
  pub chain: Chain,
  pub to_address: Address,
  /// Funding vault. Set by vault selection, or pinned by the caller to bypass it.
  pub vault_pub_key: Option<VaultKey>,
  pub coin: Coin,
  pub memo: OutboundMemo,
  pub max_gas: Option<Coin>,
  pub gas_rate: u64,
  /// Originating inbound; blank for internally generated payments.
  pub in_hash: TxId,
  /// Module account funding native-chain payments.
  pub module: ModuleKind,
  pub status: OutboundStatus,
  pub out_hash: Option<TxId>,
}

impl PaymentRequest {
  pub fn new(
    chain: Chain,
    to_address: Address,
    coin: Coin,
    memo: OutboundMemo,
    in_hash: TxId,
  ) -> Self {
    Self {
      chain,
      to_address,
      vault_pub_key: None,
      coin,
      memo,
      max_gas: None,
      gas_rate: 0,
      in_hash,
      module: ModuleKind::Asgard,
      status: OutboundStatus::Queued,
      out_hash: None,
    }
  }

  pub fn is_noop(&self) -> bool {
    self.to_address.as_slice() == params::NOOP_ADDRESS
  }

  pub fn has_inbound(&self) -> bool {
    !is_blank_tx_id(&self.in_hash)
  }

  /// Whether two records describe the same transfer, ignoring gas and lifecycle fields.
  pub fn same_payment(&self, other: &PaymentRequest) -> bool {
    self.chain == other.chain &&
      self.to_address == other.to_address &&
      self.vault_pub_key == other.vault_pub_key &&
      self.coin == other.coin &&
      self.memo == other.memo &&
      self.in_hash == other.in_hash
  }
}

/// Custodial key-set and what it holds.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct Vault {
  pub pub_key: VaultKey,
  pub kind: VaultKind,
  pub status: VaultStatus,
  pub coins: CoinList,
  /// Amounts already promised to queued payments but not yet observed leaving.
  pub pending: CoinList,
  pub frozen: BoundedVec<Chain, ConstU32<MAX_FROZEN_CHAINS>>,
  pub security: Balance,
}

impl Vault {
  pub fn new(pub_key: VaultKey, kind: VaultKind, status: VaultStatus) -> Self {
    Self {
      pub_key,
      kind,
      status,
      coins: Default::default(),
      pending: Default::default(),
      frozen: Default::default(),
      security: 0,
    }
  }

  pub fn balance_of(&self, asset: &Asset) -> Balance {
    amount_of(&self.coins, asset)
  }

  pub fn pending_of(&self, asset: &Asset) -> Balance {
    amount_of(&self.pending, asset)
  }

  /// Balance not yet reserved by queued payments.
  pub fn available(&self, asset: &Asset) -> Balance {
    self.balance_of(asset).saturating_sub(self.pending_of(asset))
  }

  pub fn is_frozen(&self, chain: Chain) -> bool {
    self.frozen.contains(&chain)
  }

  pub fn credit(&mut self, coin: Coin) -> Result<(), ()> {
    add_coin(&mut self.coins, coin)
  }

  pub fn debit(&mut self, coin: Coin) {
    sub_coin(&mut self.coins, coin)
  }

  pub fn reserve(&mut self, coin: Coin) -> Result<(), ()> {
    add_coin(&mut self.pending, coin)
  }

  pub fn release(&mut self, coin: Coin) {
    sub_coin(&mut self.pending, coin)
  }
}

fn amount_of(coins: &[Coin], asset: &Asset) -> Balance {
  coins.iter().find(|c| c.asset == *asset).map(|c| c.amount).unwrap_or(0)
}

fn add_coin(coins: &mut CoinList, coin: Coin) -> Result<(), ()> {
  if coin.is_empty() {
    return Ok(());
  }
  match coins.iter_mut().find(|c| c.asset == coin.asset) {
    Some(existing) => {
      existing.amount = existing.amount.saturating_add(coin.amount);
      Ok(())
    },
    None => coins.try_push(coin).map_err(|_| ()),
  }
}

fn sub_coin(coins: &mut CoinList, coin: Coin) {
  if let Some(existing) = coins.iter_mut().find(|c| c.asset == coin.asset) {
    existing.amount = existing.amount.saturating_sub(coin.amount);
  }
  coins.retain(|c| !c.is_empty());
}

/// What the network knows about one inbound: who observed it, when its outbounds run and
/// which outbounds it produced.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct Voter<BlockNumber> {
  pub signers: BoundedVec<VaultKey, ConstU32<MAX_SIGNERS>>,
  pub outbound_height: Option<BlockNumber>,
  pub actions: BoundedVec<PaymentRequest, ConstU32<MAX_VOTER_ACTIONS>>,
  pub out_txs: BoundedVec<TxId, ConstU32<MAX_VOTER_ACTIONS>>,
}

/// Runtime-tunable thresholds, read once per admission and once per end-of-block pass.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct OutboundParameters {
  /// Native value allowed out per block before delays kick in.
  pub delay_rate: Balance,
  pub delay_max_blocks: u32,
  pub max_offset_blocks: u32,
  /// Native value one block may carry before later payments are pushed back.
  pub volume_threshold: Balance,
  pub native_outbound_fee: Balance,
  pub gas_multiplier_bps: u32,
}

impl OutboundParameters {
  pub fn is_valid(&self) -> bool {
    let window_ok = self.delay_max_blocks == 0 ||
      self.max_offset_blocks == 0 ||
      self.max_offset_blocks <= self.delay_max_blocks;
    window_ok && self.gas_multiplier_bps > 0
  }

  /// Whether payments are scheduled at the current height regardless of volume.
  pub fn throttling_disabled(&self) -> bool {
    self.volume_threshold == 0 || self.delay_rate == 0
  }
}

/// Observed transaction cost on an external chain.
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
)]
pub struct NetworkFee {
  pub transaction_size: u64,
  pub fee_rate: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdmissionOutcome<BlockNumber> {
  /// Outputs were settled on the native chain or queued at `height`.
  Scheduled { height: BlockNumber, outputs: u32 },
  /// Destination was the no-op sentinel.
  Noop,
  /// Destination was the chain's burn address; a security alert was raised instead.
  NullAddressBlocked,
}

/// Why an admission did not commit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdmissionError {
  /// The payable amount after fees fell short of the caller's minimum.
  DoesNotMeetRequirements { available: Balance, required: Balance },
  Dispatch(DispatchError),
}

impl From<DispatchError> for AdmissionError {
  fn from(error: DispatchError) -> Self {
    AdmissionError::Dispatch(error)
  }
}

impl fmt::Display for AdmissionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      // matched by substring in order-book callers
      AdmissionError::DoesNotMeetRequirements { available, required } => {
        write!(f, "outbound amount does not meet requirements ({}/{})", available, required)
      },
      AdmissionError::Dispatch(error) => write!(f, "{:?}", error),
    }
  }
}
