extern crate alloc;

use crate as pallet_outbound_scheduler;
use crate::{
  AffiliateFeeSkimmer, BySecurityScore, GasEstimator, NativeLedger, NetworkState, NodeStatus,
  VaultAddressing,
  types::{
    params, Address, Asset, Balance, Chain, Coin, ModuleKind, OutboundMemo, OutboundParameters,
    PaymentRequest, Pool, TxId, Vault, VaultKey, VaultKind, VaultStatus,
  },
};
use alloc::vec::Vec;
use codec::Encode;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, ensure,
  storage::unhashed,
  traits::{ConstU32, ConstU128},
};
use polkadot_sdk::frame_system::{self, EnsureRoot, EnsureSigned};
use polkadot_sdk::sp_runtime::{BuildStorage, DispatchError, DispatchResult, traits::IdentityLookup};
use std::cell::RefCell;
use std::collections::BTreeSet;

type Block = frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;

pub const OBSERVER: AccountId = 1;
pub const ASGARD_FUNDS: Balance = 1_000_000_000;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Outbound: pallet_outbound_scheduler,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
}

impl pallet_outbound_scheduler::Config for Test {
  type AdminOrigin = EnsureRoot<AccountId>;
  type ObserverOrigin = EnsureSigned<AccountId>;
  type HandlerOrigin = EnsureRoot<AccountId>;
  type GasEstimator = MockGas;
  type AffiliateFees = MockAffiliate;
  type Ledger = MockLedger;
  type SecurityPolicy = BySecurityScore;
  type NodeStatus = MockNodes;
  type NetworkState = MockNetwork;
  type VaultAddresses = MockAddresses;
  type MaxOutboundsPerBlock = ConstU32<16>;
  type DefaultDelayRate = ConstU128<{ params::DEFAULT_DELAY_RATE }>;
  type DefaultDelayMaxBlocks = ConstU32<{ params::DEFAULT_DELAY_MAX_BLOCKS }>;
  type DefaultMaxOffsetBlocks = ConstU32<{ params::DEFAULT_MAX_OFFSET_BLOCKS }>;
  type DefaultVolumeThreshold = ConstU128<{ params::DEFAULT_VOLUME_THRESHOLD }>;
  type DefaultNativeOutboundFee = ConstU128<{ params::DEFAULT_NATIVE_OUTBOUND_FEE }>;
  type DefaultGasMultiplier = ConstU32<{ params::DEFAULT_GAS_MULTIPLIER_BPS }>;
  type WeightInfo = ();
}

// Stateful collaborators. Anything that must roll back with a failed admission lives in
// unhashed storage; the rest is read-only configuration kept in thread-locals.
thread_local! {
    static FEE: RefCell<Balance> = const { RefCell::new(1) };
    static MAX_GAS: RefCell<Balance> = const { RefCell::new(10) };
    static GAS_RATE: RefCell<u64> = const { RefCell::new(5) };
    static AFFILIATE_SKIM: RefCell<Balance> = const { RefCell::new(0) };
    static JAILED: RefCell<BTreeSet<VaultKey>> = const { RefCell::new(BTreeSet::new()) };
    static RAGNAROK: RefCell<bool> = const { RefCell::new(false) };
    static LIQUIDITY_AUCTION: RefCell<bool> = const { RefCell::new(false) };
    static GAS_UNAVAILABLE: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_fee(fee: Balance) {
  FEE.with(|f| *f.borrow_mut() = fee);
}

pub fn set_max_gas(amount: Balance) {
  MAX_GAS.with(|g| *g.borrow_mut() = amount);
}

pub fn set_gas_rate(rate: u64) {
  GAS_RATE.with(|g| *g.borrow_mut() = rate);
}

pub fn set_affiliate_skim(amount: Balance) {
  AFFILIATE_SKIM.with(|s| *s.borrow_mut() = amount);
}

pub fn set_jailed(node: VaultKey) {
  JAILED.with(|j| j.borrow_mut().insert(node));
}

pub fn set_ragnarok(active: bool) {
  RAGNAROK.with(|r| *r.borrow_mut() = active);
}

pub fn set_liquidity_auction(active: bool) {
  LIQUIDITY_AUCTION.with(|l| *l.borrow_mut() = active);
}

pub fn set_gas_unavailable(unavailable: bool) {
  GAS_UNAVAILABLE.with(|g| *g.borrow_mut() = unavailable);
}

fn gas_unavailable() -> Result<(), DispatchError> {
  ensure!(!GAS_UNAVAILABLE.with(|g| *g.borrow()), DispatchError::Other("no gas estimate"));
  Ok(())
}

fn reset_mocks() {
  set_fee(1);
  set_max_gas(10);
  set_gas_rate(5);
  set_affiliate_skim(0);
  JAILED.with(|j| j.borrow_mut().clear());
  set_ragnarok(false);
  set_liquidity_auction(false);
  set_gas_unavailable(false);
}

/// Flat fee in whatever asset is paid, fixed max gas and rate for every chain. Gas estimates
/// fail while `set_gas_unavailable(true)` is in effect.
pub struct MockGas;
impl GasEstimator for MockGas {
  fn fee(_: Chain, _: Asset, _: &OutboundParameters) -> Result<Balance, DispatchError> {
    Ok(FEE.with(|f| *f.borrow()))
  }

  fn max_gas(chain: Chain, _: &OutboundParameters) -> Result<Coin, DispatchError> {
    gas_unavailable()?;
    Ok(Coin::new(chain.gas_asset(), MAX_GAS.with(|g| *g.borrow())))
  }

  fn gas_rate(_: Chain, _: &OutboundParameters) -> Result<u64, DispatchError> {
    gas_unavailable()?;
    Ok(GAS_RATE.with(|g| *g.borrow()))
  }
}

pub struct MockAffiliate;
impl AffiliateFeeSkimmer for MockAffiliate {
  fn skim(_: &TxId, _: &Coin, _: &OutboundMemo) -> Result<Balance, DispatchError> {
    Ok(AFFILIATE_SKIM.with(|s| *s.borrow()))
  }
}

pub struct MockNodes;
impl NodeStatus for MockNodes {
  fn is_jailed(node: &VaultKey) -> bool {
    JAILED.with(|j| j.borrow().contains(node))
  }
}

pub struct MockNetwork;
impl NetworkState for MockNetwork {
  fn ragnarok_in_progress() -> bool {
    RAGNAROK.with(|r| *r.borrow())
  }

  fn liquidity_auction_active() -> bool {
    LIQUIDITY_AUCTION.with(|l| *l.borrow())
  }
}

/// Every vault sends from `vault:<first key byte>` on every chain.
pub struct MockAddresses;
impl VaultAddressing for MockAddresses {
  fn address_of(vault: &VaultKey, _: Chain) -> Option<Address> {
    Some(vault_address(vault))
  }
}

pub fn vault_address(vault: &VaultKey) -> Address {
  addr(&[b"vault:".as_slice(), &vault[..1]].concat())
}

#[derive(Clone, Debug, Encode)]
pub enum Holder {
  Module(ModuleKind),
  Account(Vec<u8>),
  Trade(Vec<u8>),
}

pub const ASGARD_ADDRESS: &[u8] = b"thor-asgard";
pub const BOND_ADDRESS: &[u8] = b"thor-bond";
pub const RESERVE_ADDRESS: &[u8] = b"thor-reserve";

fn ledger_key(holder: &Holder, asset: &Asset) -> Vec<u8> {
  (b"mock/ledger", holder, asset).encode()
}

fn burned_key(asset: &Asset) -> Vec<u8> {
  (b"mock/burned", asset).encode()
}

pub fn ledger_balance(holder: Holder, asset: Asset) -> Balance {
  unhashed::get_or_default(&ledger_key(&holder, &asset))
}

pub fn set_ledger_balance(holder: Holder, asset: Asset, amount: Balance) {
  unhashed::put(&ledger_key(&holder, &asset), &amount);
}

pub fn burned(asset: Asset) -> Balance {
  unhashed::get_or_default(&burned_key(&asset))
}

fn debit(holder: Holder, coin: Coin) -> DispatchResult {
  let balance = ledger_balance(holder.clone(), coin.asset);
  ensure!(balance >= coin.amount, DispatchError::Other("insufficient ledger balance"));
  set_ledger_balance(holder, coin.asset, balance - coin.amount);
  Ok(())
}

fn credit(holder: Holder, coin: Coin) {
  let balance = ledger_balance(holder.clone(), coin.asset);
  set_ledger_balance(holder, coin.asset, balance + coin.amount);
}

/// Native ledger kept in unhashed storage so it rolls back with the admission overlay.
pub struct MockLedger;
impl NativeLedger for MockLedger {
  fn module_by_address(address: &[u8]) -> Option<ModuleKind> {
    match address {
      ASGARD_ADDRESS => Some(ModuleKind::Asgard),
      BOND_ADDRESS => Some(ModuleKind::Bond),
      RESERVE_ADDRESS => Some(ModuleKind::Reserve),
      _ => None,
    }
  }

  fn transfer_to_module(from: ModuleKind, to: ModuleKind, coin: Coin) -> DispatchResult {
    debit(Holder::Module(from), coin)?;
    credit(Holder::Module(to), coin);
    Ok(())
  }

  fn transfer_to_address(from: ModuleKind, to: &[u8], coin: Coin) -> DispatchResult {
    debit(Holder::Module(from), coin)?;
    credit(Holder::Account(to.to_vec()), coin);
    Ok(())
  }

  fn burn(from: ModuleKind, coin: Coin) -> DispatchResult {
    debit(Holder::Module(from), coin)?;
    let total = burned(coin.asset);
    unhashed::put(&burned_key(&coin.asset), &(total + coin.amount));
    Ok(())
  }

  fn credit_trade_account(from: ModuleKind, to: &[u8], coin: Coin) -> DispatchResult {
    debit(Holder::Module(from), coin)?;
    credit(Holder::Trade(to.to_vec()), coin);
    Ok(())
  }
}

pub fn rune() -> Asset {
  Asset::rune()
}

pub fn eth() -> Asset {
  Chain::Eth.gas_asset()
}

pub fn usdt() -> Asset {
  Asset::new(Chain::Eth, b"USDT")
}

pub fn addr(bytes: &[u8]) -> Address {
  Address::truncate_from(bytes.to_vec())
}

pub fn tx(n: u8) -> TxId {
  [n; 32]
}

pub fn key(n: u8) -> VaultKey {
  [n; 32]
}

/// A swap payout of `amount` USDT to `to` for inbound `tx(n)`.
pub fn usdt_payment(to: &[u8], amount: Balance, n: u8) -> PaymentRequest {
  PaymentRequest::new(
    Chain::Eth,
    addr(to),
    Coin::new(usdt(), amount),
    OutboundMemo::Outbound { in_hash: tx(n) },
    tx(n),
  )
}

pub fn put_vault(
  n: u8,
  kind: VaultKind,
  status: VaultStatus,
  security: Balance,
  coins: &[(Asset, Balance)],
) -> VaultKey {
  let mut vault = Vault::new(key(n), kind, status);
  vault.security = security;
  for (asset, amount) in coins {
    vault.credit(Coin::new(*asset, *amount)).unwrap();
  }
  crate::Vaults::<Test>::insert(key(n), vault);
  key(n)
}

/// Active shared vault holding `usdt` and plenty of gas.
pub fn asgard(n: u8, security: Balance, usdt_amount: Balance) -> VaultKey {
  put_vault(
    n,
    VaultKind::SharedNetwork,
    VaultStatus::Active,
    security,
    &[(usdt(), usdt_amount), (eth(), 1_000)],
  )
}

pub fn vault(key: VaultKey) -> Vault {
  crate::Vaults::<Test>::get(key).unwrap()
}

pub fn pool(asset: Asset) -> Pool {
  crate::Pools::<Test>::get(asset).unwrap()
}

pub fn outbound_events() -> Vec<crate::Event<Test>> {
  System::events()
    .into_iter()
    .filter_map(|r| match r.event {
      RuntimeEvent::Outbound(e) => Some(e),
      _ => None,
    })
    .collect()
}

pub fn genesis_pools() -> Vec<Pool> {
  alloc::vec![
    Pool::new(usdt(), 1_000_000, 1_000_000),
    Pool::new(eth(), 2_000_000, 1_000_000),
    Pool::new(Chain::Btc.gas_asset(), 5_000_000, 100_000),
  ]
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  new_test_ext_with_vaults(Vec::new())
}

pub fn new_test_ext_with_vaults(
  vaults: Vec<(VaultKey, VaultKind, VaultStatus, Balance, Vec<Coin>)>,
) -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_outbound_scheduler::GenesisConfig::<Test> {
    pools: genesis_pools(),
    vaults,
    _marker: Default::default(),
  }
  .assimilate_storage(&mut t)
  .unwrap();

  reset_mocks();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| {
    System::set_block_number(1);
    set_ledger_balance(Holder::Module(ModuleKind::Asgard), rune(), ASGARD_FUNDS);
  });
  ext
}
