//! Outbound Scheduler Pallet
//!
//! Decides, for every payment the network sends to an external chain, which vaults fund it,
//! what fee it pays and at which block it may leave.
//!
//! A payment enters through [`Pallet::try_add_outbound`] (or the `request_outbound` call),
//! which runs inside a scoped storage overlay:
//!
//! 1. no-op and burn-address destinations short-circuit;
//! 2. affiliate fees are skimmed from swap payouts;
//! 3. the outbound fee is quoted, vaults are selected and each output is charged its share;
//! 4. the congestion scheduler picks an execution height, reused for every later output of
//!    the same inbound;
//! 5. outputs are settled on the native chain or appended to the per-height queue.
//!
//! Any failure discards every write and event of the attempt. At the end of each block the
//! payments due at that height get fresh gas estimates before the external signer picks them
//! up.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{
  AffiliateFeeSkimmer, BySecurityScore, GasEstimator, NativeLedger, NetworkState, NodeStatus,
  OutboundQueue, SecurityPolicy, VaultAddressing,
};

pub mod types;
pub use types::*;

pub mod admission;
pub mod congestion;
pub mod dispatch;
pub mod fees;
pub mod gas;
pub use gas::NetworkFeeEstimator;
pub mod scoped;
pub mod selection;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::outbound-scheduler";

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::prelude::*;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Origin allowed to tune parameters, vaults, pools and the deny-list
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Origin reporting what happened on external chains
    type ObserverOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Origin allowed to submit payments through `request_outbound`
    type HandlerOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    type GasEstimator: GasEstimator;

    type AffiliateFees: AffiliateFeeSkimmer;

    type Ledger: NativeLedger;

    /// Ranking applied to candidate vaults before selection
    type SecurityPolicy: SecurityPolicy;

    type NodeStatus: NodeStatus;

    type NetworkState: NetworkState;

    type VaultAddresses: VaultAddressing;

    /// Upper bound on payments queued for one height
    #[pallet::constant]
    type MaxOutboundsPerBlock: Get<u32>;

    #[pallet::constant]
    type DefaultDelayRate: Get<Balance>;

    #[pallet::constant]
    type DefaultDelayMaxBlocks: Get<u32>;

    #[pallet::constant]
    type DefaultMaxOffsetBlocks: Get<u32>;

    #[pallet::constant]
    type DefaultVolumeThreshold: Get<Balance>;

    #[pallet::constant]
    type DefaultNativeOutboundFee: Get<Balance>;

    /// Gas multiplier in basis points
    #[pallet::constant]
    type DefaultGasMultiplier: Get<u32>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::type_value]
  pub fn DefaultParameters<T: Config>() -> OutboundParameters {
    OutboundParameters {
      delay_rate: T::DefaultDelayRate::get(),
      delay_max_blocks: T::DefaultDelayMaxBlocks::get(),
      max_offset_blocks: T::DefaultMaxOffsetBlocks::get(),
      volume_threshold: T::DefaultVolumeThreshold::get(),
      native_outbound_fee: T::DefaultNativeOutboundFee::get(),
      gas_multiplier_bps: T::DefaultGasMultiplier::get(),
    }
  }

  /// Payments queued per execution height
  #[pallet::storage]
  pub type ScheduledOutbounds<T: Config> = StorageMap<
    _,
    Twox64Concat,
    BlockNumberFor<T>,
    BoundedVec<PaymentRequest, T::MaxOutboundsPerBlock>,
    ValueQuery,
  >;

  /// Native value already queued per execution height
  #[pallet::storage]
  pub type ScheduledValue<T: Config> =
    StorageMap<_, Twox64Concat, BlockNumberFor<T>, Balance, ValueQuery>;

  #[pallet::storage]
  pub type Vaults<T: Config> = StorageMap<_, Blake2_128Concat, VaultKey, Vault, OptionQuery>;

  /// Pools keyed by their layer-1 asset
  #[pallet::storage]
  pub type Pools<T: Config> = StorageMap<_, Blake2_128Concat, Asset, Pool, OptionQuery>;

  /// Per-inbound bookkeeping: observers, execution height and produced outbounds
  #[pallet::storage]
  pub type Voters<T: Config> =
    StorageMap<_, Blake2_128Concat, TxId, Voter<BlockNumberFor<T>>, OptionQuery>;

  #[pallet::storage]
  pub type Parameters<T: Config> =
    StorageValue<_, OutboundParameters, ValueQuery, DefaultParameters<T>>;

  /// Destinations that cannot receive outbounds
  #[pallet::storage]
  pub type DeniedAddresses<T: Config> = StorageMap<_, Blake2_128Concat, Address, (), OptionQuery>;

  /// Latest observed transaction cost per chain
  #[pallet::storage]
  pub type NetworkFees<T: Config> = StorageMap<_, Blake2_128Concat, Chain, NetworkFee, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A payment was queued for an external chain
    OutboundScheduled {
      height: BlockNumberFor<T>,
      index: u32,
      in_hash: TxId,
      chain: Chain,
      vault: Option<VaultKey>,
      coin: Coin,
    },
    /// A native-chain payment was settled immediately
    NativeOutboundExecuted { in_hash: TxId, to_address: Address, coin: Coin },
    /// An outbound fee was charged
    OutboundFee { in_hash: TxId, coin: Coin, rune_value: Balance, reserve_source: ModuleKind },
    /// A payment to a burn address was blocked
    SecurityAlert { in_hash: TxId, chain: Chain, to_address: Address },
    OutboundDispatched { height: BlockNumberFor<T>, index: u32 },
    OutboundConfirmed { height: BlockNumberFor<T>, index: u32, out_hash: TxId },
    ParametersUpdated { parameters: OutboundParameters },
    AddressDenied { address: Address, denied: bool },
    VaultUpdated { pub_key: VaultKey },
    PoolUpdated { asset: Asset },
    NetworkFeeUpdated { chain: Chain, fee: NetworkFee },
    ObservationRecorded { in_hash: TxId, signer: VaultKey },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Payment has no destination address
    MissingDestination,
    /// Coin is not settled on the payment's chain
    ChainMismatch,
    EmptyCoin,
    /// Available vaults cannot cover the payment
    InsufficientFunds,
    /// Fees consumed the whole payment
    NotEnoughToPayFee,
    /// Payable amount after fees is below the requested minimum
    OutputBelowMinimum,
    DeniedDestination,
    PoolNotFound,
    VaultNotFound,
    /// No fee observation for the chain yet
    NetworkFeeNotFound,
    ScheduledBlockFull,
    TooManyVoterActions,
    TooManySigners,
    TooManyVaultCoins,
    OutboundNotFound,
    InvalidStatusTransition,
    InvalidParameters,
    /// Affiliates were paid more than the payment carried
    AffiliateSkimExceedsAmount,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn on_initialize(n: BlockNumberFor<T>) -> Weight {
      let due = ScheduledOutbounds::<T>::decode_len(n).unwrap_or(0) as u32;
      T::WeightInfo::end_block(due)
    }

    fn on_finalize(n: BlockNumberFor<T>) {
      Self::end_block(n);
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Admit a payment, failing if less than `min_out` would reach the destination
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::request_outbound())]
    pub fn request_outbound(
      origin: OriginFor<T>,
      request: PaymentRequest,
      min_out: Balance,
    ) -> DispatchResult {
      T::HandlerOrigin::ensure_origin(origin)?;
      Self::try_add_outbound(request, min_out)
        .map(|_| ())
        .map_err(|e| e.into_dispatch_error::<T>())
    }

    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_parameters())]
    pub fn set_parameters(origin: OriginFor<T>, parameters: OutboundParameters) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(parameters.is_valid(), Error::<T>::InvalidParameters);
      Parameters::<T>::put(parameters);
      Self::deposit_event(Event::ParametersUpdated { parameters });
      Ok(())
    }

    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_address_denied())]
    pub fn set_address_denied(
      origin: OriginFor<T>,
      address: Address,
      denied: bool,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      if denied {
        DeniedAddresses::<T>::insert(&address, ());
      } else {
        DeniedAddresses::<T>::remove(&address);
      }
      Self::deposit_event(Event::AddressDenied { address, denied });
      Ok(())
    }

    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::upsert_vault())]
    pub fn upsert_vault(origin: OriginFor<T>, vault: Vault) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let pub_key = vault.pub_key;
      Vaults::<T>::insert(pub_key, vault);
      Self::deposit_event(Event::VaultUpdated { pub_key });
      Ok(())
    }

    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::set_pool())]
    pub fn set_pool(origin: OriginFor<T>, pool: Pool) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let asset = pool.asset.layer1();
      Pools::<T>::insert(asset, Pool { asset, ..pool });
      Self::deposit_event(Event::PoolUpdated { asset });
      Ok(())
    }

    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::set_network_fee())]
    pub fn set_network_fee(origin: OriginFor<T>, chain: Chain, fee: NetworkFee) -> DispatchResult {
      T::ObserverOrigin::ensure_origin(origin)?;
      NetworkFees::<T>::insert(chain, fee);
      Self::deposit_event(Event::NetworkFeeUpdated { chain, fee });
      Ok(())
    }

    /// Record that `signer` observed inbound `in_hash`
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::record_observation())]
    pub fn record_observation(
      origin: OriginFor<T>,
      in_hash: TxId,
      signer: VaultKey,
    ) -> DispatchResult {
      T::ObserverOrigin::ensure_origin(origin)?;
      Voters::<T>::try_mutate(in_hash, |maybe| -> DispatchResult {
        let voter = maybe.get_or_insert_with(Default::default);
        if !voter.signers.contains(&signer) {
          voter.signers.try_push(signer).map_err(|_| Error::<T>::TooManySigners)?;
        }
        Ok(())
      })?;
      Self::deposit_event(Event::ObservationRecorded { in_hash, signer });
      Ok(())
    }

    /// Mark a due payment as broadcast by the signer
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::report_dispatched())]
    pub fn report_dispatched(
      origin: OriginFor<T>,
      height: BlockNumberFor<T>,
      index: u32,
    ) -> DispatchResult {
      T::ObserverOrigin::ensure_origin(origin)?;
      Self::advance_item(height, index, OutboundStatus::Dispatched)?;
      Self::deposit_event(Event::OutboundDispatched { height, index });
      Ok(())
    }

    /// Confirm a broadcast payment was observed on its chain, charging `gas_used` to its vault
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::confirm_outbound())]
    pub fn confirm_outbound(
      origin: OriginFor<T>,
      height: BlockNumberFor<T>,
      index: u32,
      out_hash: TxId,
      gas_used: Balance,
    ) -> DispatchResult {
      T::ObserverOrigin::ensure_origin(origin)?;
      let item = Self::advance_item(height, index, OutboundStatus::Confirmed)?;
      ScheduledOutbounds::<T>::mutate(height, |items| {
        if let Some(stored) = items.get_mut(index as usize) {
          stored.out_hash = Some(out_hash);
        }
      });
      Self::settle_confirmed(&item, out_hash, gas_used)?;
      Self::deposit_event(Event::OutboundConfirmed { height, index, out_hash });
      Ok(())
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub pools: Vec<Pool>,
    /// (key, kind, status, security, holdings)
    pub vaults: Vec<(VaultKey, VaultKind, VaultStatus, Balance, Vec<Coin>)>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for pool in &self.pools {
        let asset = pool.asset.layer1();
        Pools::<T>::insert(asset, Pool { asset, ..*pool });
      }
      for (pub_key, kind, status, security, coins) in &self.vaults {
        let mut vault = Vault::new(*pub_key, *kind, *status);
        vault.security = *security;
        vault.coins =
          BoundedVec::try_from(coins.clone()).expect("genesis vault holds too many coins");
        Vaults::<T>::insert(pub_key, vault);
      }
    }
  }
}
