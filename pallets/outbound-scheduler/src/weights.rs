#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use core::marker::PhantomData;
use polkadot_sdk::frame_support::{
  traits::Get,
  weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
  fn request_outbound() -> Weight;
  fn set_parameters() -> Weight;
  fn set_address_denied() -> Weight;
  fn upsert_vault() -> Weight;
  fn set_pool() -> Weight;
  fn set_network_fee() -> Weight;
  fn record_observation() -> Weight;
  fn report_dispatched() -> Weight;
  fn confirm_outbound() -> Weight;
  fn end_block(n: u32) -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  /// Storage: `Parameters`, `Vaults` (iterated), `Voters`, `Pools`, `DeniedAddresses`,
  /// `ScheduledValue` (window scan), `ScheduledOutbounds`
  fn request_outbound() -> Weight {
    Weight::from_parts(120_000_000, 12_000)
      .saturating_add(T::DbWeight::get().reads(64))
      .saturating_add(T::DbWeight::get().writes(8))
  }

  fn set_parameters() -> Weight {
    Weight::from_parts(9_000_000, 1_500)
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_address_denied() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn upsert_vault() -> Weight {
    Weight::from_parts(14_000_000, 4_000)
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_pool() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_network_fee() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn record_observation() -> Weight {
    Weight::from_parts(16_000_000, 6_000)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn report_dispatched() -> Weight {
    Weight::from_parts(18_000_000, 8_000)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn confirm_outbound() -> Weight {
    Weight::from_parts(28_000_000, 10_000)
      .saturating_add(T::DbWeight::get().reads(3))
      .saturating_add(T::DbWeight::get().writes(3))
  }

  /// Storage: `ScheduledOutbounds`, `Parameters`, `NetworkFees` and `Pools` per chain,
  /// `Voters` per item
  fn end_block(n: u32) -> Weight {
    Weight::from_parts(5_000_000, 2_000)
      .saturating_add(Weight::from_parts(9_000_000, 3_000).saturating_mul(n as u64))
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().reads((2 as u64).saturating_mul(n as u64)))
      .saturating_add(T::DbWeight::get().writes(1))
      .saturating_add(T::DbWeight::get().writes(n as u64))
  }
}

impl WeightInfo for () {
  fn request_outbound() -> Weight {
    Weight::from_parts(120_000_000, 12_000)
      .saturating_add(RocksDbWeight::get().reads(64))
      .saturating_add(RocksDbWeight::get().writes(8))
  }

  fn set_parameters() -> Weight {
    Weight::from_parts(9_000_000, 1_500)
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn set_address_denied() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn upsert_vault() -> Weight {
    Weight::from_parts(14_000_000, 4_000)
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn set_pool() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn set_network_fee() -> Weight {
    Weight::from_parts(10_000_000, 1_500)
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn record_observation() -> Weight {
    Weight::from_parts(16_000_000, 6_000)
      .saturating_add(RocksDbWeight::get().reads(1))
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn report_dispatched() -> Weight {
    Weight::from_parts(18_000_000, 8_000)
      .saturating_add(RocksDbWeight::get().reads(1))
      .saturating_add(RocksDbWeight::get().writes(1))
  }

  fn confirm_outbound() -> Weight {
    Weight::from_parts(28_000_000, 10_000)
      .saturating_add(RocksDbWeight::get().reads(3))
      .saturating_add(RocksDbWeight::get().writes(3))
  }

  fn end_block(n: u32) -> Weight {
    Weight::from_parts(5_000_000, 2_000)
      .saturating_add(Weight::from_parts(9_000_000, 3_000).saturating_mul(n as u64))
      .saturating_add(RocksDbWeight::get().reads(2))
      .saturating_add(RocksDbWeight::get().reads((2 as u64).saturating_mul(n as u64)))
      .saturating_add(RocksDbWeight::get().writes(1))
      .saturating_add(RocksDbWeight::get().writes(n as u64))
  }
}
