#![cfg(feature = "runtime-benchmarks")]

extern crate alloc;

use crate::*;
use alloc::vec::Vec;
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::EnsureOrigin;

const LIQUIDITY: Balance = 1_000_000_000_000_000_000;

#[benchmarks]
mod benches {
  use super::*;

  fn usdt() -> Asset {
    Asset::new(Chain::Eth, b"USDT")
  }

  fn destination() -> Address {
    Address::truncate_from(b"0xbenchmark-recipient".to_vec())
  }

  /// Deep pools, observed gas prices and one well funded vault.
  fn seed_eth<T: Config>() -> VaultKey {
    let eth = Chain::Eth.gas_asset();
    Pools::<T>::insert(eth, Pool::new(eth, LIQUIDITY, LIQUIDITY));
    Pools::<T>::insert(usdt(), Pool::new(usdt(), LIQUIDITY, LIQUIDITY));
    NetworkFees::<T>::insert(Chain::Eth, NetworkFee { transaction_size: 80_000, fee_rate: 30 });

    let pub_key = [7u8; 32];
    let mut vault = Vault::new(pub_key, VaultKind::SharedNetwork, VaultStatus::Active);
    vault.security = LIQUIDITY;
    vault.credit(Coin::new(eth, LIQUIDITY)).unwrap();
    vault.credit(Coin::new(usdt(), LIQUIDITY)).unwrap();
    Vaults::<T>::insert(pub_key, vault);
    pub_key
  }

  fn payment(amount: Balance, n: u32) -> PaymentRequest {
    let mut in_hash = [0u8; 32];
    in_hash[..4].copy_from_slice(&n.to_le_bytes());
    in_hash[31] = 1;
    PaymentRequest::new(
      Chain::Eth,
      destination(),
      Coin::new(usdt(), amount),
      OutboundMemo::Outbound { in_hash },
      in_hash,
    )
  }

  fn enqueue<T: Config>(vault: VaultKey, count: u32) -> BlockNumberFor<T> {
    let now = frame_system::Pallet::<T>::block_number();
    for n in 0..count {
      let mut request = payment(1_000 + Balance::from(n), n);
      request.vault_pub_key = Some(vault);
      Pallet::<T>::force_enqueue(request, now).unwrap();
    }
    now
  }

  #[benchmark]
  fn request_outbound() {
    seed_eth::<T>();
    let origin = T::HandlerOrigin::try_successful_origin()
      .expect("HandlerOrigin must have a successful origin");
    let request = payment(LIQUIDITY / 1_000, 0);
    let in_hash = request.in_hash;

    #[extrinsic_call]
    request_outbound(origin, request, 0);

    assert!(Voters::<T>::get(in_hash).is_some_and(|v| !v.actions.is_empty()));
  }

  #[benchmark]
  fn set_parameters() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let parameters = OutboundParameters { volume_threshold: 1, ..Parameters::<T>::get() };

    #[extrinsic_call]
    set_parameters(origin, parameters);

    assert_eq!(Parameters::<T>::get().volume_threshold, 1);
  }

  #[benchmark]
  fn set_address_denied() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_address_denied(origin, destination(), true);

    assert!(DeniedAddresses::<T>::contains_key(destination()));
  }

  #[benchmark]
  fn upsert_vault() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let mut vault = Vault::new([3u8; 32], VaultKind::SharedNetwork, VaultStatus::Active);
    let coins: Vec<Coin> = (0..MAX_VAULT_COINS)
      .map(|i| Coin::new(Asset::new(Chain::Eth, &i.to_le_bytes()), LIQUIDITY))
      .collect();
    vault.coins = BoundedVec::truncate_from(coins);

    #[extrinsic_call]
    upsert_vault(origin, vault);

    assert!(Vaults::<T>::contains_key([3u8; 32]));
  }

  #[benchmark]
  fn set_pool() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_pool(origin, Pool::new(usdt().synth(), LIQUIDITY, LIQUIDITY));

    assert!(Pools::<T>::contains_key(usdt()));
  }

  #[benchmark]
  fn set_network_fee() {
    let origin = T::ObserverOrigin::try_successful_origin()
      .expect("ObserverOrigin must have a successful origin");
    let fee = NetworkFee { transaction_size: 250, fee_rate: 25 };

    #[extrinsic_call]
    set_network_fee(origin, Chain::Btc, fee);

    assert_eq!(NetworkFees::<T>::get(Chain::Btc), Some(fee));
  }

  #[benchmark]
  fn record_observation() {
    let origin = T::ObserverOrigin::try_successful_origin()
      .expect("ObserverOrigin must have a successful origin");
    let in_hash = [9u8; 32];
    // worst case scans a full signer list
    Voters::<T>::mutate(in_hash, |maybe| {
      let voter = maybe.get_or_insert_with(Default::default);
      for i in 0..(MAX_SIGNERS - 1) {
        let mut signer = [0u8; 32];
        signer[..4].copy_from_slice(&i.to_le_bytes());
        let _ = voter.signers.try_push(signer);
      }
    });

    #[extrinsic_call]
    record_observation(origin, in_hash, [u8::MAX; 32]);

    assert_eq!(Voters::<T>::get(in_hash).map(|v| v.signers.len()), Some(MAX_SIGNERS as usize));
  }

  #[benchmark]
  fn report_dispatched() {
    let vault = seed_eth::<T>();
    let height = enqueue::<T>(vault, 1);
    Pallet::<T>::end_block(height);
    let origin = T::ObserverOrigin::try_successful_origin()
      .expect("ObserverOrigin must have a successful origin");

    #[extrinsic_call]
    report_dispatched(origin, height, 0);

    assert_eq!(Pallet::<T>::outbound_items(height)[0].status, OutboundStatus::Dispatched);
  }

  #[benchmark]
  fn confirm_outbound() {
    let vault = seed_eth::<T>();
    let height = enqueue::<T>(vault, 1);
    Pallet::<T>::end_block(height);
    let origin = T::ObserverOrigin::try_successful_origin()
      .expect("ObserverOrigin must have a successful origin");
    Pallet::<T>::report_dispatched(origin.clone(), height, 0).unwrap();

    #[extrinsic_call]
    confirm_outbound(origin, height, 0, [5u8; 32], 21_000);

    assert!(Pallet::<T>::outbound_items(height)[0].status.is_settled());
  }

  #[benchmark]
  fn end_block(n: Linear<1, 16>) {
    let vault = seed_eth::<T>();
    let count = n.min(T::MaxOutboundsPerBlock::get());
    let height = enqueue::<T>(vault, count);

    #[block]
    {
      Pallet::<T>::end_block(height);
    }

    assert!(Pallet::<T>::outbound_items(height).iter().all(|i| i.status == OutboundStatus::Due));
  }

  #[cfg(test)]
  use crate::mock::{new_test_ext, Test};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
