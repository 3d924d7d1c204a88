//! Admission pipeline: the single way a new payment gets into the outbound queue.

extern crate alloc;

use alloc::vec::Vec;

use frame::prelude::*;

use crate::{
  adapters::{AffiliateFeeSkimmer, GasEstimator, NetworkState, OutboundQueue},
  fees::apportion,
  scoped::scoped,
  types::{
    AdmissionError, AdmissionOutcome, Balance, Coin, OutboundParameters, OutboundStatus,
    PaymentRequest, VaultStatus,
  },
  Config, DeniedAddresses, Error, Event, Pallet, Parameters, ScheduledOutbounds, Vaults, Voters,
  LOG_TARGET,
};

impl<T: Config> From<Error<T>> for AdmissionError {
  fn from(error: Error<T>) -> Self {
    AdmissionError::Dispatch(error.into())
  }
}

impl AdmissionError {
  /// Error reported to a dispatchable caller.
  pub fn into_dispatch_error<T: Config>(self) -> DispatchError {
    match self {
      AdmissionError::DoesNotMeetRequirements { .. } => Error::<T>::OutputBelowMinimum.into(),
      AdmissionError::Dispatch(error) => error,
    }
  }
}

impl<T: Config> Pallet<T> {
  /// Admits `request`, paying out at least `min_out` after fees, or changes nothing.
  pub fn try_add_outbound(
    mut request: PaymentRequest,
    min_out: Balance,
  ) -> Result<AdmissionOutcome<BlockNumberFor<T>>, AdmissionError> {
    if request.is_noop() {
      log::debug!(target: LOG_TARGET, "dropping outbound to noop address");
      return Ok(AdmissionOutcome::Noop);
    }
    Self::validate(&request)?;
    request.status = OutboundStatus::Queued;
    request.out_hash = None;
    let params = Parameters::<T>::get();
    scoped(|| Self::admit(request, min_out, &params))
  }

  /// Queues `request` at `height` as-is: no fee, no vault discovery, no throttling.
  pub fn force_enqueue(mut request: PaymentRequest, height: BlockNumberFor<T>) -> DispatchResult {
    Self::validate(&request)?;
    request.status = OutboundStatus::Queued;
    request.out_hash = None;
    scoped(|| Self::dispatch_output(request, height))
  }

  pub(crate) fn validate(request: &PaymentRequest) -> Result<(), Error<T>> {
    ensure!(!request.to_address.is_empty(), Error::<T>::MissingDestination);
    ensure!(request.coin.asset.outbound_chain() == request.chain, Error::<T>::ChainMismatch);
    ensure!(!request.coin.is_empty(), Error::<T>::EmptyCoin);
    Ok(())
  }

  fn admit(
    mut request: PaymentRequest,
    min_out: Balance,
    params: &OutboundParameters,
  ) -> Result<AdmissionOutcome<BlockNumberFor<T>>, AdmissionError> {
    if request.chain.is_account_based() && request.chain.is_null_address(&request.to_address) {
      log::warn!(target: LOG_TARGET, "blocked outbound to {} null address", request.chain);
      Self::deposit_event(Event::SecurityAlert {
        in_hash: request.in_hash,
        chain: request.chain,
        to_address: request.to_address,
      });
      return Ok(AdmissionOutcome::NullAddressBlocked);
    }

    if request.memo.pays_affiliate() {
      let skimmed = T::AffiliateFees::skim(&request.in_hash, &request.coin, &request.memo)?;
      request.coin.amount = request
        .coin
        .amount
        .checked_sub(skimmed)
        .ok_or(Error::<T>::AffiliateSkimExceedsAmount)?;
    }

    let outputs = Self::prepare_outputs(&request, params)?;
    let total = outputs.iter().fold(0, |acc: Balance, o| acc.saturating_add(o.coin.amount));
    if total < min_out {
      return Err(AdmissionError::DoesNotMeetRequirements { available: total, required: min_out });
    }
    if outputs.is_empty() {
      return Err(Error::<T>::NotEnoughToPayFee.into());
    }
    if DeniedAddresses::<T>::contains_key(&request.to_address) {
      return Err(Error::<T>::DeniedDestination.into());
    }

    let height = Self::resolve_height(&request, total, params)?;
    let count = outputs.len() as u32;
    for output in outputs {
      Self::dispatch_output(output, height)?;
    }
    log::debug!(
      target: LOG_TARGET,
      "admitted {} {} in {} output(s) at {:?}",
      total,
      request.coin.asset,
      count,
      height,
    );
    Ok(AdmissionOutcome::Scheduled { height, outputs: count })
  }

  /// Funds, charges and prices the request, returning the concrete outputs to dispatch.
  fn prepare_outputs(
    request: &PaymentRequest,
    params: &OutboundParameters,
  ) -> Result<Vec<PaymentRequest>, DispatchError> {
    let native = request.chain.is_native();
    let fee = Self::quote_fee(request, params)?;
    let gas = if native {
      None
    } else {
      Some((
        T::GasEstimator::max_gas(request.chain, params)?,
        T::GasEstimator::gas_rate(request.chain, params)?,
      ))
    };

    let candidates: Vec<(PaymentRequest, VaultStatus)> = match (gas, request.vault_pub_key) {
      (None, _) => alloc::vec![(request.clone(), VaultStatus::Active)],
      (Some(_), Some(key)) => {
        let vault = Vaults::<T>::get(key).ok_or(Error::<T>::VaultNotFound)?;
        alloc::vec![(request.clone(), vault.status)]
      },
      (Some((max_gas, _)), None) => {
        let (allocations, residual) = Self::select_vaults(request, fee, &max_gas);
        if residual > 0 {
          log::warn!(
            target: LOG_TARGET,
            "not enough {} across vaults, short by {}",
            request.coin.asset,
            residual,
          );
          return Err(Error::<T>::InsufficientFunds.into());
        }
        allocations
          .into_iter()
          .map(|a| {
            let mut output = request.clone();
            output.vault_pub_key = Some(a.vault);
            output.coin.amount = a.amount;
            (output, a.status)
          })
          .collect()
      },
    };

    let gross: Vec<Balance> = candidates.iter().map(|(o, _)| o.coin.amount).collect();
    let shares = apportion(fee, &gross);
    let ragnarok = T::NetworkState::ragnarok_in_progress();
    let liquidity_auction = T::NetworkState::liquidity_auction_active();

    let mut outputs = Vec::with_capacity(candidates.len());
    for ((mut output, status), share) in candidates.into_iter().zip(shares) {
      if !output.memo.is_fee_exempt() {
        Self::apply_fee(&mut output, share, liquidity_auction)?;
      }
      if let Some((max_gas, gas_rate)) = gas {
        // no refill exists for these vaults, so gas comes out of the payment
        if output.coin.asset.is_gas_asset() && (ragnarok || status == VaultStatus::Inactive) {
          output.coin.amount = output.coin.amount.saturating_sub(max_gas.amount);
        }
        output.max_gas = Some(max_gas);
        output.gas_rate = gas_rate;
      }
      if output.coin.is_empty() {
        continue;
      }
      outputs.push(output);
    }
    Ok(outputs)
  }

  /// Execution height for this inbound's outputs. An inbound keeps the first height it was
  /// given.
  fn resolve_height(
    request: &PaymentRequest,
    total: Balance,
    params: &OutboundParameters,
  ) -> Result<BlockNumberFor<T>, DispatchError> {
    let now = frame_system::Pallet::<T>::block_number();
    if request.chain.is_native() {
      return Ok(now);
    }
    let summed = PaymentRequest { coin: Coin::new(request.coin.asset, total), ..request.clone() };
    if !request.has_inbound() {
      return Self::target_height(&summed, params).map(|(height, _)| height);
    }

    let mut voter = Voters::<T>::get(request.in_hash).unwrap_or_default();
    if let Some(height) = voter.outbound_height {
      return Ok(height.max(now));
    }
    let (height, _) = Self::target_height(&summed, params)?;
    voter.outbound_height = Some(height);
    Voters::<T>::insert(request.in_hash, voter);
    Ok(height)
  }
}

impl<T: Config> OutboundQueue<BlockNumberFor<T>> for Pallet<T> {
  fn try_add(
    request: PaymentRequest,
    min_out: Balance,
  ) -> Result<AdmissionOutcome<BlockNumberFor<T>>, AdmissionError> {
    Self::try_add_outbound(request, min_out)
  }

  fn force_enqueue(request: PaymentRequest, height: BlockNumberFor<T>) -> DispatchResult {
    Pallet::<T>::force_enqueue(request, height)
  }

  fn target_height(request: &PaymentRequest) -> Result<BlockNumberFor<T>, DispatchError> {
    let params = Parameters::<T>::get();
    Pallet::<T>::target_height(request, &params).map(|(height, _)| height)
  }

  fn outbound_items(height: BlockNumberFor<T>) -> Vec<PaymentRequest> {
    ScheduledOutbounds::<T>::get(height).into_inner()
  }
}
