//! Purpose tags attached to outbound payments.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

use crate::TxId;

/// Why a payment is leaving the network. Block heights are plain `u64` since memos are
/// written onto external chains.
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
pub enum OutboundMemo {
  /// Pays out the result of a swap or withdrawal.
  Outbound { in_hash: TxId },
  /// Returns an inbound that could not be processed.
  Refund { in_hash: TxId },
  /// Moves funds from a retiring vault to its successor.
  Migrate { height: u64 },
  /// Returns funds during a network shutdown.
  Ragnarok { height: u64 },
  /// Tops up a single-node vault.
  YggdrasilFund { height: u64 },
  /// Drains a single-node vault back to the shared vaults.
  YggdrasilReturn { height: u64 },
  /// Merges unspent outputs inside one vault.
  Consolidate,
}

impl OutboundMemo {
  /// Internal transfers that pay no outbound fee.
  pub const fn is_fee_exempt(&self) -> bool {
    matches!(
      self,
      OutboundMemo::Migrate { .. }
        | OutboundMemo::Ragnarok { .. }
        | OutboundMemo::YggdrasilFund { .. }
        | OutboundMemo::YggdrasilReturn { .. }
    )
  }

  /// Only user-facing payments are subject to congestion delay.
  pub const fn is_delayable(&self) -> bool {
    matches!(self, OutboundMemo::Outbound { .. } | OutboundMemo::Refund { .. })
  }

  /// Affiliate fees are skimmed from swap payouts only.
  pub const fn pays_affiliate(&self) -> bool {
    matches!(self, OutboundMemo::Outbound { .. })
  }
}
