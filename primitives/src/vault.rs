//! Vault classification shared between the scheduler and its observers.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// - `SharedNetwork`: threshold-signed vault shared by the active validator set (Asgard).
/// - `SingleNode`: vault controlled by one node operator (Yggdrasil).
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
pub enum VaultKind {
  #[default]
  SharedNetwork,
  SingleNode,
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
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum VaultStatus {
  #[default]
  Initializing,
  Active,
  Retiring,
  Inactive,
}
