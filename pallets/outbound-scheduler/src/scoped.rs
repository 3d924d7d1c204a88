//! Scoped mutation: run a closure against a storage overlay that only reaches canonical state
//! when the closure succeeds.
//!
//! Events deposited inside the scope live in `frame_system` storage and are discarded with the
//! rest of the overlay.

use polkadot_sdk::{
  frame_support::storage::{with_transaction, TransactionOutcome},
  sp_runtime::DispatchError,
};

/// Runs `f` in a fresh storage layer. `Ok` commits every write it made, `Err` discards them.
pub fn scoped<R, E, F>(f: F) -> Result<R, E>
where
  E: From<DispatchError>,
  F: FnOnce() -> Result<R, E>,
{
  with_transaction(|| {
    let result = f();
    if result.is_ok() {
      TransactionOutcome::Commit(result)
    } else {
      TransactionOutcome::Rollback(result)
    }
  })
}
