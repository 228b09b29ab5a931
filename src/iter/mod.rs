// src/iter/mod.rs

//! Collection helpers built on the same deferred dispatch as flows.
//!
//! - [`each`] maps a function over items with bounded concurrency, keeping
//!   input order in the output.
//! - [`n`] calls a function for every index `0..count`, one at a time.

pub mod each;
pub mod n;

pub use each::{DEFAULT_EACH_LIMIT, each, each_limit, each_series};
pub use n::n;

use tokio::task::JoinError;

use crate::errors::{FlwError, Result, join_message};

/// Map a spawned item's join result onto the crate error type.
pub(crate) fn item_outcome<R>(
    index: usize,
    joined: std::result::Result<anyhow::Result<R>, JoinError>,
) -> Result<R> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(FlwError::ItemFailed { index, source }),
        Err(join_err) => Err(FlwError::ItemPanicked {
            index,
            message: join_message(join_err),
        }),
    }
}
