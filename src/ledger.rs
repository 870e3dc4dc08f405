// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Coin float held by the machine.
//!
//! Customer coins and the operator's float share one ledger: inserted coins
//! are immediately available as change.
//!
//! # Example
//!
//! ```
//! use vending_machine_rs::{CoinCounts, CoinLedger, Denomination};
//!
//! let mut ledger = CoinLedger::with_coins(CoinCounts::from([
//!     (Denomination::Ten, 1),
//!     (Denomination::Five, 1),
//!     (Denomination::Two, 2),
//!     (Denomination::One, 5),
//! ]));
//!
//! let change = ledger.make_change(14).unwrap();
//! assert_eq!(change, CoinCounts::from([(Denomination::Ten, 1), (Denomination::Two, 2)]));
//! assert_eq!(ledger.total(), 10);
//! ```

use crate::coin::{CoinCounts, Denomination};
use crate::VendingError;
use tracing::{debug, warn};

/// Greedy change selection.
///
/// Walks [`Denomination::ALL`] from the largest coin down, taking as many of
/// each as fit in the remainder and are `available`. Returns the selection and
/// whatever remainder could not be covered (zero on success).
///
/// With an ample supply of every coin, greedy is exact for the 20/10/5/2/1
/// system. With a finite float it can miss amounts another combination would
/// reach: 6 from `{5: 1, 2: 3}` fails because the 5 is taken first.
pub fn greedy_change(amount: u32, available: &CoinCounts) -> (CoinCounts, u32) {
    let mut selection = CoinCounts::new();
    let mut remainder = amount;

    for denomination in Denomination::ALL {
        if remainder == 0 {
            break;
        }
        let face = denomination.value();
        let take = (remainder / face).min(available.get(denomination));
        selection.set(denomination, take);
        remainder -= take * face;
    }

    (selection, remainder)
}

/// Denomination → count inventory of the machine's cash box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinLedger {
    coins: CoinCounts,
}

impl CoinLedger {
    /// Creates an empty ledger (every denomination at zero).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coins(coins: CoinCounts) -> Self {
        Self { coins }
    }

    /// Snapshot of the current counts.
    pub fn coins(&self) -> CoinCounts {
        self.coins
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.coins.get(denomination)
    }

    /// Adds `count` coins of `denomination`.
    ///
    /// # Errors
    ///
    /// [`VendingError::InvalidArgument`] if the stored count would overflow.
    pub fn add(&mut self, denomination: Denomination, count: u32) -> Result<(), VendingError> {
        let stored = self.coins.get_mut(denomination);
        *stored = stored.checked_add(count).ok_or_else(|| {
            VendingError::invalid(format!("too many {denomination} coins in the machine"))
        })?;
        debug!(%denomination, count, "coins added");
        Ok(())
    }

    /// Removes `count` coins of `denomination`.
    ///
    /// # Errors
    ///
    /// [`VendingError::InsufficientFunds`] if fewer than `count` are stored.
    pub fn remove(&mut self, denomination: Denomination, count: u32) -> Result<(), VendingError> {
        let stored = self.coins.get_mut(denomination);
        if *stored < count {
            return Err(VendingError::InsufficientFunds {
                required: u64::from(count),
                available: u64::from(*stored),
            });
        }
        *stored -= count;
        debug!(%denomination, count, "coins removed");
        Ok(())
    }

    /// Value of every coin in the ledger.
    pub fn total(&self) -> u64 {
        self.coins.value()
    }

    /// Whether [`make_change`](Self::make_change) would succeed for `amount`.
    pub fn can_make_change(&self, amount: u32) -> bool {
        let (_, remainder) = greedy_change(amount, &self.coins);
        remainder == 0
    }

    /// Pays out `amount` from the ledger and returns the coins taken.
    ///
    /// All-or-nothing: the ledger is only debited once the full amount has
    /// been covered.
    ///
    /// # Errors
    ///
    /// [`VendingError::ChangeNotAvailable`] if the coins on hand cannot make
    /// `amount` exactly. The ledger is left unchanged.
    pub fn make_change(&mut self, amount: u32) -> Result<CoinCounts, VendingError> {
        let (selection, remainder) = greedy_change(amount, &self.coins);
        if remainder > 0 {
            warn!(amount, remainder, "change not available");
            return Err(VendingError::ChangeNotAvailable(amount));
        }

        let before = self.total();
        for (denomination, count) in selection.iter() {
            *self.coins.get_mut(denomination) -= count;
        }
        debug_assert_eq!(
            before - self.total(),
            u64::from(amount),
            "Invariant violated: ledger total did not drop by the change paid"
        );
        debug!(amount, change = %selection, "change made");

        Ok(selection)
    }
}
