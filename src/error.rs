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

//! Error types for vending operations.

use thiserror::Error;

/// Vending machine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendingError {
    /// Malformed or out-of-range input (zero counts, empty codes, overflow).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No slot is registered under the given code
    #[error("slot {0} not found")]
    NotFound(String),

    /// Purchase attempted on an empty slot
    #[error("slot {0} is out of stock")]
    OutOfStock(String),

    /// Refill would push the slot above its capacity
    #[error("cannot exceed capacity of slot {code} ({capacity})")]
    CapacityExceeded { code: String, capacity: u32 },

    /// Not enough money inserted, or not enough coins in the machine.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// The coin float cannot realize the exact amount
    #[error("cannot provide correct change ({0} kr.)")]
    ChangeNotAvailable(u32),
}

impl VendingError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        VendingError::InvalidArgument(message.into())
    }
}
