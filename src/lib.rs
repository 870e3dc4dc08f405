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

//! # Vending Machine
//!
//! This library models a coin-operated vending machine: customers insert
//! coins, buy from capacity-limited slots and receive exact change computed
//! from the machine's finite coin float.
//!
//! ## Core Components
//!
//! - [`VendingMachine`]: Customer balance, purchases, refunds and operator actions
//! - [`CoinLedger`]: Denomination → count cash box with greedy change-making
//! - [`Slot`]: Stock and price of one product position
//! - [`Product`]: Immutable catalog entry
//! - [`VendingError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use vending_machine_rs::{catalog, CoinCounts, Denomination};
//!
//! let mut machine = catalog::default_machine().unwrap();
//!
//! // Cola costs 15 kr.
//! machine.insert_coin(Denomination::Twenty, 1).unwrap();
//! assert!(machine.can_purchase("A1"));
//!
//! let result = machine.purchase("A1").unwrap();
//! assert_eq!(result.product().name(), "Cola");
//! assert_eq!(result.change(), CoinCounts::from([(Denomination::Five, 1)]));
//! assert_eq!(machine.inserted_amount(), 0);
//! ```
//!
//! ## Consistency
//!
//! A purchase either completes fully (one item out, change paid, balance
//! reset) or fails without changing stock, balance or the coin ledger.

mod base;
pub mod catalog;
mod coin;
pub mod command;
pub mod error;
mod ledger;
mod machine;
pub mod repository;
mod slot;
mod product;

pub use base::{ProductId, SlotCode};
pub use coin::{CoinCounts, Denomination};
pub use error::VendingError;
pub use ledger::{CoinLedger, greedy_change};
pub use machine::{PurchaseResult, VendingMachine};
pub use product::Product;
pub use slot::Slot;
