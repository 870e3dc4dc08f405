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

//! Vending machine public API integration tests.

use std::sync::Arc;
use vending_machine_rs::Denomination::{Five, One, Ten, Twenty, Two};
use vending_machine_rs::{CoinCounts, Product, ProductId, Slot, VendingError, VendingMachine};

// =============================================================================
// Helper Functions
// =============================================================================

fn cola() -> Arc<Product> {
    Arc::new(Product::new(ProductId(1), "Cola", 15, "Drink").unwrap())
}

fn chips() -> Arc<Product> {
    Arc::new(Product::new(ProductId(4), "Chips", 12, "Snack").unwrap())
}

/// A1: Cola (15), capacity 10, 5 items. B1: Chips (12), capacity 8, empty.
fn make_machine(coins: CoinCounts) -> VendingMachine {
    let slots = vec![
        Slot::new("A1", 10, 5, cola(), None).unwrap(),
        Slot::new("B1", 8, 0, chips(), None).unwrap(),
    ];
    VendingMachine::in_memory(slots, coins).unwrap()
}

fn quantity(machine: &VendingMachine, code: &str) -> u32 {
    machine.slot(code).unwrap().quantity()
}

// =============================================================================
// Insert / Cancel
// =============================================================================

#[test]
fn insert_coin_accumulates_and_feeds_ledger() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Ten, 1).unwrap();
    machine.insert_coin(Two, 3).unwrap();

    assert_eq!(machine.inserted_amount(), 16);
    assert_eq!(machine.coin_inventory(), CoinCounts::from([(Ten, 1), (Two, 3)]));
    assert_eq!(machine.machine_cash_total(), 16);
}

#[test]
fn insert_zero_coins_is_invalid() {
    let mut machine = make_machine(CoinCounts::new());
    assert!(matches!(
        machine.insert_coin(Five, 0),
        Err(VendingError::InvalidArgument(_))
    ));
}

#[test]
fn cancel_with_nothing_inserted_returns_zero_map() {
    let mut machine = make_machine(CoinCounts::from([(One, 3)]));

    assert_eq!(machine.cancel_and_return().unwrap(), CoinCounts::new());
    assert_eq!(machine.machine_cash_total(), 3);
}

#[test]
fn cancel_refunds_from_whole_ledger() {
    // Customer inserts 5 x 2 kr; the machine refunds with its 10 kr coin.
    let mut machine = make_machine(CoinCounts::from([(Ten, 1)]));
    machine.insert_coin(Two, 5).unwrap();

    let refund = machine.cancel_and_return().unwrap();

    assert_eq!(refund, CoinCounts::from([(Ten, 1)]));
    assert_eq!(machine.inserted_amount(), 0);
    assert_eq!(machine.coin_inventory(), CoinCounts::from([(Two, 5)]));
}

// =============================================================================
// Purchase
// =============================================================================

#[test]
fn exact_payment_purchase() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Ten, 1).unwrap();
    machine.insert_coin(Five, 1).unwrap();
    assert_eq!(machine.inserted_amount(), 15);

    let result = machine.purchase("A1").unwrap();

    assert_eq!(result.product().name(), "Cola");
    assert_eq!(result.change(), CoinCounts::new());
    assert_eq!(quantity(&machine, "A1"), 4);
    assert_eq!(machine.inserted_amount(), 0);
}

#[test]
fn purchase_with_change() {
    let mut machine = make_machine(CoinCounts::from([(Five, 2)]));
    machine.insert_coin(Twenty, 1).unwrap();

    let result = machine.purchase("a1").unwrap();

    assert_eq!(result.change(), CoinCounts::from([(Five, 1)]));
    assert_eq!(machine.coin_inventory(), CoinCounts::from([(Twenty, 1), (Five, 1)]));
    assert_eq!(quantity(&machine, "A1"), 4);
}

#[test]
fn purchase_out_of_stock_changes_nothing() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Twenty, 1).unwrap();

    let result = machine.purchase("B1");

    assert_eq!(result, Err(VendingError::OutOfStock("B1".to_string())));
    assert_eq!(machine.inserted_amount(), 20);
    assert_eq!(quantity(&machine, "B1"), 0);
}

#[test]
fn purchase_with_insufficient_funds_changes_nothing() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Ten, 1).unwrap();

    let result = machine.purchase("A1");

    assert_eq!(
        result,
        Err(VendingError::InsufficientFunds {
            required: 15,
            available: 10
        })
    );
    assert_eq!(machine.inserted_amount(), 10);
    assert_eq!(quantity(&machine, "A1"), 5);
}

#[test]
fn purchase_without_change_changes_nothing() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Twenty, 1).unwrap();
    let coins_before = machine.coin_inventory();

    let result = machine.purchase("A1");

    assert_eq!(result, Err(VendingError::ChangeNotAvailable(5)));
    assert_eq!(machine.inserted_amount(), 20);
    assert_eq!(quantity(&machine, "A1"), 5);
    assert_eq!(machine.coin_inventory(), coins_before);
}

#[test]
fn purchase_unknown_slot_is_not_found() {
    let mut machine = make_machine(CoinCounts::new());
    assert_eq!(
        machine.purchase("Z9"),
        Err(VendingError::NotFound("Z9".to_string()))
    );
}

#[test]
fn free_product_purchase_with_nothing_inserted() {
    let mut machine = make_machine(CoinCounts::new());
    machine.set_slot_price_override("A1", Some(0)).unwrap();

    let result = machine.purchase("A1").unwrap();
    assert_eq!(result.change(), CoinCounts::new());
    assert_eq!(quantity(&machine, "A1"), 4);
}

// =============================================================================
// Purchase Feasibility
// =============================================================================

#[test]
fn can_purchase_checks_every_condition() {
    let mut machine = make_machine(CoinCounts::new());

    assert!(!machine.can_purchase("Z9"));
    assert!(!machine.can_purchase(""));

    machine.insert_coin(Twenty, 1).unwrap();
    assert!(!machine.can_purchase("B1")); // empty slot
    assert!(!machine.can_purchase("A1")); // no 5 kr change

    machine.admin_add_coins(Five, 1).unwrap();
    assert!(machine.can_purchase("A1"));
}

#[test]
fn can_purchase_exact_amount_needs_no_change() {
    let mut machine = make_machine(CoinCounts::new());
    machine.insert_coin(Ten, 1).unwrap();
    assert!(!machine.can_purchase("A1"));

    machine.insert_coin(Five, 1).unwrap();
    assert!(machine.can_purchase("A1"));
}

#[test]
fn can_purchase_does_not_mutate() {
    let mut machine = make_machine(CoinCounts::from([(Five, 1)]));
    machine.insert_coin(Twenty, 1).unwrap();
    let coins = machine.coin_inventory();

    assert!(machine.can_purchase("A1"));

    assert_eq!(machine.coin_inventory(), coins);
    assert_eq!(machine.inserted_amount(), 20);
    assert_eq!(quantity(&machine, "A1"), 5);
}

// =============================================================================
// Slot Administration
// =============================================================================

#[test]
fn refill_slot_and_capacity_limit() {
    let mut machine = make_machine(CoinCounts::new());

    machine.refill_slot("B1", 3).unwrap();
    assert_eq!(quantity(&machine, "B1"), 3);

    assert_eq!(
        machine.refill_slot("B1", 6),
        Err(VendingError::CapacityExceeded {
            code: "B1".to_string(),
            capacity: 8
        })
    );
    assert_eq!(quantity(&machine, "B1"), 3);
}

#[test]
fn refill_unknown_slot_is_not_found() {
    let mut machine = make_machine(CoinCounts::new());
    assert_eq!(
        machine.refill_slot("Q1", 1),
        Err(VendingError::NotFound("Q1".to_string()))
    );
    assert_eq!(
        machine.refill_slot_to_capacity("Q1"),
        Err(VendingError::NotFound("Q1".to_string()))
    );
    assert_eq!(
        machine.set_slot_price_override("Q1", None),
        Err(VendingError::NotFound("Q1".to_string()))
    );
}

#[test]
fn refill_to_capacity_variants() {
    let mut machine = make_machine(CoinCounts::new());

    assert_eq!(machine.refill_slot_to_capacity("A1").unwrap(), 5);
    assert_eq!(machine.refill_slot_to_capacity("A1").unwrap(), 0);

    let added = machine.refill_all_slots_to_capacity().unwrap();
    let added: Vec<(String, u32)> = added
        .into_iter()
        .map(|(code, count)| (code.to_string(), count))
        .collect();
    assert_eq!(added, vec![("A1".to_string(), 0), ("B1".to_string(), 8)]);
    assert_eq!(quantity(&machine, "B1"), 8);
}

#[test]
fn price_override_drives_purchase_price() {
    let mut machine = make_machine(CoinCounts::new());
    machine.set_slot_price_override("A1", Some(10)).unwrap();
    machine.insert_coin(Ten, 1).unwrap();

    assert!(machine.can_purchase("A1"));
    machine.purchase("A1").unwrap();

    machine.set_slot_price_override("A1", None).unwrap();
    assert_eq!(machine.slot("A1").unwrap().price(), 15);
}

#[test]
fn find_slot_by_product_name_is_case_insensitive() {
    let machine = make_machine(CoinCounts::new());
    assert_eq!(
        machine.find_slot_by_product_name("CHIPS").unwrap().code().as_str(),
        "B1"
    );
    assert!(machine.find_slot_by_product_name("Snickers").is_none());
    assert!(machine.find_slot_by_product_name(" ").is_none());
}

#[test]
fn slots_are_listed_in_machine_order() {
    let machine = make_machine(CoinCounts::new());
    let codes: Vec<&str> = machine.slots().iter().map(|s| s.code().as_str()).collect();
    assert_eq!(codes, vec!["A1", "B1"]);
}

// =============================================================================
// Cash Administration
// =============================================================================

#[test]
fn admin_remove_more_than_stored_fails() {
    let mut machine = make_machine(CoinCounts::from([(Ten, 1)]));
    assert_eq!(
        machine.admin_remove_coins(Ten, 2),
        Err(VendingError::InsufficientFunds {
            required: 2,
            available: 1
        })
    );
    assert_eq!(machine.machine_cash_total(), 10);
}

#[test]
fn top_up_adds_shortfall_only() {
    let mut machine = make_machine(CoinCounts::from([(Twenty, 7), (Ten, 1)]));

    let added = machine
        .admin_top_up_coin_float(&CoinCounts::from([(Twenty, 5), (Ten, 4), (One, 2)]))
        .unwrap();

    assert_eq!(added, CoinCounts::from([(Ten, 3), (One, 2)]));
    assert_eq!(
        machine.coin_inventory(),
        CoinCounts::from([(Twenty, 7), (Ten, 4), (One, 2)])
    );
}

#[test]
fn empty_cash_drains_ledger() {
    let coins = CoinCounts::from([(Twenty, 2), (Five, 3), (One, 1)]);
    let mut machine = make_machine(coins);

    let emptied = machine.admin_empty_cash().unwrap();

    assert_eq!(emptied, coins);
    assert_eq!(emptied.get(Ten), 0);
    assert_eq!(emptied.get(Two), 0);
    assert_eq!(machine.coin_inventory(), CoinCounts::new());
    assert_eq!(machine.machine_cash_total(), 0);
}
