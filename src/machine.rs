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

//! Customer transactions and operator actions.

use crate::base::SlotCode;
use crate::coin::{CoinCounts, Denomination};
use crate::product::Product;
use crate::repository::{
    InMemoryMoneyRepository, InMemorySlotRepository, MoneyRepository, SlotRepository,
};
use crate::slot::Slot;
use crate::{CoinLedger, VendingError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    product: Arc<Product>,
    change: CoinCounts,
}

impl PurchaseResult {
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    /// Coins paid back, zero for every denomination on an exact payment.
    pub fn change(&self) -> CoinCounts {
        self.change
    }
}

/// The vending machine: one customer balance on top of a slot store and a
/// coin ledger.
///
/// Every mutating operation takes `&mut self`, so at most one transaction is
/// in flight at a time.
pub struct VendingMachine<S = InMemorySlotRepository, M = InMemoryMoneyRepository> {
    slots: S,
    money: M,
    /// Value of the coins inserted by the current customer.
    inserted: u32,
}

impl VendingMachine {
    /// Builds a machine backed by the in-memory repositories.
    ///
    /// # Errors
    ///
    /// [`VendingError::InvalidArgument`] if two slots share a code.
    pub fn in_memory(slots: Vec<Slot>, coins: CoinCounts) -> Result<Self, VendingError> {
        Ok(Self::new(
            InMemorySlotRepository::new(slots)?,
            InMemoryMoneyRepository::new(CoinLedger::with_coins(coins)),
        ))
    }
}

/// Customer API
impl<S: SlotRepository, M: MoneyRepository> VendingMachine<S, M> {
    pub fn new(slots: S, money: M) -> Self {
        Self {
            slots,
            money,
            inserted: 0,
        }
    }

    /// Accepts `count` coins of `denomination`.
    ///
    /// The coins go straight into the ledger and can be paid out as change
    /// right away.
    ///
    /// # Errors
    ///
    /// [`VendingError::InvalidArgument`] if `count` is zero or the balance
    /// would overflow.
    pub fn insert_coin(&mut self, denomination: Denomination, count: u32) -> Result<(), VendingError> {
        if count == 0 {
            return Err(VendingError::invalid("coin count must be > 0"));
        }
        let inserted = count
            .checked_mul(denomination.value())
            .and_then(|value| self.inserted.checked_add(value))
            .ok_or_else(|| VendingError::invalid("inserted amount is too large"))?;

        self.money.inventory_mut().add(denomination, count)?;
        self.inserted = inserted;

        debug!(%denomination, count, inserted, "coins inserted");
        Ok(())
    }

    pub fn inserted_amount(&self) -> u32 {
        self.inserted
    }

    /// Pays the inserted amount back and resets the balance.
    ///
    /// The refund is drawn from the whole ledger, so the coins returned need
    /// not be the ones inserted.
    ///
    /// # Errors
    ///
    /// [`VendingError::ChangeNotAvailable`] if the ledger cannot make the
    /// amount. The balance is kept.
    pub fn cancel_and_return(&mut self) -> Result<CoinCounts, VendingError> {
        if self.inserted == 0 {
            return Ok(CoinCounts::new());
        }

        let refund = self.money.inventory_mut().make_change(self.inserted)?;
        info!(amount = self.inserted, refund = %refund, "transaction cancelled");
        self.inserted = 0;

        Ok(refund)
    }

    /// Whether [`purchase`](Self::purchase) would succeed for `code` right now.
    pub fn can_purchase(&self, code: &str) -> bool {
        let Some(slot) = self.slot(code) else {
            return false;
        };
        if !slot.has_stock() {
            return false;
        }

        let price = slot.price();
        if self.inserted < price {
            return false;
        }

        let change_due = self.inserted - price;
        change_due == 0 || self.money.inventory().can_make_change(change_due)
    }

    /// Sells one item from slot `code`.
    ///
    /// Change is computed before the slot or the balance is touched, so a
    /// failed purchase leaves stock, balance and ledger as they were.
    ///
    /// # Errors
    ///
    /// - [`VendingError::InvalidArgument`] - Empty slot code.
    /// - [`VendingError::NotFound`] - Unknown slot.
    /// - [`VendingError::OutOfStock`] - Slot is empty.
    /// - [`VendingError::InsufficientFunds`] - Inserted amount below the price.
    /// - [`VendingError::ChangeNotAvailable`] - Ledger cannot pay the change.
    pub fn purchase(&mut self, code: &str) -> Result<PurchaseResult, VendingError> {
        let result = self.try_purchase(code);
        match &result {
            Ok(purchase) => info!(
                slot = code,
                product = purchase.product.name(),
                change = %purchase.change,
                "purchase completed"
            ),
            Err(e) => warn!(slot = code, inserted = self.inserted, reason = %e, "purchase rejected"),
        }
        result
    }

    fn try_purchase(&mut self, code: &str) -> Result<PurchaseResult, VendingError> {
        let code = SlotCode::parse(code)?;
        let slot = self
            .slots
            .get(&code)
            .ok_or_else(|| VendingError::NotFound(code.to_string()))?;

        if !slot.has_stock() {
            return Err(VendingError::OutOfStock(code.to_string()));
        }

        let price = slot.price();
        if self.inserted < price {
            return Err(VendingError::InsufficientFunds {
                required: u64::from(price),
                available: u64::from(self.inserted),
            });
        }

        let mut sold = slot.clone();
        sold.remove_one()?;

        let change_due = self.inserted - price;
        let change = if change_due == 0 {
            CoinCounts::new()
        } else {
            self.money.inventory_mut().make_change(change_due)?
        };

        if let Err(e) = self.slots.update(sold.clone()) {
            // Put the change back so the ledger matches the unsold slot.
            let ledger = self.money.inventory_mut();
            for (denomination, count) in change.iter().filter(|(_, c)| *c > 0) {
                ledger.add(denomination, count)?;
            }
            return Err(e);
        }
        self.inserted = 0;

        Ok(PurchaseResult {
            product: Arc::clone(sold.product()),
            change,
        })
    }

    /// Every slot, in machine order.
    pub fn slots(&self) -> Vec<&Slot> {
        self.slots.all()
    }

    /// Looks up a slot; `None` for unknown or malformed codes.
    pub fn slot(&self, code: &str) -> Option<&Slot> {
        let code = SlotCode::parse(code).ok()?;
        self.slots.get(&code)
    }

    /// First slot, in machine order, whose product is named `name`
    /// (case-insensitive).
    pub fn find_slot_by_product_name(&self, name: &str) -> Option<&Slot> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.slots
            .all()
            .into_iter()
            .find(|slot| slot.product().name().to_lowercase() == name.to_lowercase())
    }
}

/// Operator API
impl<S: SlotRepository, M: MoneyRepository> VendingMachine<S, M> {
    /// Adds `count` items to slot `code`.
    pub fn refill_slot(&mut self, code: &str, count: u32) -> Result<(), VendingError> {
        self.modify_slot(code, |slot| slot.refill(count))?;
        info!(slot = code, count, "slot refilled");
        Ok(())
    }

    /// Fills slot `code` and returns how many items were added.
    pub fn refill_slot_to_capacity(&mut self, code: &str) -> Result<u32, VendingError> {
        let added = self.modify_slot(code, |slot| Ok(slot.refill_to_capacity()))?;
        info!(slot = code, added, "slot filled to capacity");
        Ok(added)
    }

    /// Fills every slot; returns the items added per slot, in machine order.
    pub fn refill_all_slots_to_capacity(&mut self) -> Result<Vec<(SlotCode, u32)>, VendingError> {
        let slots: Vec<Slot> = self.slots.all().into_iter().cloned().collect();
        let mut added = Vec::with_capacity(slots.len());

        for mut slot in slots {
            let count = slot.refill_to_capacity();
            let code = slot.code().clone();
            if count > 0 {
                self.slots.update(slot)?;
            }
            added.push((code, count));
        }

        let total: u32 = added.iter().map(|(_, count)| count).sum();
        info!(slots = added.len(), total, "all slots filled to capacity");
        Ok(added)
    }

    /// Sets the price override of slot `code`, or clears it with `None`.
    pub fn set_slot_price_override(
        &mut self,
        code: &str,
        price: Option<u32>,
    ) -> Result<(), VendingError> {
        self.modify_slot(code, |slot| {
            slot.set_price_override(price);
            Ok(())
        })?;
        info!(slot = code, ?price, "price override changed");
        Ok(())
    }

    pub fn admin_add_coins(&mut self, denomination: Denomination, count: u32) -> Result<(), VendingError> {
        self.money.inventory_mut().add(denomination, count)?;
        info!(%denomination, count, "coins added by operator");
        Ok(())
    }

    pub fn admin_remove_coins(
        &mut self,
        denomination: Denomination,
        count: u32,
    ) -> Result<(), VendingError> {
        self.money.inventory_mut().remove(denomination, count)?;
        info!(%denomination, count, "coins removed by operator");
        Ok(())
    }

    /// Raises every denomination below its target up to the target.
    ///
    /// Denominations already at or above target are left alone. Returns the
    /// coins added.
    pub fn admin_top_up_coin_float(&mut self, targets: &CoinCounts) -> Result<CoinCounts, VendingError> {
        let ledger = self.money.inventory_mut();
        let mut added = CoinCounts::new();

        for (denomination, target) in targets.iter() {
            let shortfall = target.saturating_sub(ledger.count(denomination));
            if shortfall > 0 {
                ledger.add(denomination, shortfall)?;
                added.set(denomination, shortfall);
            }
        }

        info!(added = %added, "coin float topped up");
        Ok(added)
    }

    /// Removes every coin from the machine and returns what was taken.
    pub fn admin_empty_cash(&mut self) -> Result<CoinCounts, VendingError> {
        let ledger = self.money.inventory_mut();
        let snapshot = ledger.coins();

        for (denomination, count) in snapshot.iter().filter(|(_, c)| *c > 0) {
            ledger.remove(denomination, count)?;
        }

        info!(emptied = %snapshot, total = snapshot.value(), "cash box emptied");
        Ok(snapshot)
    }

    /// Value of every coin in the machine.
    pub fn machine_cash_total(&self) -> u64 {
        self.money.inventory().total()
    }

    pub fn coin_inventory(&self) -> CoinCounts {
        self.money.inventory().coins()
    }

    /// Applies `change` to a copy of slot `code` and stores it only on success.
    fn modify_slot<T>(
        &mut self,
        code: &str,
        change: impl FnOnce(&mut Slot) -> Result<T, VendingError>,
    ) -> Result<T, VendingError> {
        let code = SlotCode::parse(code)?;
        let mut slot = self
            .slots
            .get(&code)
            .cloned()
            .ok_or_else(|| VendingError::NotFound(code.to_string()))?;

        let output = change(&mut slot)?;
        self.slots.update(slot)?;
        Ok(output)
    }
}
