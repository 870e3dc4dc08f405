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

//! Storage seams for slots and cash.
//!
//! Both stores live for the lifetime of the process; nothing is persisted
//! across restarts.

use crate::base::SlotCode;
use crate::ledger::CoinLedger;
use crate::slot::Slot;
use crate::VendingError;

/// Slot lookup and persistence.
pub trait SlotRepository {
    /// Every slot, in machine order.
    fn all(&self) -> Vec<&Slot>;

    fn get(&self, code: &SlotCode) -> Option<&Slot>;

    /// Stores `slot`, replacing the slot with the same code.
    ///
    /// # Errors
    ///
    /// [`VendingError::NotFound`] if no slot has that code.
    fn update(&mut self, slot: Slot) -> Result<(), VendingError>;
}

/// Access to the machine's single coin ledger.
pub trait MoneyRepository {
    fn inventory(&self) -> &CoinLedger;

    fn inventory_mut(&mut self) -> &mut CoinLedger;
}

/// Vec-backed slot store preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemorySlotRepository {
    slots: Vec<Slot>,
}

impl InMemorySlotRepository {
    /// # Errors
    ///
    /// [`VendingError::InvalidArgument`] if two slots share a code.
    pub fn new(slots: Vec<Slot>) -> Result<Self, VendingError> {
        for (i, slot) in slots.iter().enumerate() {
            if slots[..i].iter().any(|other| other.code() == slot.code()) {
                return Err(VendingError::invalid(format!(
                    "duplicate slot code {}",
                    slot.code()
                )));
            }
        }
        Ok(Self { slots })
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn all(&self) -> Vec<&Slot> {
        self.slots.iter().collect()
    }

    fn get(&self, code: &SlotCode) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.code() == code)
    }

    fn update(&mut self, slot: Slot) -> Result<(), VendingError> {
        let stored = self
            .slots
            .iter_mut()
            .find(|stored| stored.code() == slot.code())
            .ok_or_else(|| VendingError::NotFound(slot.code().to_string()))?;
        *stored = slot;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMoneyRepository {
    inventory: CoinLedger,
}

impl InMemoryMoneyRepository {
    pub fn new(inventory: CoinLedger) -> Self {
        Self { inventory }
    }
}

impl MoneyRepository for InMemoryMoneyRepository {
    fn inventory(&self) -> &CoinLedger {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut CoinLedger {
        &mut self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ProductId;
    use crate::product::Product;
    use std::sync::Arc;

    fn slot(code: &str) -> Slot {
        let water = Arc::new(Product::new(ProductId(7), "Vand", 10, "Drink").unwrap());
        Slot::new(code, 8, 5, water, None).unwrap()
    }

    #[test]
    fn all_preserves_order() {
        let repository =
            InMemorySlotRepository::new(vec![slot("C2"), slot("A1"), slot("B1")]).unwrap();
        let codes: Vec<&str> = repository.all().iter().map(|s| s.code().as_str()).collect();
        assert_eq!(codes, vec!["C2", "A1", "B1"]);
    }

    #[test]
    fn rejects_duplicate_codes() {
        let result = InMemorySlotRepository::new(vec![slot("A1"), slot("a1")]);
        assert!(matches!(result, Err(VendingError::InvalidArgument(_))));
    }

    #[test]
    fn update_replaces_slot_by_code() {
        let mut repository = InMemorySlotRepository::new(vec![slot("A1")]).unwrap();
        let code = SlotCode::parse("A1").unwrap();

        let mut changed = repository.get(&code).cloned().unwrap();
        changed.remove_one().unwrap();
        repository.update(changed).unwrap();

        assert_eq!(repository.get(&code).unwrap().quantity(), 4);
    }

    #[test]
    fn update_unknown_slot_is_not_found() {
        let mut repository = InMemorySlotRepository::new(vec![slot("A1")]).unwrap();
        assert_eq!(
            repository.update(slot("Z9")),
            Err(VendingError::NotFound("Z9".to_string()))
        );
    }
}
