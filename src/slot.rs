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

//! Product slots.
//!
//! A slot holds up to `capacity` items of a single product and may override
//! the product's base price.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vending_machine_rs::{Product, ProductId, Slot};
//!
//! let cola = Arc::new(Product::new(ProductId(1), "Cola", 15, "Drink").unwrap());
//! let mut slot = Slot::new("A1", 10, 5, cola, None).unwrap();
//!
//! slot.remove_one().unwrap();
//! assert_eq!(slot.quantity(), 4);
//! assert_eq!(slot.refill_to_capacity(), 6);
//! ```

use crate::base::SlotCode;
use crate::product::Product;
use crate::VendingError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    code: SlotCode,
    capacity: u32,
    quantity: u32,
    product: Arc<Product>,
    price_override: Option<u32>,
}

impl Slot {
    pub fn new(
        code: &str,
        capacity: u32,
        quantity: u32,
        product: Arc<Product>,
        price_override: Option<u32>,
    ) -> Result<Self, VendingError> {
        let code = SlotCode::parse(code)?;
        if capacity == 0 {
            return Err(VendingError::invalid("slot capacity must be > 0"));
        }
        if quantity > capacity {
            return Err(VendingError::invalid(format!(
                "initial quantity {quantity} exceeds capacity {capacity} of slot {code}"
            )));
        }

        Ok(Self {
            code,
            capacity,
            quantity,
            product,
            price_override,
        })
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.quantity <= self.capacity,
            "Invariant violated: slot {} holds {} items above capacity {}",
            self.code,
            self.quantity,
            self.capacity
        );
    }

    pub fn code(&self) -> &SlotCode {
        &self.code
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn price_override(&self) -> Option<u32> {
        self.price_override
    }

    pub fn has_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Active price: the override when set, otherwise the product's base price.
    pub fn price(&self) -> u32 {
        self.price_override.unwrap_or(self.product.base_price())
    }

    /// Takes one item out of the slot.
    pub fn remove_one(&mut self) -> Result<(), VendingError> {
        if self.quantity == 0 {
            return Err(VendingError::OutOfStock(self.code.to_string()));
        }
        self.quantity -= 1;
        self.assert_invariants();
        Ok(())
    }

    /// Adds `count` items.
    ///
    /// # Errors
    ///
    /// [`VendingError::CapacityExceeded`] if the slot would hold more than
    /// its capacity. Nothing is added in that case.
    pub fn refill(&mut self, count: u32) -> Result<(), VendingError> {
        let free = self.capacity - self.quantity;
        if count > free {
            return Err(VendingError::CapacityExceeded {
                code: self.code.to_string(),
                capacity: self.capacity,
            });
        }
        self.quantity += count;
        self.assert_invariants();
        Ok(())
    }

    /// Fills the slot and returns how many items were added.
    pub fn refill_to_capacity(&mut self) -> u32 {
        let free = self.capacity - self.quantity;
        if free == 0 {
            return 0;
        }
        self.quantity = self.capacity;
        free
    }

    /// Sets the override, or clears it with `None`.
    pub fn set_price_override(&mut self, price: Option<u32>) {
        self.price_override = price;
    }
}

impl Serialize for Slot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Slot", 7)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("product", self.product.name())?;
        state.serialize_field("category", self.product.category())?;
        state.serialize_field("price", &self.price())?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("capacity", &self.capacity)?;
        state.serialize_field("status", if self.has_stock() { "OK" } else { "Out" })?;
        state.end()
    }
}
