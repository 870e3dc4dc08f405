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

//! Catalog product descriptors.

use crate::VendingError;
use crate::base::ProductId;
use std::fmt;

/// Immutable catalog entry. Slots share one instance through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    base_price: u32,
    category: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        base_price: u32,
        category: impl Into<String>,
    ) -> Result<Self, VendingError> {
        let name = name.into();
        let category = category.into();

        if id.0 == 0 {
            return Err(VendingError::invalid("product id must be > 0"));
        }
        if name.trim().is_empty() {
            return Err(VendingError::invalid("product name must not be empty"));
        }
        if category.trim().is_empty() {
            return Err(VendingError::invalid("product category must not be empty"));
        }

        Ok(Self {
            id,
            name,
            base_price,
            category,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> u32 {
        self.base_price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Short shelf label, e.g. `Cola (15 kr.)`.
    pub fn describe(&self) -> String {
        format!("{} ({} kr.)", self.name, self.base_price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product {{ id={}, name={}, price={} kr., category={} }}",
            self.id, self.name, self.base_price, self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_price() {
        let cola = Product::new(ProductId(1), "Cola", 15, "Drink").unwrap();
        assert_eq!(cola.describe(), "Cola (15 kr.)");
        assert_eq!(
            cola.to_string(),
            "Product { id=1, name=Cola, price=15 kr., category=Drink }"
        );
    }

    #[test]
    fn free_products_are_allowed() {
        let sample = Product::new(ProductId(9), "Sample", 0, "Promo").unwrap();
        assert_eq!(sample.base_price(), 0);
    }

    #[test]
    fn rejects_invalid_descriptors() {
        assert!(matches!(
            Product::new(ProductId(0), "Cola", 15, "Drink"),
            Err(VendingError::InvalidArgument(_))
        ));
        assert!(matches!(
            Product::new(ProductId(1), "  ", 15, "Drink"),
            Err(VendingError::InvalidArgument(_))
        ));
        assert!(matches!(
            Product::new(ProductId(1), "Cola", 15, ""),
            Err(VendingError::InvalidArgument(_))
        ));
    }
}
