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

//! Machine setup: the stock product layout, CSV slot files and coin float
//! lists.
//!
//! # CSV Format
//!
//! Columns: `code, capacity, quantity, product_id, name, price, category, price_override`
//!
//! ```csv
//! code,capacity,quantity,product_id,name,price,category,price_override
//! A1,10,5,1,Cola,15,Drink,
//! A2,10,5,1,Cola,15,Drink,12
//! B1,8,0,4,Chips,12,Snack,
//! ```
//!
//! Rows with the same `product_id` share one [`Product`]; `price_override` may
//! be left empty.

use crate::base::{ProductId, SlotCode};
use crate::coin::{CoinCounts, Denomination};
use crate::machine::VendingMachine;
use crate::product::Product;
use crate::slot::Slot;
use crate::VendingError;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::sync::Arc;
use thiserror::Error;

/// Coin float loaded into a freshly installed machine.
pub const DEFAULT_COIN_FLOAT: &str = "20=5,10=8,5=10,2=10,1=20";

/// Errors raised while loading a slot file.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed slot file: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: VendingError,
    },
}

/// Raw CSV record matching the slot file format.
#[derive(Debug, Deserialize)]
struct SlotRecord {
    code: String,
    capacity: u32,
    quantity: u32,
    product_id: u32,
    name: String,
    price: u32,
    category: String,
    #[serde(default)]
    price_override: Option<u32>,
}

/// Reads slots from a CSV reader.
///
/// # Errors
///
/// - [`CatalogError::Csv`] - Unreadable file or a field that does not parse,
///   including negative numbers.
/// - [`CatalogError::Row`] - Invalid product or slot, duplicate slot code, or
///   a product id defined twice with different fields.
pub fn load_slots<R: Read>(reader: R) -> Result<Vec<Slot>, CatalogError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow a missing trailing override column
        .has_headers(true)
        .from_reader(reader);

    let mut products: BTreeMap<ProductId, Arc<Product>> = BTreeMap::new();
    let mut codes = HashSet::new();
    let mut slots = Vec::new();

    for (index, result) in rdr.deserialize::<SlotRecord>().enumerate() {
        let record = result?;
        // Header is line 1.
        let line = index + 2;
        let slot = build_slot(record, &mut products, &mut codes)
            .map_err(|source| CatalogError::Row { line, source })?;
        slots.push(slot);
    }

    Ok(slots)
}

fn build_slot(
    record: SlotRecord,
    products: &mut BTreeMap<ProductId, Arc<Product>>,
    codes: &mut HashSet<SlotCode>,
) -> Result<Slot, VendingError> {
    let product = Product::new(
        ProductId(record.product_id),
        record.name,
        record.price,
        record.category,
    )?;

    let product = match products.get(&product.id()) {
        Some(known) if **known == product => Arc::clone(known),
        Some(known) => {
            return Err(VendingError::invalid(format!(
                "product {} redefined: {} vs {}",
                product.id(),
                known,
                product
            )));
        }
        None => {
            let product = Arc::new(product);
            products.insert(product.id(), Arc::clone(&product));
            product
        }
    };

    let slot = Slot::new(
        &record.code,
        record.capacity,
        record.quantity,
        product,
        record.price_override,
    )?;
    if !codes.insert(slot.code().clone()) {
        return Err(VendingError::invalid(format!(
            "duplicate slot code {}",
            slot.code()
        )));
    }

    Ok(slot)
}

/// Parses a coin float such as `20=5,10=8,1=20`.
///
/// Denominations left out are zero. Each denomination may appear once.
pub fn parse_coin_float(text: &str) -> Result<CoinCounts, VendingError> {
    let mut coins = CoinCounts::new();
    let mut seen = HashSet::new();

    for pair in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (denomination, count) = pair
            .split_once('=')
            .ok_or_else(|| VendingError::invalid(format!("expected <coin>=<count>, got {pair:?}")))?;
        let denomination: Denomination = denomination.parse()?;
        let count: u32 = count.trim().parse().map_err(|_| {
            VendingError::invalid(format!("coin count must be a whole number >= 0, got {count:?}"))
        })?;
        if !seen.insert(denomination) {
            return Err(VendingError::invalid(format!(
                "{denomination} listed more than once"
            )));
        }
        coins.set(denomination, count);
    }

    Ok(coins)
}

/// The stock product line-up.
pub fn default_products() -> Result<Vec<Arc<Product>>, VendingError> {
    let products = [
        (1, "Cola", 15, "Drink"),
        (2, "Faxe Kondi", 15, "Drink"),
        (3, "Iskaffe", 20, "Drink"),
        (4, "Chips", 12, "Snack"),
        (5, "Müsli-bar", 10, "Snack"),
        (6, "Snickers", 11, "Snack"),
        (7, "Vand", 10, "Drink"),
        (8, "KitKat", 12, "Snack"),
    ];

    products
        .into_iter()
        .map(|(id, name, price, category)| {
            Product::new(ProductId(id), name, price, category).map(Arc::new)
        })
        .collect()
}

/// Stock layout: drinks in row A (capacity 10), snacks and water in rows B
/// and C (capacity 8), five items each.
pub fn default_slots() -> Result<Vec<Slot>, VendingError> {
    let products = default_products()?;
    let layout = [
        ("A1", 10), ("A2", 10), ("A3", 10),
        ("B1", 8), ("B2", 8), ("B3", 8),
        ("C1", 8), ("C2", 8),
    ];

    layout
        .into_iter()
        .zip(products)
        .map(|((code, capacity), product)| Slot::new(code, capacity, 5, product, None))
        .collect()
}

pub fn default_coin_float() -> CoinCounts {
    CoinCounts::from([
        (Denomination::Twenty, 5),
        (Denomination::Ten, 8),
        (Denomination::Five, 10),
        (Denomination::Two, 10),
        (Denomination::One, 20),
    ])
}

/// A machine with the stock layout and coin float.
pub fn default_machine() -> Result<VendingMachine, VendingError> {
    VendingMachine::in_memory(default_slots()?, default_coin_float())
}
