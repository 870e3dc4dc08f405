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

//! Core identifier types for products and slots.

use crate::VendingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a catalog product.
///
/// Zero is reserved; [`Product::new`](crate::Product::new) rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Code of a machine slot, e.g. `A1`.
///
/// Codes are trimmed and upper-cased on parse, so `" a1 "` and `"A1"` name
/// the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotCode(String);

impl SlotCode {
    pub fn parse(code: &str) -> Result<Self, VendingError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(VendingError::invalid("slot code must not be empty"));
        }
        if code.chars().any(char::is_whitespace) {
            return Err(VendingError::invalid(format!(
                "slot code must not contain whitespace: {code:?}"
            )));
        }
        Ok(SlotCode(code.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SlotCode {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotCode::parse(s)
    }
}

impl fmt::Display for SlotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
