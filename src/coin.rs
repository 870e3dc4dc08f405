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

//! Coin denominations and per-denomination count tables.

use crate::VendingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coin accepted by the machine. Face values are whole kroner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Denomination {
    One,
    Two,
    Five,
    Ten,
    Twenty,
}

impl Denomination {
    /// Every denomination, largest face value first.
    ///
    /// Change-making walks this list in order; reordering it changes which
    /// amounts the greedy selection can reach.
    pub const ALL: [Denomination; 5] = [
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::Two,
        Denomination::One,
    ];

    pub const fn value(self) -> u32 {
        match self {
            Denomination::One => 1,
            Denomination::Two => 2,
            Denomination::Five => 5,
            Denomination::Ten => 10,
            Denomination::Twenty => 20,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.value() == value)
    }

    /// Position in [`Denomination::ALL`].
    const fn index(self) -> usize {
        match self {
            Denomination::Twenty => 0,
            Denomination::Ten => 1,
            Denomination::Five => 2,
            Denomination::Two => 3,
            Denomination::One => 4,
        }
    }
}

impl FromStr for Denomination {
    type Err = VendingError;

    /// Parses a face value such as `"20"` or `"20kr"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix("kr")
            .or_else(|| trimmed.strip_suffix("kr."))
            .unwrap_or(trimmed)
            .trim();
        digits
            .parse::<u32>()
            .ok()
            .and_then(Denomination::from_value)
            .ok_or_else(|| VendingError::invalid(format!("unknown coin: {s:?}")))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kr", self.value())
    }
}

/// Coin count for every denomination.
///
/// Dense table: every denomination always has an entry, zero when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CoinCounts([u32; 5]);

impl CoinCounts {
    pub const fn new() -> Self {
        CoinCounts([0; 5])
    }

    pub fn get(&self, denomination: Denomination) -> u32 {
        self.0[denomination.index()]
    }

    pub fn set(&mut self, denomination: Denomination, count: u32) {
        self.0[denomination.index()] = count;
    }

    pub(crate) fn get_mut(&mut self, denomination: Denomination) -> &mut u32 {
        &mut self.0[denomination.index()]
    }

    /// `(denomination, count)` pairs, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// Number of coins, regardless of denomination.
    pub fn coin_count(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Weighted sum of count × face value.
    pub fn value(&self) -> u64 {
        self.iter()
            .map(|(d, count)| u64::from(count) * u64::from(d.value()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }
}

impl FromIterator<(Denomination, u32)> for CoinCounts {
    /// Sums repeated denominations.
    fn from_iter<I: IntoIterator<Item = (Denomination, u32)>>(iter: I) -> Self {
        let mut counts = CoinCounts::new();
        for (denomination, count) in iter {
            let slot = counts.get_mut(denomination);
            *slot = slot.saturating_add(count);
        }
        counts
    }
}

impl<const N: usize> From<[(Denomination, u32); N]> for CoinCounts {
    fn from(pairs: [(Denomination, u32); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for CoinCounts {
    /// Lists non-zero denominations, e.g. `10 kr x1, 2 kr x2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(no coins)");
        }
        let mut first = true;
        for (denomination, count) in self.iter().filter(|(_, c)| *c > 0) {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{denomination} x{count}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_ordered_largest_first() {
        let values: Vec<u32> = Denomination::ALL.iter().map(|d| d.value()).collect();
        assert_eq!(values, vec![20, 10, 5, 2, 1]);
    }

    #[test]
    fn from_value_round_trips_known_coins() {
        for denomination in Denomination::ALL {
            assert_eq!(
                Denomination::from_value(denomination.value()),
                Some(denomination)
            );
        }
        assert_eq!(Denomination::from_value(3), None);
        assert_eq!(Denomination::from_value(0), None);
    }

    #[test]
    fn parse_accepts_face_values() {
        assert_eq!("20".parse::<Denomination>(), Ok(Denomination::Twenty));
        assert_eq!(" 5 ".parse::<Denomination>(), Ok(Denomination::Five));
        assert_eq!("10kr".parse::<Denomination>(), Ok(Denomination::Ten));
        assert!(matches!(
            "50".parse::<Denomination>(),
            Err(VendingError::InvalidArgument(_))
        ));
        assert!(matches!(
            "-1".parse::<Denomination>(),
            Err(VendingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn new_counts_have_every_denomination_at_zero() {
        let counts = CoinCounts::new();
        for denomination in Denomination::ALL {
            assert_eq!(counts.get(denomination), 0);
        }
        assert!(counts.is_empty());
        assert_eq!(counts.value(), 0);
    }

    #[test]
    fn value_is_weighted_sum() {
        let counts = CoinCounts::from([
            (Denomination::Twenty, 2),
            (Denomination::Five, 3),
            (Denomination::One, 1),
        ]);
        assert_eq!(counts.value(), 56);
        assert_eq!(counts.coin_count(), 6);
    }

    #[test]
    fn collect_sums_repeated_denominations() {
        let counts: CoinCounts = vec![(Denomination::Two, 1), (Denomination::Two, 2)]
            .into_iter()
            .collect();
        assert_eq!(counts.get(Denomination::Two), 3);
    }

    #[test]
    fn display_skips_zero_entries() {
        let counts = CoinCounts::from([(Denomination::Ten, 1), (Denomination::Two, 2)]);
        assert_eq!(counts.to_string(), "10 kr x1, 2 kr x2");
        assert_eq!(CoinCounts::new().to_string(), "(no coins)");
    }
}
