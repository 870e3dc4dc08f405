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

//! Line-oriented commands understood by the machine's console.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `list` | Show every slot |
//! | `insert <coin> [count]` | Insert coins (count defaults to 1) |
//! | `buy <code or product>` | Buy from a slot, e.g. `buy A1` or `buy cola` |
//! | `cancel` | Refund the inserted amount |
//! | `balance` | Show the inserted amount |
//! | `admin refill <code> <count>` | Add items to a slot |
//! | `admin fill <code>` | Fill a slot to capacity |
//! | `admin fill-all` | Fill every slot to capacity |
//! | `admin price <code> <price or clear>` | Set or clear a price override |
//! | `admin add-coins <coin> <count>` | Add coins to the float |
//! | `admin remove-coins <coin> <count>` | Take coins out of the float |
//! | `admin total` | Show the machine's cash total |
//! | `admin empty` | Empty the cash box |
//! | `admin top-up <coin>=<count>...` | Top the float up to targets |
//! | `help` / `quit` | |
//!
//! Anything else is treated as a purchase target, so `a1` or `snickers` on
//! its own buys directly.

use crate::catalog::parse_coin_float;
use crate::coin::{CoinCounts, Denomination};
use crate::VendingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Insert { coin: Denomination, count: u32 },
    /// Slot code or product name, as typed.
    Buy(String),
    Cancel,
    Balance,
    Refill { code: String, count: u32 },
    Fill(String),
    FillAll,
    SetPrice { code: String, price: Option<u32> },
    AddCoins { coin: Denomination, count: u32 },
    RemoveCoins { coin: Denomination, count: u32 },
    CashTotal,
    EmptyCash,
    TopUp(CoinCounts),
    Help,
    Quit,
}

impl Command {
    /// Parses one console line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, VendingError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let keyword = tokens[0].to_lowercase();
        let args = &tokens[1..];

        let command = match keyword.as_str() {
            "list" | "ls" => {
                expect_args(&keyword, args, 0)?;
                Command::List
            }
            "insert" => match args {
                [coin] => Command::Insert {
                    coin: coin.parse()?,
                    count: 1,
                },
                [coin, count] => Command::Insert {
                    coin: coin.parse()?,
                    count: parse_count(count)?,
                },
                _ => return Err(usage("insert <coin> [count]")),
            },
            "buy" | "køb" => {
                if args.is_empty() {
                    return Err(usage("buy <code or product>"));
                }
                Command::Buy(args.join(" "))
            }
            "cancel" | "refund" => {
                expect_args(&keyword, args, 0)?;
                Command::Cancel
            }
            "balance" => {
                expect_args(&keyword, args, 0)?;
                Command::Balance
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "admin" => parse_admin(args)?,
            _ => Command::Buy(line.to_string()),
        };

        Ok(Some(command))
    }
}

fn parse_admin(args: &[&str]) -> Result<Command, VendingError> {
    let Some((action, rest)) = args.split_first() else {
        return Err(usage("admin <action> ..."));
    };

    let command = match (action.to_lowercase().as_str(), rest) {
        ("refill", [code, count]) => Command::Refill {
            code: code.to_string(),
            count: parse_count(count)?,
        },
        ("fill", [code]) => Command::Fill(code.to_string()),
        ("fill-all", []) => Command::FillAll,
        ("price", [code, price]) => Command::SetPrice {
            code: code.to_string(),
            price: parse_price(price)?,
        },
        ("add-coins", [coin, count]) => Command::AddCoins {
            coin: coin.parse()?,
            count: parse_count(count)?,
        },
        ("remove-coins", [coin, count]) => Command::RemoveCoins {
            coin: coin.parse()?,
            count: parse_count(count)?,
        },
        ("total", []) => Command::CashTotal,
        ("empty", []) => Command::EmptyCash,
        ("top-up", targets) if !targets.is_empty() => {
            Command::TopUp(parse_coin_float(&targets.join(","))?)
        }
        (action, _) => {
            return Err(VendingError::invalid(format!(
                "unknown or malformed admin command: {action}"
            )));
        }
    };

    Ok(command)
}

fn expect_args(keyword: &str, args: &[&str], count: usize) -> Result<(), VendingError> {
    if args.len() != count {
        return Err(VendingError::invalid(format!(
            "{keyword} takes {count} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

fn usage(text: &str) -> VendingError {
    VendingError::invalid(format!("usage: {text}"))
}

/// Whole number `>= 0`; negative or fractional input is rejected.
fn parse_count(text: &str) -> Result<u32, VendingError> {
    text.parse()
        .map_err(|_| VendingError::invalid(format!("count must be a whole number >= 0, got {text:?}")))
}

/// `clear` or `none` removes the override.
fn parse_price(text: &str) -> Result<Option<u32>, VendingError> {
    match text.to_lowercase().as_str() {
        "clear" | "none" => Ok(None),
        _ => text
            .parse()
            .map(Some)
            .map_err(|_| VendingError::invalid(format!("price must be a whole number >= 0, got {text:?}"))),
    }
}
