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

use clap::Parser;
use csv::Writer;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use vending_machine_rs::catalog::{self, CatalogError, DEFAULT_COIN_FLOAT};
use vending_machine_rs::command::Command;
use vending_machine_rs::{CoinCounts, VendingError, VendingMachine};

/// Vending Machine - Coin-operated vending console
///
/// Reads commands (one per line) from a script file or stdin and prints the
/// outcome of each to stdout. Type `help` for the command list.
#[derive(Parser, Debug)]
#[command(name = "vending-machine")]
#[command(about = "A coin-operated vending machine console", long_about = None)]
struct Args {
    /// Command script to run instead of reading stdin
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// CSV file describing the slots
    ///
    /// Expected format: code,capacity,quantity,product_id,name,price,category,price_override
    /// Defaults to the stock eight-slot layout.
    #[arg(long, value_name = "FILE")]
    slots: Option<PathBuf>,

    /// Initial coin float as <coin>=<count> pairs
    #[arg(long, value_name = "COINS", default_value = DEFAULT_COIN_FLOAT)]
    coins: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut machine = match build_machine(&args) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Error setting up machine: {}", e);
            process::exit(1);
        }
    };

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => run_session(&mut machine, BufReader::new(file), io::stdout()),
            Err(e) => {
                eprintln!("Error opening script '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => run_session(&mut machine, io::stdin().lock(), io::stdout()),
    };

    if let Err(e) = result {
        eprintln!("Error running session: {}", e);
        process::exit(1);
    }
}

/// Errors that end the console session.
#[derive(Error, Debug)]
enum SetupError {
    #[error("cannot open slot file '{}': {}", .0.display(), .1)]
    Open(PathBuf, io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Vending(#[from] VendingError),
}

/// Errors raised while executing a single command.
#[derive(Error, Debug)]
enum SessionError {
    /// Reported to the user; the session continues.
    #[error(transparent)]
    Rejected(#[from] VendingError),

    #[error("output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn build_machine(args: &Args) -> Result<VendingMachine, SetupError> {
    let slots = match &args.slots {
        Some(path) => {
            let file = File::open(path).map_err(|e| SetupError::Open(path.clone(), e))?;
            catalog::load_slots(BufReader::new(file))?
        }
        None => catalog::default_slots()?,
    };
    let coins = catalog::parse_coin_float(&args.coins)?;

    Ok(VendingMachine::in_memory(slots, coins)?)
}

enum Flow {
    Continue,
    Quit,
}

/// Runs commands from `input` until it ends or `quit` is read.
///
/// Rejected commands are reported as `Error: <reason>` and do not stop the
/// session; only I/O failures do.
fn run_session<R: BufRead, W: Write>(
    machine: &mut VendingMachine,
    input: R,
    mut output: W,
) -> Result<(), SessionError> {
    for line in input.lines() {
        let line = line?;

        let outcome = Command::parse(&line)
            .map_err(SessionError::from)
            .and_then(|command| match command {
                Some(command) => execute(machine, command, &mut output),
                None => Ok(Flow::Continue),
            });

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(SessionError::Rejected(e)) => writeln!(output, "Error: {}", e)?,
            Err(e) => return Err(e),
        }
    }

    output.flush()?;
    Ok(())
}

fn execute<W: Write>(
    machine: &mut VendingMachine,
    command: Command,
    out: &mut W,
) -> Result<Flow, SessionError> {
    match command {
        Command::List => write_slots(machine, &mut *out)?,
        Command::Insert { coin, count } => {
            machine.insert_coin(coin, count)?;
            writeln!(out, "Inserted: {} kr.", machine.inserted_amount())?;
        }
        Command::Buy(target) => buy(machine, &target, out)?,
        Command::Cancel => {
            let refund = machine.cancel_and_return()?;
            writeln!(out, "Refunded: {}", describe_change(&refund))?;
        }
        Command::Balance => writeln!(out, "Inserted: {} kr.", machine.inserted_amount())?,
        Command::Refill { code, count } => {
            machine.refill_slot(&code, count)?;
            writeln!(out, "Refilled {} with {} item(s).", code.to_uppercase(), count)?;
        }
        Command::Fill(code) => {
            let added = machine.refill_slot_to_capacity(&code)?;
            writeln!(out, "Added {} item(s) to {}.", added, code.to_uppercase())?;
        }
        Command::FillAll => {
            for (code, added) in machine.refill_all_slots_to_capacity()? {
                writeln!(out, "Added {} item(s) to {}.", added, code)?;
            }
        }
        Command::SetPrice { code, price } => {
            machine.set_slot_price_override(&code, price)?;
            match price {
                Some(price) => writeln!(out, "Price of {} set to {} kr.", code.to_uppercase(), price)?,
                None => writeln!(out, "Price override of {} cleared.", code.to_uppercase())?,
            }
        }
        Command::AddCoins { coin, count } => {
            machine.admin_add_coins(coin, count)?;
            writeln!(out, "Added {} x {}.", count, coin)?;
        }
        Command::RemoveCoins { coin, count } => {
            machine.admin_remove_coins(coin, count)?;
            writeln!(out, "Removed {} x {}.", count, coin)?;
        }
        Command::CashTotal => {
            writeln!(out, "Machine cash total: {} kr.", machine.machine_cash_total())?;
            writeln!(out, "Coins: {}", machine.coin_inventory())?;
        }
        Command::EmptyCash => {
            let emptied = machine.admin_empty_cash()?;
            writeln!(out, "Emptied: {} ({} kr.)", emptied, emptied.value())?;
        }
        Command::TopUp(targets) => {
            let added = machine.admin_top_up_coin_float(&targets)?;
            writeln!(out, "Topped up: {}", added)?;
        }
        Command::Help => out.write_all(HELP.as_bytes())?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Resolves `target` as a slot code or product name, explains why a purchase
/// cannot go through, and otherwise buys.
fn buy<W: Write>(machine: &mut VendingMachine, target: &str, out: &mut W) -> Result<(), SessionError> {
    let slot = machine
        .slot(target)
        .or_else(|| machine.find_slot_by_product_name(target))
        .ok_or_else(|| VendingError::NotFound(target.trim().to_string()))?;
    let code = slot.code().clone();

    if !slot.has_stock() {
        writeln!(out, "Out of stock.")?;
        return Ok(());
    }

    let price = slot.price();
    let inserted = machine.inserted_amount();
    if inserted < price {
        writeln!(out, "Not enough money. Need {} kr. more.", price - inserted)?;
        return Ok(());
    }
    if !machine.can_purchase(code.as_str()) {
        writeln!(
            out,
            "Cannot provide correct change ({} kr.). Try exact amount or different coins.",
            inserted - price
        )?;
        return Ok(());
    }

    let result = machine.purchase(code.as_str())?;
    writeln!(out, "Bought: {}", result.product().name())?;

    let remaining = machine.slot(code.as_str()).map_or(0, |slot| slot.quantity());
    writeln!(out, "Remaining in {}: {}", code, remaining)?;
    if remaining == 0 {
        writeln!(out, "Note: Slot {} is now EMPTY.", code)?;
    }
    writeln!(out, "Change: {}", describe_change(&result.change()))?;

    Ok(())
}

fn describe_change(change: &CoinCounts) -> String {
    if change.is_empty() {
        "(no change)".to_string()
    } else {
        change.to_string()
    }
}

/// Write the slot overview as CSV
///
/// # CSV Format
///
/// Columns: `code, product, category, price, quantity, capacity, status`
fn write_slots<W: Write>(machine: &VendingMachine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for slot in machine.slots() {
        wtr.serialize(slot)?;
    }

    wtr.flush()?;
    Ok(())
}

const HELP: &str = "\
Commands:
  list                              show every slot
  insert <coin> [count]             insert coins (1, 2, 5, 10, 20)
  buy <code or product>             buy, e.g. `buy A1` or `buy cola`
  cancel                            refund the inserted amount
  balance                           show the inserted amount
  admin refill <code> <count>       add items to a slot
  admin fill <code>                 fill a slot to capacity
  admin fill-all                    fill every slot to capacity
  admin price <code> <price|clear>  set or clear a price override
  admin add-coins <coin> <count>    add coins to the float
  admin remove-coins <coin> <count> take coins out of the float
  admin total                       show the machine's cash total
  admin empty                       empty the cash box
  admin top-up <coin>=<count>...    top the float up to targets
  quit                              leave
A bare slot code or product name buys directly.
";
