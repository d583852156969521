//! Terminal rendering of wallet state.

use alloy_primitives::utils::format_units;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use defiguard_wallet::{
    Direction, Mode, TxRecord, WalletState,
    provider::{GasPriceRecommendation, TransactionDetails, TxStatus},
    units::{self, Balance},
};
use yansi::Paint;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

/// Account, balance and network of the current session.
pub fn status_table(state: &WalletState) -> Table {
    let mut table = table();
    let mode_color = match state.mode {
        Mode::Connected => Color::Green,
        Mode::Demo => Color::Cyan,
        Mode::Connecting => Color::Yellow,
        Mode::Disconnected => Color::Red,
    };
    table.add_row([Cell::new("Status"), Cell::new(state.mode).fg(mode_color)]);
    if let Some(account) = state.account {
        table.add_row([Cell::new("Account"), Cell::new(account)]);
    }
    if state.mode.is_active() {
        table.add_row([Cell::new("Balance"), Cell::new(format!("{} ETH", state.balance))]);
    }
    if let Some(network) = &state.network {
        table.add_row([Cell::new("Network"), Cell::new(network)]);
    }
    if state.sending {
        table.add_row([Cell::new("Pending send"), Cell::new("yes").fg(Color::Yellow)]);
    }
    table
}

/// The transaction history, newest first.
pub fn history_table(records: &[TxRecord]) -> Table {
    let mut table = table();
    table.set_header(["Hash", "Type", "From / To", "Value (ETH)", "Block", "Time"]);
    for record in records {
        let (kind, color) = match record.direction {
            Direction::Sent => ("sent", Color::Red),
            Direction::Received => ("received", Color::Green),
        };
        table.add_row([
            Cell::new(record.short_hash()),
            Cell::new(kind).fg(color),
            Cell::new(units::format_address(record.counterparty(), 6, 4)),
            Cell::new(record.value_display()),
            Cell::new(record.block),
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}

pub fn gas_table(gas: &GasPriceRecommendation) -> Table {
    let mut table = table();
    table.set_header(["Speed", "Gas price (gwei)"]);
    table.add_row([Cell::new("slow"), Cell::new(gas.slow)]);
    table.add_row([Cell::new("standard"), Cell::new(gas.standard)]);
    table.add_row([Cell::new("fast"), Cell::new(gas.fast)]);
    table
}

pub fn transaction_table(details: &TransactionDetails) -> Table {
    let tx = &details.transaction;
    let (status, color) = match details.status {
        TxStatus::Pending => ("pending", Color::Yellow),
        TxStatus::Success => ("success", Color::Green),
        TxStatus::Failed => ("failed", Color::Red),
    };

    let mut table = table();
    table.add_row([Cell::new("Hash"), Cell::new(tx.hash)]);
    table.add_row([Cell::new("Status"), Cell::new(status).fg(color)]);
    table.add_row([Cell::new("From"), Cell::new(tx.from)]);
    table.add_row([
        Cell::new("To"),
        Cell::new(tx.to.map_or_else(|| "Contract Creation".to_string(), |to| to.to_string())),
    ]);
    table.add_row([
        Cell::new("Value"),
        Cell::new(format!("{} ETH", Balance::from_wei(tx.value))),
    ]);
    table.add_row([
        Cell::new("Block"),
        Cell::new(details.block_number.map_or_else(|| "Pending".to_string(), |n| n.to_string())),
    ]);
    if let Some(gas_used) = details.gas_used {
        table.add_row([Cell::new("Gas used"), Cell::new(gas_used)]);
        if let Some(gwei) = tx.gas_price.and_then(|price| format_units(price, "gwei").ok()) {
            let fee = units::transaction_fee(gas_used, &gwei);
            table.add_row([Cell::new("Fee"), Cell::new(format!("{fee} ETH"))]);
        }
    }
    table
}

/// The pending error and success notices of `state`, painted.
pub fn notices(state: &WalletState) -> Vec<String> {
    let mut notices = Vec::new();
    if let Some(error) = &state.error {
        notices.push(format!("{} {error}", "Error:".red().bold()));
    }
    if let Some(success) = &state.success {
        notices.push(success.green().to_string());
    }
    notices
}
