//! Unit conversion and display helpers.

use alloy_primitives::{
    Address, I256, U256,
    utils::{ParseUnits, Unit, format_units},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits balances and amounts are displayed with.
pub const DISPLAY_DECIMALS: u8 = 4;

/// A native-currency amount held in wei, displayed in ether with [`DISPLAY_DECIMALS`] digits.
///
/// Signed so a simulated balance can be overdrawn by fees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(I256);

impl Balance {
    pub const ZERO: Self = Self(I256::ZERO);

    pub fn from_wei(wei: U256) -> Self {
        Self(I256::try_from(wei).unwrap_or(I256::MAX))
    }

    /// The balance in wei, zero when overdrawn.
    pub fn wei(&self) -> U256 {
        if self.is_negative() { U256::ZERO } else { self.0.into_raw() }
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Parses an ether-denominated decimal string, see [`parse_amount`].
    pub fn parse_ether(s: &str) -> Option<Self> {
        parse_amount(s).map(Self::from_wei)
    }

    /// Subtracts `amount`, going below zero if it exceeds the balance.
    pub fn debit(self, amount: U256) -> Self {
        let amount = I256::try_from(amount).unwrap_or(I256::MAX);
        Self(self.0.saturating_sub(amount))
    }
}

impl From<U256> for Balance {
    fn from(wei: U256) -> Self {
        Self::from_wei(wei)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&format_ether_rounded(self.0.unsigned_abs(), DISPLAY_DECIMALS))
    }
}

/// Formats `wei` in ether with exactly `decimals` fractional digits, rounding half up.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use defiguard_wallet::units::format_ether_rounded as f;
///
/// assert_eq!(f(U256::ZERO, 4), "0.0000");
/// assert_eq!(f(U256::from(1_500_000_000_000_000_000u128), 4), "1.5000");
/// assert_eq!(f(U256::from(123_456_789_000_000u128), 4), "0.0001");
/// assert_eq!(f(U256::from(99_995_000_000_000_000u128), 4), "0.1000");
/// ```
pub fn format_ether_rounded(wei: U256, decimals: u8) -> String {
    let decimals = decimals.min(18);
    let step = U256::from(10).pow(U256::from(18 - decimals));
    let rounded = wei.saturating_add(step / U256::from(2)) / step;
    if decimals == 0 {
        return rounded.to_string();
    }

    let scale = U256::from(10).pow(U256::from(decimals));
    let (int, frac) = (rounded / scale, rounded % scale);
    format!("{int}.{:0width$}", frac.to::<u64>(), width = decimals as usize)
}

/// Parses a non-negative, ether-denominated decimal string into wei.
///
/// Returns `None` for empty, negative or malformed input.
pub fn parse_amount(amount: &str) -> Option<U256> {
    let amount = amount.trim();
    if amount.is_empty() || amount.starts_with('-') {
        return None;
    }
    ParseUnits::parse_units(amount, Unit::ETHER).ok().map(ParseUnits::get_absolute)
}

/// Parses a non-negative gwei-denominated decimal string into wei.
pub fn gwei_to_wei(gwei: &str) -> Option<U256> {
    let gwei = gwei.trim();
    if gwei.is_empty() || gwei.starts_with('-') {
        return None;
    }
    ParseUnits::parse_units(gwei, Unit::GWEI).ok().map(ParseUnits::get_absolute)
}

/// Reformats a decimal ether string with `decimals` fractional digits.
///
/// Non-numeric input renders as zero.
///
/// # Examples
///
/// ```
/// use defiguard_wallet::units::format_balance;
///
/// assert_eq!(format_balance("0.1", 4), "0.1000");
/// assert_eq!(format_balance("-1.5", 4), "-1.5000");
/// assert_eq!(format_balance("abc", 4), "0.0000");
/// ```
pub fn format_balance(balance: &str, decimals: u8) -> String {
    let balance = balance.trim();
    let (negative, magnitude) = match balance.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, balance),
    };
    let Some(wei) = parse_amount(magnitude) else {
        return format_ether_rounded(U256::ZERO, decimals);
    };

    let formatted = format_ether_rounded(wei, decimals);
    if negative && formatted.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Truncates an address for display, keeping `start` leading and `end` trailing characters.
///
/// # Examples
///
/// ```
/// use defiguard_wallet::units::format_address;
///
/// assert_eq!(
///     format_address("0x742d35Cc6635Bc0532E3D7b2b9C24B2c5f07c9E7", 6, 4),
///     "0x742d...c9E7"
/// );
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= start + end {
        return address.to_string();
    }
    let head: String = chars[..start].iter().collect();
    let tail: String = chars[chars.len() - end..].iter().collect();
    format!("{head}...{tail}")
}

/// Format-only address validation.
///
/// Accepts 40 hex digits with an optional `0x` prefix. Single-case input is accepted as is;
/// mixed-case input must carry a valid EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let lower = !hex.bytes().any(|b| b.is_ascii_uppercase());
    let upper = !hex.bytes().any(|b| b.is_ascii_lowercase());
    lower || upper || Address::parse_checksummed(format!("0x{hex}"), None).is_ok()
}

/// Computes `gas_used * gas_price` in ether.
///
/// Returns `"0"` if the gas price is not a valid gwei amount.
pub fn transaction_fee(gas_used: u64, gas_price_gwei: &str) -> String {
    gwei_to_wei(gas_price_gwei)
        .and_then(|price| price.checked_mul(U256::from(gas_used)))
        .and_then(|fee| format_units(fee, "ether").ok())
        .map(|fee| trim_decimal(&fee))
        .unwrap_or_else(|| "0".to_string())
}

/// Strips trailing fractional zeros (and a dangling point) from a decimal string.
fn trim_decimal(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
