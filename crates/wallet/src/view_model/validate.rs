//! Send-form validation. Runs before any provider call.

use super::SendForm;
use crate::{
    error::ValidationError,
    units::{self, Balance},
};
use alloy_primitives::{Address, U256};

/// Demo recipients only need to look vaguely like an address.
const MIN_DEMO_RECIPIENT_LEN: usize = 10;

/// A form that passed validation for a real send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidSend {
    pub to: Address,
    pub value: U256,
    pub gas_price: U256,
}

pub fn validate_send(form: &SendForm, balance: Balance) -> Result<ValidSend, ValidationError> {
    let value = validate_common(form, balance)?;
    let recipient = form.recipient.trim();
    if !units::is_valid_address(recipient) {
        return Err(ValidationError::InvalidAddress);
    }
    let to = recipient.parse::<Address>().map_err(|_| ValidationError::InvalidAddress)?;
    let gas_price = units::gwei_to_wei(&form.gas_price).ok_or(ValidationError::InvalidGasPrice)?;
    Ok(ValidSend { to, value, gas_price })
}

/// Returns the amount in wei.
pub fn validate_demo_send(form: &SendForm, balance: Balance) -> Result<U256, ValidationError> {
    let value = validate_common(form, balance)?;
    if form.recipient.trim().chars().count() < MIN_DEMO_RECIPIENT_LEN {
        return Err(ValidationError::RecipientTooShort);
    }
    Ok(value)
}

fn validate_common(form: &SendForm, balance: Balance) -> Result<U256, ValidationError> {
    if form.recipient.trim().is_empty() {
        return Err(ValidationError::EmptyRecipient);
    }
    let value = units::parse_amount(&form.amount)
        .filter(|value| !value.is_zero())
        .ok_or(ValidationError::InvalidAmount)?;
    if value > spendable(balance) {
        return Err(ValidationError::InsufficientBalance);
    }
    Ok(value)
}

/// The lower of the exact balance and the rounded balance the user sees.
fn spendable(balance: Balance) -> U256 {
    let displayed = units::parse_amount(&balance.to_string()).unwrap_or_default();
    displayed.min(balance.wei())
}
