use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Colombian pesos are displayed without decimal subunits
pub const COP_SCALE: u32 = 0;

/// Currency symbol used by the es-CO locale
pub const COP_SYMBOL: &str = "$";

const THOUSANDS_SEPARATOR: char = '.';
const NBSP: char = '\u{a0}';

/// Rounds an amount to whole pesos (half away from zero, as the browser locale formatter does)
pub fn round_cop(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(COP_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as Colombian pesos, e.g. `$ 1.000.000` (non-breaking space after the symbol)
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_cop(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let grouped = group_thousands(&digits);

    if negative {
        format!("-{}{}{}", COP_SYMBOL, NBSP, grouped)
    } else {
        format!("{}{}{}", COP_SYMBOL, NBSP, grouped)
    }
}

/// Formats a numeric string (as stored or sent by clients) as Colombian pesos
pub fn format_currency_str(value: &str) -> Result<String> {
    let amount = Decimal::from_str(value.trim())
        .map_err(|_| AppError::validation(format!("Invalid numeric value: '{}'", value)))?;
    Ok(format_currency(amount))
}

/// Checks that a monetary input is strictly positive
pub fn validate_positive(field: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Scale of the DECIMAL(15, 2) money columns
pub const STORAGE_SCALE: u32 = 2;

/// Largest value a DECIMAL(15, 2) column holds: 9.999.999.999.999,99
pub const MAX_STORED_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Round a money figure to the storage scale, half away from zero like MySQL does
pub fn round_for_storage(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(STORAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A money input the ledger can hold exactly: positive, at most two
/// decimals and within the column range
pub fn validate_amount(field: &str, amount: Decimal) -> Result<()> {
    validate_positive(field, amount)?;

    if amount.normalize().scale() > STORAGE_SCALE {
        return Err(AppError::validation(format!(
            "{} must have at most {} decimal places",
            field, STORAGE_SCALE
        )));
    }

    if amount > MAX_STORED_AMOUNT {
        return Err(AppError::validation(format!(
            "{} must not exceed {}",
            field, MAX_STORED_AMOUNT
        )));
    }

    Ok(())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }

    out
}
