use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::TransactionType;

pub const CURRENCY: &str = "TND";
/// Dinar amounts are shown down to the millime.
const DECIMAL_PLACES: u32 = 3;

/// Formats the magnitude of `amount` with thousands separated by spaces and
/// exactly three decimals. Credits get a "+" and debits a "-".
pub fn format_amount(amount: Decimal, type_: Option<&TransactionType>) -> String {
    let sign = match type_ {
        Some(TransactionType::Credit) => "+",
        Some(TransactionType::Debit) => "-",
        _ => "",
    };
    format!("{}{} {}", sign, group_digits(amount.abs()), CURRENCY)
}

/// Formats a balance, keeping its sign.
pub fn format_balance(balance: Decimal) -> String {
    let sign = if balance < Decimal::ZERO { "-" } else { "" };
    format!("{}{} {}", sign, group_digits(balance.abs()), CURRENCY)
}

/// Plain fixed-point rendering used in machine-readable output.
pub fn fixed(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", DECIMAL_PLACES as usize, rounded)
}

fn group_digits(magnitude: Decimal) -> String {
    let s = fixed(magnitude);
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}
