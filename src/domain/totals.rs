use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use serde::{Deserialize, Serialize};

/// Decimal places of the store currency
pub const CURRENCY_DP: u32 = 2;

/// Round an amount to currency precision
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount to the gateway's minor units (e.g. pence)
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (round_currency(amount) * Decimal::ONE_HUNDRED).to_i64()
}

/// Subtotal, tax and total of a set of priced lines.
///
/// Invariant: `total == subtotal + tax` and `tax == subtotal * tax_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax = subtotal * tax_rate;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Sum of `(quantity, unit price)` pairs
    pub fn from_lines<I>(lines: I, tax_rate: Decimal) -> Self
    where
        I: IntoIterator<Item = (u32, Decimal)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(quantity, price)| Decimal::from(quantity) * price)
            .sum();
        Self::from_subtotal(subtotal, tax_rate)
    }

    /// Rounded to currency precision, for display and persistence.
    ///
    /// The total is the sum of the rounded parts so `total == subtotal + tax` still holds.
    pub fn rounded(&self) -> Self {
        let subtotal = round_currency(self.subtotal);
        let tax = round_currency(self.tax);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}
