//! Currency conversion arithmetic and list totals.
use crate::core::expense::Expense;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
///
/// Returns `None` for non-finite input. Values beyond `Decimal`'s range have
/// no fractional cents left in an `f64` and come back unchanged.
pub fn round2(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64(),
        None => Some(value),
    }
}

/// Converts `quantity` units of `amount` with `rate`, rounded to cents.
///
/// `None` means the product is not a usable number and must not be stored.
pub fn convert(quantity: f64, amount: f64, rate: f64) -> Option<f64> {
    let product = quantity * amount * rate;
    if !product.is_finite() {
        return None;
    }
    round2(product)
}

/// Aggregates shown under the expense list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of `amount * quantity` in each record's source currency.
    pub origin: f64,
    /// Sum of the stored converted amounts.
    pub destination: f64,
}

pub fn totals(expenses: &[Expense]) -> Totals {
    let (origin, destination) = expenses.iter().fold((0.0, 0.0), |(o, d), e| {
        (o + e.origin_total(), d + e.converted_amount)
    });
    Totals {
        origin: round2(origin).unwrap_or(origin),
        destination: round2(destination).unwrap_or(destination),
    }
}
