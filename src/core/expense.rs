//! The expense record and the form it is built from.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// A single expense converted from one currency to another.
///
/// `converted_amount` is a snapshot taken with the rate fetched when the record
/// was created or last edited; it is never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub description: String,
    pub quantity: f64,
    pub amount: f64,
    pub currency_from: String,
    pub currency_to: String,
    pub converted_amount: f64,
}

impl Expense {
    /// Value of the expense in its source currency.
    pub fn origin_total(&self) -> f64 {
        self.amount * self.quantity
    }
}

impl Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Qty. {}): {} {} => {} {}",
            self.description,
            self.quantity,
            self.amount,
            self.currency_from,
            self.converted_amount,
            self.currency_to
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} must be greater than zero, got '{value}'")]
    NotPositive { field: &'static str, value: String },
    #[error("{field} must be a currency code, got '{value}'")]
    InvalidCurrency { field: &'static str, value: String },
}

/// Raw form values as typed by the user.
///
/// Numbers are kept as text so that parsing is part of validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub description: String,
    pub quantity: String,
    pub amount: String,
    pub currency_from: String,
    pub currency_to: String,
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub description: String,
    pub quantity: f64,
    pub amount: f64,
    pub currency_from: String,
    pub currency_to: String,
}

impl ValidExpense {
    pub fn into_expense(self, converted_amount: f64) -> Expense {
        Expense {
            description: self.description,
            quantity: self.quantity,
            amount: self.amount,
            currency_from: self.currency_from,
            currency_to: self.currency_to,
            converted_amount,
        }
    }
}

impl ExpenseForm {
    /// An empty form with both currencies set to `currency`.
    pub fn cleared(currency: &str) -> Self {
        Self {
            currency_from: currency.to_string(),
            currency_to: currency.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ValidExpense, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        Ok(ValidExpense {
            description: description.to_string(),
            quantity: parse_positive("quantity", &self.quantity)?,
            amount: parse_positive("amount", &self.amount)?,
            currency_from: parse_currency("currency_from", &self.currency_from)?,
            currency_to: parse_currency("currency_to", &self.currency_to)?,
        })
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            quantity: expense.quantity.to_string(),
            amount: expense.amount.to_string(),
            currency_from: expense.currency_from.clone(),
            currency_to: expense.currency_to.clone(),
        }
    }
}

fn parse_positive(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn parse_currency(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrency {
            field,
            value: raw.to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}
