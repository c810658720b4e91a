//! Add/edit/remove orchestration over the expense store.
//!
//! The workflow owns the form state and the index of the record being edited.
//! Submitting validates the form, looks up the rate (the only await point),
//! converts, writes the whole list back and re-renders. Any failure before
//! the write leaves the stored list as it was.
use crate::core::conversion::{Totals, convert, totals};
use crate::core::currency::{CurrencyRateProvider, RateLookupError};
use crate::core::expense::{Expense, ExpenseForm, ValidationError};
use crate::core::ledger::ExpenseStore;
use crate::core::storage::StorageError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    RateLookup(#[from] RateLookupError),
    #[error("Converting {quantity} x {amount} at rate {rate} is not a finite amount")]
    Conversion { quantity: f64, amount: f64, rate: f64 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExpenseError {
    /// Short message suitable for showing to the person filling the form.
    pub fn user_message(&self) -> String {
        match self {
            ExpenseError::Validation(e) => format!("Please fill in all fields correctly: {e}"),
            ExpenseError::RateLookup(_) => {
                "Could not get the exchange rate. Please try again later.".to_string()
            }
            ExpenseError::Conversion { .. } => {
                "The converted amount is too large to store.".to_string()
            }
            ExpenseError::Storage(StorageError::IndexOutOfRange { index, .. }) => {
                format!("There is no expense #{index}.")
            }
            ExpenseError::Storage(e) => format!("Could not access saved expenses: {e}"),
        }
    }
}

/// Receives the current list after every change.
pub trait ExpenseRenderer {
    fn render(&self, expenses: &[Expense], totals: &Totals);
}

impl<F> ExpenseRenderer for F
where
    F: Fn(&[Expense], &Totals),
{
    fn render(&self, expenses: &[Expense], totals: &Totals) {
        self(expenses, totals)
    }
}

pub struct ExpenseWorkflow {
    store: ExpenseStore,
    rates: Arc<dyn CurrencyRateProvider>,
    renderer: Box<dyn ExpenseRenderer>,
    default_currency: String,
    form: ExpenseForm,
    editing: Option<usize>,
}

impl ExpenseWorkflow {
    pub fn new(
        store: ExpenseStore,
        rates: Arc<dyn CurrencyRateProvider>,
        renderer: Box<dyn ExpenseRenderer>,
        default_currency: &str,
    ) -> Self {
        Self {
            store,
            rates,
            renderer,
            default_currency: default_currency.to_string(),
            form: ExpenseForm::cleared(default_currency),
            editing: None,
        }
    }

    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ExpenseForm {
        &mut self.form
    }

    /// Index captured by [`Self::begin_edit`], `None` in add mode.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Renders the stored list as is. Used on start-up.
    pub fn refresh(&self) -> Result<Totals, ExpenseError> {
        let expenses = self.store.load_all()?;
        Ok(self.render(&expenses))
    }

    /// Switches to edit mode for the record at `index` and fills the form
    /// with its values.
    pub fn begin_edit(&mut self, index: usize) -> Result<&ExpenseForm, ExpenseError> {
        let expenses = self.store.load_all()?;
        let expense = expenses.get(index).ok_or(StorageError::IndexOutOfRange {
            index,
            len: expenses.len(),
        })?;

        debug!(index, "Entering edit mode");
        self.form = ExpenseForm::from(expense);
        self.editing = Some(index);
        Ok(&self.form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form = ExpenseForm::cleared(&self.default_currency);
    }

    /// Submits the current form. See [`Self::submit`].
    pub async fn submit_form(&mut self) -> Result<Expense, ExpenseError> {
        let values = self.form.clone();
        self.submit(values).await
    }

    /// Validates `values`, converts them and appends (add mode) or replaces
    /// the captured record (edit mode).
    #[instrument(name = "SubmitExpense", skip(self, values), fields(editing = ?self.editing))]
    pub async fn submit(&mut self, values: ExpenseForm) -> Result<Expense, ExpenseError> {
        let valid = values.validate()?;

        let rate = self
            .rates
            .get_rate(&valid.currency_from, &valid.currency_to)
            .await?;

        let converted = convert(valid.quantity, valid.amount, rate).ok_or(
            ExpenseError::Conversion {
                quantity: valid.quantity,
                amount: valid.amount,
                rate,
            },
        )?;
        let expense = valid.into_expense(converted);

        let expenses = match self.editing {
            Some(index) => self.store.replace_at(index, expense.clone())?,
            None => self.store.push(expense.clone())?,
        };

        match self.editing.take() {
            Some(index) => info!(index, %expense, "Updated expense"),
            None => info!(index = expenses.len() - 1, %expense, "Added expense"),
        }

        self.form = ExpenseForm::cleared(&self.default_currency);
        self.render(&expenses);
        Ok(expense)
    }

    /// Removes the record at `index`.
    ///
    /// Edit mode follows the record it was started on: removing that record
    /// leaves edit mode, removing an earlier one shifts the captured index.
    pub fn remove(&mut self, index: usize) -> Result<Expense, ExpenseError> {
        let (removed, expenses) = self.store.remove_at(index)?;
        info!(index, expense = %removed, "Removed expense");

        match self.editing {
            Some(editing) if editing == index => self.cancel_edit(),
            Some(editing) if editing > index => self.editing = Some(editing - 1),
            _ => {}
        }

        self.render(&expenses);
        Ok(removed)
    }

    fn render(&self, expenses: &[Expense]) -> Totals {
        let totals = totals(expenses);
        self.renderer.render(expenses, &totals);
        totals
    }
}
