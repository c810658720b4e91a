//! The persisted list of expenses.
use crate::core::expense::Expense;
use crate::core::storage::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_KEY: &str = "expenses";

/// What to do when the stored list cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptDataPolicy {
    /// Log a warning and behave as if nothing was stored.
    #[default]
    Empty,
    /// Fail with [`StorageError::Corrupt`].
    Error,
}

/// Ordered expense list stored as one JSON array under a single key.
///
/// Records are identified by position. Every mutation loads the whole list,
/// changes it and writes it back with a single `set`.
#[derive(Clone)]
pub struct ExpenseStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    on_corrupt: CorruptDataPolicy,
}

impl ExpenseStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, DEFAULT_KEY, CorruptDataPolicy::default())
    }

    pub fn with_key(
        backend: Arc<dyn KeyValueStore>,
        key: &str,
        on_corrupt: CorruptDataPolicy,
    ) -> Self {
        Self {
            backend,
            key: key.to_string(),
            on_corrupt,
        }
    }

    pub fn load_all(&self) -> Result<Vec<Expense>, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            debug!(key = %self.key, "No stored expenses");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<Expense>>>(&raw) {
            Ok(expenses) => {
                let expenses = expenses.unwrap_or_default();
                debug!(key = %self.key, count = expenses.len(), "Loaded expenses");
                Ok(expenses)
            }
            Err(source) => match self.on_corrupt {
                CorruptDataPolicy::Empty => {
                    warn!(key = %self.key, error = %source, "Stored expenses are unreadable, treating as empty");
                    Ok(Vec::new())
                }
                CorruptDataPolicy::Error => Err(StorageError::Corrupt {
                    key: self.key.clone(),
                    source,
                }),
            },
        }
    }

    pub fn save_all(&self, expenses: &[Expense]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(expenses).map_err(StorageError::Encode)?;
        self.backend.set(&self.key, &raw)?;
        debug!(key = %self.key, count = expenses.len(), "Saved expenses");
        Ok(())
    }

    /// Loads the list, applies `change` and writes the result back in one
    /// `set`. Nothing is written when `change` fails.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut Vec<Expense>) -> Result<T, StorageError>,
    ) -> Result<(T, Vec<Expense>), StorageError> {
        let mut expenses = self.load_all()?;
        let out = change(&mut expenses)?;
        self.save_all(&expenses)?;
        Ok((out, expenses))
    }

    /// Appends `expense` and returns the list as saved.
    pub fn push(&self, expense: Expense) -> Result<Vec<Expense>, StorageError> {
        let ((), expenses) = self.update(|expenses| {
            expenses.push(expense);
            Ok(())
        })?;
        Ok(expenses)
    }

    /// Replaces the record at `index` and returns the list as saved.
    pub fn replace_at(
        &self,
        index: usize,
        expense: Expense,
    ) -> Result<Vec<Expense>, StorageError> {
        let ((), expenses) = self.update(|expenses| {
            let len = expenses.len();
            let slot = expenses
                .get_mut(index)
                .ok_or(StorageError::IndexOutOfRange { index, len })?;
            *slot = expense;
            Ok(())
        })?;
        Ok(expenses)
    }

    /// Removes the record at `index`, returning it with the list as saved.
    /// Out of range leaves the stored list untouched.
    pub fn remove_at(&self, index: usize) -> Result<(Expense, Vec<Expense>), StorageError> {
        self.update(|expenses| {
            if index >= expenses.len() {
                return Err(StorageError::IndexOutOfRange {
                    index,
                    len: expenses.len(),
                });
            }
            Ok(expenses.remove(index))
        })
    }
}
