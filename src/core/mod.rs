//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod expense;
pub mod ledger;
pub mod log;
pub mod storage;
pub mod workflow;

// Re-export main types for cleaner imports
pub use conversion::{Totals, convert, totals};
pub use currency::{CurrencyRateProvider, RateLookupError};
pub use expense::{Expense, ExpenseForm, ValidationError};
pub use ledger::ExpenseStore;
pub use storage::{KeyValueStore, StorageError};
pub use workflow::{ExpenseError, ExpenseRenderer, ExpenseWorkflow};
