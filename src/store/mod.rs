pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::ledger::ExpenseStore;
use crate::core::storage::KeyValueStore;
use anyhow::{Context, Result};
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;

/// Opens the backend selected by `config.storage.persist`.
pub fn open_backend(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    if !config.storage.persist {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = config.default_data_path()?.join("store");
    let store = DiskStore::open(&path)
        .with_context(|| format!("Failed to open expense store at {}", path.display()))?;
    Ok(Arc::new(store))
}

pub fn open_expense_store(config: &AppConfig) -> Result<ExpenseStore> {
    Ok(ExpenseStore::with_key(
        open_backend(config)?,
        &config.storage.key,
        config.storage.on_corrupt,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Expense;

    fn config_in(dir: &std::path::Path, persist: bool) -> AppConfig {
        let mut config = AppConfig {
            data_path: Some(dir.join("data").to_string_lossy().into_owned()),
            ..AppConfig::default()
        };
        config.storage.persist = persist;
        config
    }

    fn coffee() -> Expense {
        Expense {
            description: "Coffee".to_string(),
            quantity: 2.0,
            amount: 3.5,
            currency_from: "USD".to_string(),
            currency_to: "USD".to_string(),
            converted_amount: 7.0,
        }
    }

    #[test]
    fn test_memory_backend_writes_nothing_to_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path(), false);

        let store = open_expense_store(&config)?;
        assert!(store.load_all()?.is_empty());
        store.push(coffee())?;
        assert_eq!(store.load_all()?, vec![coffee()]);
        assert!(!dir.path().join("data").exists());

        // A fresh memory store starts empty again
        assert!(open_expense_store(&config)?.load_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_disk_backend_uses_data_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path(), true);

        {
            let store = open_expense_store(&config)?;
            store.push(coffee())?;
        }
        assert!(dir.path().join("data").join("store").exists());
        assert_eq!(open_expense_store(&config)?.load_all()?, vec![coffee()]);
        Ok(())
    }
}
