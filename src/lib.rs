pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::expenses::TableRenderer;
use crate::core::config::AppConfig;
use crate::core::{ExpenseError, ExpenseForm, ExpenseWorkflow};
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Form fields given on the command line. `None` keeps the form's value.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFields {
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub amount: Option<String>,
    pub currency_from: Option<String>,
    pub currency_to: Option<String>,
}

impl ExpenseFields {
    fn apply(self, form: &mut ExpenseForm) {
        let fields = [
            (self.description, &mut form.description),
            (self.quantity, &mut form.quantity),
            (self.amount, &mut form.amount),
            (self.currency_from, &mut form.currency_from),
            (self.currency_to, &mut form.currency_to),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    List,
    Add(ExpenseFields),
    Edit { index: usize, fields: ExpenseFields },
    Remove { index: usize },
}

/// Attaches the user-facing message on top of the detailed error.
fn user_error(e: ExpenseError) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open_expense_store(&config)?;
    let rates = Arc::new(ExchangeRateApiProvider::new(config.rates_base_url()));
    let mut workflow =
        ExpenseWorkflow::new(store, rates, Box::new(TableRenderer), &config.currency);

    execute(&mut workflow, command).await
}

/// Runs a single command against an existing workflow.
pub async fn execute(workflow: &mut ExpenseWorkflow, command: AppCommand) -> Result<()> {
    match command {
        AppCommand::List => {
            workflow.refresh().map_err(user_error)?;
        }
        AppCommand::Add(fields) => {
            workflow.cancel_edit();
            fields.apply(workflow.form_mut());
            submit(workflow).await?;
        }
        AppCommand::Edit { index, fields } => {
            workflow.begin_edit(index).map_err(user_error)?;
            fields.apply(workflow.form_mut());
            submit(workflow).await?;
        }
        AppCommand::Remove { index } => {
            workflow.remove(index).map_err(user_error)?;
        }
    }
    Ok(())
}

async fn submit(workflow: &mut ExpenseWorkflow) -> Result<()> {
    let pb = cli::ui::new_spinner("Fetching exchange rate...");
    let result = workflow.submit_form().await;
    pb.finish_and_clear();
    result.map(|_| ()).map_err(user_error)
}
