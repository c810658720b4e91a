use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use xpense::cli::ui::{StyleType, style_text};
use xpense::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct FieldArgs {
    /// Source currency code, e.g. USD
    #[arg(long = "from")]
    currency_from: Option<String>,

    /// Target currency code, e.g. BRL
    #[arg(long = "to")]
    currency_to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display saved expenses and totals
    List,
    /// Add an expense, converting it at the current rate
    Add {
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        quantity: String,
        #[arg(short, long)]
        amount: String,
        #[command(flatten)]
        currencies: FieldArgs,
    },
    /// Edit the expense at INDEX; omitted fields keep their saved values
    Edit {
        index: usize,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        quantity: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[command(flatten)]
        currencies: FieldArgs,
    },
    /// Remove the expense at INDEX
    Remove { index: usize },
}

impl From<Commands> for xpense::AppCommand {
    fn from(cmd: Commands) -> xpense::AppCommand {
        match cmd {
            Commands::List => xpense::AppCommand::List,
            Commands::Add {
                description,
                quantity,
                amount,
                currencies,
            } => xpense::AppCommand::Add(xpense::ExpenseFields {
                description: Some(description),
                quantity: Some(quantity),
                amount: Some(amount),
                currency_from: currencies.currency_from,
                currency_to: currencies.currency_to,
            }),
            Commands::Edit {
                index,
                description,
                quantity,
                amount,
                currencies,
            } => xpense::AppCommand::Edit {
                index,
                fields: xpense::ExpenseFields {
                    description,
                    quantity,
                    amount,
                    currency_from: currencies.currency_from,
                    currency_to: currencies.currency_to,
                },
            },
            Commands::Remove { index } => xpense::AppCommand::Remove { index },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xpense::cli::setup::setup(),
        Some(cmd) => xpense::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = ?e, "Application failed");
        eprintln!("{}", style_text(&format!("{e:#}"), StyleType::Error));
        std::process::exit(1);
    }
    Ok(())
}
