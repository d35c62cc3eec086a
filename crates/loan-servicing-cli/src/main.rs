mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::origination::OriginateArgs;
use commands::payment::ApplyPaymentArgs;
use commands::schedule::GenerateScheduleArgs;
use commands::scoring::CreditScoreArgs;
use commands::statement::StatementArgs;

/// Consumer-loan servicing calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Consumer-loan servicing calculations",
    long_about = "A CLI for the consumer-loan servicing engine with decimal precision. \
                  Generates fixed-EMI amortization schedules, applies payments through \
                  the waterfall allocator, runs origination eligibility checks, derives \
                  ledger-based credit scores, and builds loan statements."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fixed-EMI amortization schedule
    GenerateSchedule(GenerateScheduleArgs),
    /// Apply a payment against an outstanding schedule
    ApplyPayment(ApplyPaymentArgs),
    /// Run eligibility checks and originate a loan account
    Originate(OriginateArgs),
    /// Derive a credit score from a transaction ledger
    CreditScore(CreditScoreArgs),
    /// Build a statement for a serviced loan account
    Statement(StatementArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::GenerateSchedule(args) => commands::schedule::run_generate(args),
        Commands::ApplyPayment(args) => commands::payment::run_apply(args),
        Commands::Originate(args) => commands::origination::run_originate(args),
        Commands::CreditScore(args) => commands::scoring::run_credit_score(args),
        Commands::Statement(args) => commands::statement::run_statement(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
