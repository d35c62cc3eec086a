use clap::Args;
use serde_json::Value;

use loan_servicing_core::servicing::{self, LoanAccount};

use crate::input;

/// Arguments for statement generation
#[derive(Args)]
pub struct StatementArgs {
    /// Path to a JSON or YAML loan account snapshot
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_statement(args: StatementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let account: LoanAccount = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe an account via stdin)".into());
    };

    let result = servicing::build_statement(&account)?;
    Ok(serde_json::to_value(result)?)
}
