use clap::Args;
use serde_json::Value;

use loan_servicing_core::scoring::{self, CreditScoreJob, LedgerTransaction};

use crate::input;

/// Arguments for credit score derivation
#[derive(Args)]
pub struct CreditScoreArgs {
    /// Path to a JSON or YAML transaction ledger (list of transactions)
    #[arg(long)]
    pub input: Option<String>,

    /// External user reference whose transactions are scored
    #[arg(long)]
    pub user_ref: String,
}

pub fn run_credit_score(args: CreditScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger: Vec<LedgerTransaction> = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a ledger via stdin)".into());
    };

    let job = CreditScoreJob {
        user_ref: args.user_ref,
    };
    let result = scoring::derive_credit_score(&job, &ledger)?;
    Ok(serde_json::to_value(result)?)
}
