use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_servicing_core::origination::{self, Borrower, LoanApplication};
use loan_servicing_core::types::{LoanTerms, LoanType};

use crate::input;

/// Arguments for loan origination
#[derive(Args)]
pub struct OriginateArgs {
    /// Path to a JSON or YAML application file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// External borrower reference (stable identifier)
    #[arg(long)]
    pub borrower_ref: Option<String>,

    /// Borrower's annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Borrower's credit score
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Loan type: car, home, education or personal
    #[arg(long)]
    pub loan_type: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (14 = 14%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long)]
    pub disbursement_date: Option<NaiveDate>,
}

fn parse_loan_type(raw: &str) -> Result<LoanType, Box<dyn std::error::Error>> {
    match raw.to_ascii_lowercase().as_str() {
        "car" => Ok(LoanType::Car),
        "home" => Ok(LoanType::Home),
        "education" => Ok(LoanType::Education),
        "personal" => Ok(LoanType::Personal),
        _ => Err(format!(
            "Unknown loan type '{raw}' (expected car, home, education or personal)"
        )
        .into()),
    }
}

pub fn run_originate(args: OriginateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: LoanApplication = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanApplication {
            borrower: Borrower {
                borrower_ref: args
                    .borrower_ref
                    .ok_or("--borrower-ref is required (or provide --input)")?,
                annual_income: args
                    .annual_income
                    .ok_or("--annual-income is required (or provide --input)")?,
                credit_score: args
                    .credit_score
                    .ok_or("--credit-score is required (or provide --input)")?,
            },
            loan_type: parse_loan_type(
                &args
                    .loan_type
                    .ok_or("--loan-type is required (or provide --input)")?,
            )?,
            terms: LoanTerms {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: args
                    .annual_rate
                    .ok_or("--annual-rate is required (or provide --input)")?,
                term_months: args
                    .term_months
                    .ok_or("--term-months is required (or provide --input)")?,
                disbursement_date: args
                    .disbursement_date
                    .ok_or("--disbursement-date is required (or provide --input)")?,
            },
        }
    };

    let result = origination::originate(&application)?;
    Ok(serde_json::to_value(result)?)
}
