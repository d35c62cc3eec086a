use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loan_servicing_core::schedule::allocator::{self, PaymentInput};
use loan_servicing_core::types::Schedule;

use crate::input;

/// A payment application request: the outstanding schedule plus the payment.
#[derive(Debug, Deserialize)]
pub struct ApplyPaymentRequest {
    pub schedule: Schedule,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub max_installment: Decimal,
}

/// Arguments for payment application
#[derive(Args)]
pub struct ApplyPaymentArgs {
    /// Path to a JSON or YAML file holding the full request
    /// ({schedule, payment_date, amount, max_installment})
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a schedule file (list of {due_date, amount_due})
    #[arg(long)]
    pub schedule: Option<String>,

    /// Payment date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Payment amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Policy ceiling on a single installment
    #[arg(long)]
    pub max_installment: Option<Decimal>,
}

pub fn run_apply(args: ApplyPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ApplyPaymentRequest = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let schedule_path = args
            .schedule
            .ok_or("--schedule is required (or provide --input)")?;
        ApplyPaymentRequest {
            schedule: input::file::read_input(&schedule_path)?,
            payment_date: args.date.ok_or("--date is required (or provide --input)")?,
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            max_installment: args
                .max_installment
                .ok_or("--max-installment is required (or provide --input)")?,
        }
    };

    let payment = PaymentInput {
        payment_date: request.payment_date,
        amount: request.amount,
        max_installment: request.max_installment,
    };
    let result = allocator::apply(&request.schedule, &payment)?;
    Ok(serde_json::to_value(result)?)
}
