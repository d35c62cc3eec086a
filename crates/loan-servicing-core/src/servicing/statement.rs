//! Loan statement: historical payments with their principal/interest split,
//! plus the upcoming installments.
//!
//! The split replays the original fixed-EMI recurrence over the recorded
//! payments, exactly as the generator derived the schedule: interest accrues
//! on the declining balance at the monthly rate, the EMI covers interest
//! first and principal with the rest. The replay stays consistent with the
//! generated schedule by construction; it does not depend on the actual paid
//! amounts.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanServicingError;
use crate::schedule::generator;
use crate::servicing::LoanAccount;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Schedule};
use crate::LoanServicingResult;

/// One historical payment with its amortization decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    pub date: chrono::NaiveDate,
    pub amount: Money,
    /// Scheduled principal reduction for this period.
    pub principal_component: Money,
    /// Scheduled interest for this period.
    pub interest_component: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub loan_id: uuid::Uuid,
    pub past_transactions: Vec<StatementLine>,
    pub upcoming_transactions: Schedule,
}

/// Build a statement for an open loan account.
pub fn build_statement(
    account: &LoanAccount,
) -> LoanServicingResult<ComputationOutput<Statement>> {
    let start = Instant::now();

    if account.closed {
        return Err(LoanServicingError::Sequencing("Loan is closed".into()));
    }

    let monthly_rate = account.terms.annual_rate_percent / dec!(1200);
    let emi = generator::emi_amount(&account.terms)?;

    let mut remaining = account.terms.principal;
    let mut past: Vec<StatementLine> = Vec::with_capacity(account.payments.len());

    for payment in &account.payments {
        let interest_for_month = remaining * monthly_rate;
        let principal_for_month = emi - interest_for_month;
        remaining -= principal_for_month;

        past.push(StatementLine {
            date: payment.date,
            amount: payment.amount,
            principal_component: round_money(principal_for_month),
            interest_component: round_money(interest_for_month),
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-EMI replay: per historical payment, interest on the declining \
         balance at the monthly rate, principal as the EMI remainder",
        &account.terms,
        Vec::new(),
        elapsed,
        Statement {
            loan_id: account.loan_id,
            past_transactions: past,
            upcoming_transactions: account.schedule.clone(),
        },
    ))
}
