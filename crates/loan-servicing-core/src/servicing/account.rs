//! The serviced loan account.
//!
//! `LoanAccount` is a value: `register_payment` takes the account by
//! reference and returns a replacement, so a rejected payment cannot leave
//! partial state behind and per-loan serialization is purely a caller
//! concern (at most one payment application in flight per loan).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LoanServicingError;
use crate::schedule::allocator::{self, PaymentInput};
use crate::schedule::month_of;
use crate::types::{LoanTerms, LoanType, Money, PaymentRecord, Schedule};
use crate::LoanServicingResult;

/// A loan under servicing: immutable terms plus the current schedule and the
/// append-only payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAccount {
    pub loan_id: Uuid,
    /// External borrower identifier, stable across systems. Never an
    /// internal auto-increment id.
    pub borrower_ref: String,
    pub loan_type: LoanType,
    pub terms: LoanTerms,
    /// Exact EMI fixed at origination.
    pub emi: Money,
    /// Ceiling for any single installment, fixed at origination.
    pub max_installment: Money,
    pub schedule: Schedule,
    pub payments: Vec<PaymentRecord>,
    pub closed: bool,
}

impl LoanAccount {
    pub fn open(
        borrower_ref: String,
        loan_type: LoanType,
        terms: LoanTerms,
        emi: Money,
        max_installment: Money,
        schedule: Schedule,
    ) -> Self {
        LoanAccount {
            loan_id: Uuid::new_v4(),
            borrower_ref,
            loan_type,
            terms,
            emi,
            max_installment,
            schedule,
            payments: Vec::new(),
            closed: false,
        }
    }

    /// Total outstanding across the schedule.
    pub fn outstanding(&self) -> Money {
        self.schedule.total_due()
    }

    /// Register a payment: sequencing guards, waterfall allocation, audit
    /// record, auto-close once the schedule empties. Returns the replacement
    /// account; the receiver is untouched on rejection.
    pub fn register_payment(
        &self,
        date: NaiveDate,
        amount: Money,
    ) -> LoanServicingResult<LoanAccount> {
        if self.closed {
            return Err(LoanServicingError::Sequencing("Loan is closed".into()));
        }
        if self.payments.iter().any(|p| p.date == date) {
            return Err(LoanServicingError::Sequencing(format!(
                "A payment dated {date} is already recorded for this loan"
            )));
        }

        // Arrears-first: no skipping ahead while an earlier month is unpaid.
        let payment_month = month_of(date)?;
        if self
            .schedule
            .installments()
            .iter()
            .any(|i| i.due_date < payment_month && i.amount_due > Decimal::ZERO)
        {
            return Err(LoanServicingError::Sequencing(
                "Earlier installments are still due".into(),
            ));
        }

        let allocation = allocator::apply(
            &self.schedule,
            &PaymentInput {
                payment_date: date,
                amount,
                max_installment: self.max_installment,
            },
        )?;

        let mut next = self.clone();
        next.schedule = allocation.result.schedule;
        next.payments.push(PaymentRecord { date, amount });
        next.closed = next.schedule.is_empty();
        Ok(next)
    }
}
