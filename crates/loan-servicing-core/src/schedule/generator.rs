//! Fixed-EMI amortization schedule generation.
//!
//! Computes the equated monthly installment (the unique constant payment that
//! fully amortizes the principal over the term) and the ordered list of due
//! installments on a first-of-month grid. Runs once at loan creation; pure
//! function of its inputs. All math uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanServicingError;
use crate::schedule::first_of_month_after;
use crate::types::{
    round_money, with_metadata, ComputationOutput, Installment, LoanTerms, Money, Schedule,
};
use crate::LoanServicingResult;

/// Months in a 40-year term; schedules longer than this are almost certainly
/// bad input and get a warning.
const TERM_MONTHS_WARN_LIMIT: u32 = 480;

const MONTHS_PER_YEAR_TIMES_HUNDRED: Decimal = dec!(1200);

/// Result of generating a fixed-EMI amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    /// Exact (unrounded) equated monthly installment.
    pub emi: Money,
    /// Rounded amount billed for each regular installment.
    pub emi_billed: Money,
    /// Sum of all installment amounts: principal plus total interest.
    pub total_due: Money,
    /// Interest earned over the full term, after rounding at the boundary.
    pub total_interest: Money,
    pub schedule: Schedule,
}

/// Generate the fixed EMI and the full installment schedule for a loan.
///
/// Installment `i` falls due on the first of the month `i` months after
/// disbursement and bills the rounded EMI; the final installment absorbs the
/// rounding residue so the schedule totals exactly the annuity total
/// (`emi * term_months` at 2 decimal places), i.e. principal + interest.
pub fn generate(terms: &LoanTerms) -> LoanServicingResult<ComputationOutput<GeneratedSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(terms)?;

    if terms.term_months > TERM_MONTHS_WARN_LIMIT {
        warnings.push(format!(
            "Term of {} months exceeds {} (40 years)",
            terms.term_months, TERM_MONTHS_WARN_LIMIT
        ));
    }

    let emi = emi_amount(terms)?;
    let billed = round_money(emi);

    let mut installments: Vec<Installment> = Vec::with_capacity(terms.term_months as usize);
    for i in 1..=terms.term_months {
        installments.push(Installment {
            due_date: first_of_month_after(terms.disbursement_date, i)?,
            amount_due: billed,
        });
    }

    // The exact annuity clears the principal; only penny-level residue from
    // billing the rounded EMI is left to settle. Fold it into the final
    // installment so the schedule totals emi * n, not n * round(emi).
    let annuity_total = round_money(emi * Decimal::from(terms.term_months));
    let adjusted_last = annuity_total - billed * Decimal::from(terms.term_months - 1);
    if adjusted_last > Decimal::ZERO {
        if let Some(last) = installments.last_mut() {
            last.amount_due = adjusted_last;
        }
    } else {
        warnings.push(format!(
            "Residue adjustment produced a non-positive final installment ({adjusted_last}); keeping the billed amount"
        ));
    }

    let schedule = Schedule::new(installments);
    let total_due = schedule.total_due();
    let total_interest = total_due - terms.principal;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-EMI annuity amortization: emi = P*r*(1+r)^n / ((1+r)^n - 1), \
         monthly principal/interest split on the declining balance, final \
         installment absorbs the rounding residue",
        terms,
        warnings,
        elapsed,
        GeneratedSchedule {
            emi,
            emi_billed: billed,
            total_due,
            total_interest,
            schedule,
        },
    ))
}

/// Exact EMI for the given terms, without building the schedule.
///
/// Used by the statement replay, which must decompose historical payments
/// with exactly the same figure the generator used.
pub fn emi_amount(terms: &LoanTerms) -> LoanServicingResult<Money> {
    validate_terms(terms)?;

    let monthly_rate = terms.annual_rate_percent / MONTHS_PER_YEAR_TIMES_HUNDRED;
    let growth = (Decimal::ONE + monthly_rate).powd(Decimal::from(terms.term_months));
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanServicingError::DivisionByZero {
            context: "EMI annuity denominator".into(),
        });
    }

    Ok(terms.principal * monthly_rate * growth / denominator)
}

fn validate_terms(terms: &LoanTerms) -> LoanServicingResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(LoanServicingError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.term_months == 0 {
        return Err(LoanServicingError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if terms.annual_rate_percent <= Decimal::ZERO {
        return Err(LoanServicingError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate must be positive (monthly rate of zero cannot amortize)".into(),
        });
    }
    Ok(())
}
