//! Loan origination: eligibility checks, schedule generation, and the
//! business guards that gate acceptance of a generated schedule.

pub mod eligibility;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanServicingError;
use crate::schedule::generator;
use crate::servicing::LoanAccount;
use crate::types::{round_money, with_metadata, ComputationOutput, LoanTerms, LoanType, Money};
use crate::LoanServicingResult;

pub use eligibility::Borrower;

/// A complete loan application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub borrower: Borrower,
    pub loan_type: LoanType,
    pub terms: LoanTerms,
}

/// An accepted application: the opened account plus headline figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginatedLoan {
    pub account: LoanAccount,
    /// Exact EMI; the schedule bills this rounded to 2 decimal places.
    pub emi: Money,
    pub total_interest: Money,
}

/// Run every policy check, generate the schedule, and open the account.
///
/// Fails with a `Policy` error and no side effect on any violation: borrower
/// floors, per-type principal ceiling, rate floor, installment affordability
/// (EMI within 60% of monthly income), and the minimum-interest-earned guard.
pub fn originate(
    application: &LoanApplication,
) -> LoanServicingResult<ComputationOutput<OriginatedLoan>> {
    let start = Instant::now();

    eligibility::check_borrower(&application.borrower)?;
    eligibility::check_application(application.loan_type, &application.terms)?;

    let generated = generator::generate(&application.terms)?;
    let warnings = generated.warnings.clone();
    let g = generated.result;

    let max_installment = eligibility::max_installment_for(application.borrower.annual_income);
    if g.emi > max_installment {
        return Err(LoanServicingError::Policy {
            rule: "installment affordability".into(),
            reason: format!(
                "EMI {} exceeds 60% of monthly income ({max_installment})",
                round_money(g.emi)
            ),
        });
    }

    // Interest the lender would earn before boundary rounding.
    let total_interest_exact =
        g.emi * Decimal::from(application.terms.term_months) - application.terms.principal;
    if total_interest_exact <= eligibility::MIN_TOTAL_INTEREST {
        return Err(LoanServicingError::Policy {
            rule: "minimum interest earned".into(),
            reason: format!(
                "Total interest {} must exceed {}",
                round_money(total_interest_exact),
                eligibility::MIN_TOTAL_INTEREST
            ),
        });
    }

    let account = LoanAccount::open(
        application.borrower.borrower_ref.clone(),
        application.loan_type,
        application.terms.clone(),
        g.emi,
        max_installment,
        g.schedule,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Eligibility gating (credit score, income, rate floor, per-type \
         ceiling, affordability, minimum interest) followed by fixed-EMI \
         schedule generation",
        application,
        warnings,
        elapsed,
        OriginatedLoan {
            account,
            emi: g.emi,
            total_interest: g.total_interest,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_application() -> LoanApplication {
        LoanApplication {
            borrower: Borrower {
                borrower_ref: "482913756204".into(),
                annual_income: dec!(1200000),
                credit_score: 700,
            },
            loan_type: LoanType::Personal,
            terms: LoanTerms {
                principal: dec!(500000),
                annual_rate_percent: dec!(14),
                term_months: 12,
                disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
        }
    }

    #[test]
    fn test_originate_opens_account() {
        let out = originate(&sample_application()).unwrap();
        let loan = &out.result;
        assert_eq!(loan.account.schedule.len(), 12);
        assert_eq!(loan.account.borrower_ref, "482913756204");
        assert!(!loan.account.closed);
        assert!(loan.account.payments.is_empty());
        assert_eq!(loan.account.max_installment, dec!(60000.00));
        assert!(loan.total_interest > dec!(10000));
    }

    #[test]
    fn test_unaffordable_emi_rejected() {
        let mut app = sample_application();
        // 300k/year: monthly cap is 15k, EMI for 500k over 12 months is ~45k
        app.borrower.annual_income = dec!(300000);
        let err = originate(&app).unwrap_err();
        assert!(matches!(err, LoanServicingError::Policy { .. }));
    }

    #[test]
    fn test_insufficient_interest_rejected() {
        let mut app = sample_application();
        // Small principal over a short term earns well under the floor
        app.terms.principal = dec!(50000);
        app.terms.term_months = 6;
        let err = originate(&app).unwrap_err();
        assert!(matches!(
            err,
            LoanServicingError::Policy { ref rule, .. } if rule == "minimum interest earned"
        ));
    }

    #[test]
    fn test_ceiling_violation_rejected_before_generation() {
        let mut app = sample_application();
        app.terms.principal = dec!(2000000);
        let err = originate(&app).unwrap_err();
        assert!(matches!(
            err,
            LoanServicingError::Policy { ref rule, .. } if rule == "loan amount ceiling"
        ));
    }
}
