//! Eligibility policy for loan origination.
//!
//! Floors and ceilings applied before a schedule is ever generated. These
//! are business policy, not engine math: the generator itself only requires
//! a positive rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanServicingError;
use crate::types::{round_money, LoanTerms, LoanType, Money, Rate};
use crate::LoanServicingResult;

pub const MIN_INTEREST_RATE_PERCENT: Rate = dec!(14);
pub const MIN_CREDIT_SCORE: u32 = 450;
pub const MIN_ANNUAL_INCOME: Money = dec!(150000);
/// A loan must earn strictly more than this over its full term.
pub const MIN_TOTAL_INTEREST: Money = dec!(10000);
/// Fraction of monthly income a single installment may consume.
pub const MAX_INSTALLMENT_INCOME_FRACTION: Decimal = dec!(0.6);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The applicant as seen by the eligibility policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    /// External stable identifier (e.g. national id), never an internal key.
    pub borrower_ref: String,
    pub annual_income: Money,
    pub credit_score: u32,
}

/// Maximum principal for each product category.
pub fn loan_amount_ceiling(loan_type: LoanType) -> Money {
    match loan_type {
        LoanType::Car => dec!(750000),
        LoanType::Home => dec!(8500000),
        LoanType::Education => dec!(5000000),
        LoanType::Personal => dec!(1000000),
    }
}

/// Highest single installment this borrower may be billed.
pub fn max_installment_for(annual_income: Money) -> Money {
    round_money(annual_income / MONTHS_PER_YEAR * MAX_INSTALLMENT_INCOME_FRACTION)
}

pub fn check_borrower(borrower: &Borrower) -> LoanServicingResult<()> {
    if borrower.credit_score < MIN_CREDIT_SCORE {
        return Err(LoanServicingError::Policy {
            rule: "minimum credit score".into(),
            reason: format!(
                "Credit score {} is below the floor of {MIN_CREDIT_SCORE}",
                borrower.credit_score
            ),
        });
    }
    if borrower.annual_income < MIN_ANNUAL_INCOME {
        return Err(LoanServicingError::Policy {
            rule: "minimum annual income".into(),
            reason: format!(
                "Annual income {} is below the floor of {MIN_ANNUAL_INCOME}",
                borrower.annual_income
            ),
        });
    }
    Ok(())
}

pub fn check_application(loan_type: LoanType, terms: &LoanTerms) -> LoanServicingResult<()> {
    if terms.annual_rate_percent < MIN_INTEREST_RATE_PERCENT {
        return Err(LoanServicingError::Policy {
            rule: "minimum interest rate".into(),
            reason: format!(
                "Interest rate {}% is below the floor of {MIN_INTEREST_RATE_PERCENT}%",
                terms.annual_rate_percent
            ),
        });
    }
    let ceiling = loan_amount_ceiling(loan_type);
    if terms.principal > ceiling {
        return Err(LoanServicingError::Policy {
            rule: "loan amount ceiling".into(),
            reason: format!(
                "Principal {} exceeds the {loan_type:?} ceiling of {ceiling}",
                terms.principal
            ),
        });
    }
    Ok(())
}
