//! Amortization schedule generation and payment allocation.
//!
//! The two halves of the engine:
//! 1. [`generator`] runs once at loan creation and produces the fixed EMI
//!    plus the ordered list of due installments.
//! 2. [`allocator`] runs once per registered payment, consuming the schedule
//!    produced by the previous run and returning its replacement.
//!
//! All due dates live on a first-of-month grid.

pub mod allocator;
pub mod generator;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::LoanServicingError;
use crate::LoanServicingResult;

/// First day of the month `months` after `date`.
pub(crate) fn first_of_month_after(
    date: NaiveDate,
    months: u32,
) -> LoanServicingResult<NaiveDate> {
    let advanced = date
        .checked_add_months(Months::new(months))
        .ok_or_else(|| LoanServicingError::DateError(format!("{date} + {months} months overflows")))?;
    advanced.with_day(1).ok_or_else(|| {
        LoanServicingError::DateError(format!("cannot normalize {advanced} to first of month"))
    })
}

/// Normalize a payment date to the first of its calendar month.
pub(crate) fn month_of(date: NaiveDate) -> LoanServicingResult<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| LoanServicingError::DateError(format!("cannot normalize {date}")))
}
