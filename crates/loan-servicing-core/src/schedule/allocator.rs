//! Waterfall payment allocation against an outstanding schedule.
//!
//! One call per registered payment: consumes the due amount for the payment's
//! month, carries surplus forward through later installments, rolls leftover
//! prepayment into extension installments, and returns a full replacement
//! schedule. The input schedule is never mutated; a rejected payment leaves
//! it untouched by construction.
//!
//! Policy decisions baked in here (both waterfall variants existed upstream):
//! an underpayment leaves the deficit on the current installment rather than
//! carrying a negative remainder forward, and any amount *added* to an
//! installment is capped at the policy ceiling with the excess cascading into
//! the following months.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanServicingError;
use crate::schedule::{first_of_month_after, month_of};
use crate::types::{round_money, with_metadata, ComputationOutput, Installment, Money, Schedule};
use crate::LoanServicingResult;

/// A payment to apply against a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub payment_date: NaiveDate,
    pub amount: Money,
    /// Policy ceiling on any single installment amount. Amounts pushed onto
    /// an installment beyond this cascade into the following months.
    pub max_installment: Money,
}

/// Next schedule state after applying one payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    pub schedule: Schedule,
    pub total_due_before: Money,
    pub total_due_after: Money,
}

/// Apply one payment against the schedule, returning the replacement state.
///
/// The current installment is the one whose due month equals the payment
/// date's calendar month. Satisfied installments are pruned; the returned
/// schedule stays sorted ascending with at most one entry per month.
pub fn apply(
    schedule: &Schedule,
    input: &PaymentInput,
) -> LoanServicingResult<ComputationOutput<AllocationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_payment(input)?;
    if schedule.is_empty() {
        return Err(LoanServicingError::Sequencing(
            "Schedule has no outstanding installments".into(),
        ));
    }

    let amount = round_money(input.amount);
    let payment_month = month_of(input.payment_date)?;
    let total_due_before = schedule.total_due();

    let mut items = schedule.installments().to_vec();
    let mut surplus = Decimal::ZERO;
    let mut last_cleared: Option<NaiveDate> = None;

    // Step 1: match the current period.
    match items.iter().position(|i| i.due_date == payment_month) {
        Some(idx) => {
            let due = items[idx].amount_due;
            if amount >= due {
                surplus = amount - due;
                items[idx].amount_due = Decimal::ZERO;
                last_cleared = Some(payment_month);
            } else {
                // Deficit stays on the current period.
                items[idx].amount_due = due - amount;
            }
        }
        None => {
            if items.iter().all(|i| i.due_date > payment_month) {
                return Err(LoanServicingError::Sequencing(format!(
                    "No installment is due in {payment_month}; payment targets an already-cleared or out-of-range period"
                )));
            }
            // A month inside the schedule span with no entry left: the whole
            // payment rolls forward as surplus.
            surplus = amount;
        }
    }

    // Step 2: drop satisfied installments.
    items.retain(|i| i.amount_due > Decimal::ZERO);

    // Step 3: distribute surplus through strictly-later installments.
    if surplus > Decimal::ZERO {
        for inst in items.iter_mut().filter(|i| i.due_date > payment_month) {
            if surplus >= inst.amount_due {
                surplus -= inst.amount_due;
                last_cleared = Some(inst.due_date);
                inst.amount_due = Decimal::ZERO;
            } else {
                inst.amount_due -= surplus;
                surplus = Decimal::ZERO;
            }
            if surplus.is_zero() {
                break;
            }
        }
        items.retain(|i| i.amount_due > Decimal::ZERO);
    }

    if surplus > Decimal::ZERO {
        match last_cleared {
            // Step 4: prepayment cleared everything through `cleared`; the
            // leftover rolls into the month after it.
            Some(cleared) => {
                let roll_date = first_of_month_after(cleared, 1)?;
                merge_capped(&mut items, roll_date, surplus, input.max_installment)?;
            }
            // Step 5: tail residue with nothing cleared this call. Only
            // reachable when the arrears-first guard was bypassed upstream.
            None => {
                warnings.push(format!(
                    "Payment month {payment_month} matched no installment and nothing later absorbed it; residue folded into the final installment"
                ));
                let tail_date = match items.last() {
                    Some(last) => last.due_date,
                    None => payment_month,
                };
                merge_capped(&mut items, tail_date, surplus, input.max_installment)?;
            }
        }
    }

    let new_schedule = Schedule::new(items);
    let total_due_after = new_schedule.total_due();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Waterfall allocation: current month first, surplus cascades through \
         later installments, leftover prepayment rolls into ceiling-capped \
         extension installments",
        input,
        warnings,
        elapsed,
        AllocationOutput {
            schedule: new_schedule,
            total_due_before,
            total_due_after,
        },
    ))
}

/// Merge `amount` into the installment due at `date`, creating it if absent.
/// Anything above the ceiling cascades into the following months. Keeps the
/// list sorted with one entry per month and conserves the total.
fn merge_capped(
    items: &mut Vec<Installment>,
    start_date: NaiveDate,
    amount: Money,
    ceiling: Money,
) -> LoanServicingResult<()> {
    let mut date = start_date;
    let mut remaining = amount;

    while remaining > Decimal::ZERO {
        match items.iter().position(|i| i.due_date == date) {
            Some(idx) => {
                let capacity = (ceiling - items[idx].amount_due).max(Decimal::ZERO);
                let add = remaining.min(capacity);
                items[idx].amount_due += add;
                remaining -= add;
            }
            None => {
                let add = remaining.min(ceiling);
                let pos = items
                    .iter()
                    .position(|i| i.due_date > date)
                    .unwrap_or(items.len());
                items.insert(
                    pos,
                    Installment {
                        due_date: date,
                        amount_due: add,
                    },
                );
                remaining -= add;
            }
        }
        if remaining > Decimal::ZERO {
            date = first_of_month_after(date, 1)?;
        }
    }

    Ok(())
}

fn validate_payment(input: &PaymentInput) -> LoanServicingResult<()> {
    if input.amount <= Decimal::ZERO {
        return Err(LoanServicingError::InvalidInput {
            field: "amount".into(),
            reason: "Payment amount must be positive".into(),
        });
    }
    if input.max_installment <= Decimal::ZERO {
        return Err(LoanServicingError::InvalidInput {
            field: "max_installment".into(),
            reason: "Installment ceiling must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inst(y: i32, m: u32, amount: Money) -> Installment {
        Installment {
            due_date: date(y, m, 1),
            amount_due: amount,
        }
    }

    fn payment(y: i32, m: u32, d: u32, amount: Money) -> PaymentInput {
        PaymentInput {
            payment_date: date(y, m, d),
            amount,
            max_installment: dec!(1000000),
        }
    }

    fn two_month_schedule() -> Schedule {
        Schedule::new(vec![inst(2024, 2, dec!(100)), inst(2024, 3, dec!(100))])
    }

    #[test]
    fn test_exact_payment_removes_installment() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(100))).unwrap();
        let result = &out.result;
        assert_eq!(
            result.schedule.installments(),
            &[inst(2024, 3, dec!(100))]
        );
        assert_eq!(result.total_due_before, dec!(200));
        assert_eq!(result.total_due_after, dec!(100));
    }

    #[test]
    fn test_mid_month_payment_matches_by_month() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 19, dec!(100))).unwrap();
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 3, dec!(100))]);
    }

    #[test]
    fn test_surplus_reduces_next_installment() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(150))).unwrap();
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 3, dec!(50))]);
        assert_eq!(out.result.total_due_after, dec!(50));
    }

    #[test]
    fn test_underpayment_leaves_deficit_on_current_period() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(40))).unwrap();
        assert_eq!(
            out.result.schedule.installments(),
            &[inst(2024, 2, dec!(60)), inst(2024, 3, dec!(100))]
        );
        assert_eq!(out.result.total_due_after, dec!(160));
    }

    #[test]
    fn test_exact_clearance_inserts_no_extension() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(200))).unwrap();
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.total_due_after, dec!(0));
    }

    #[test]
    fn test_leftover_after_last_installment_rolls_forward() {
        let out = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(230))).unwrap();
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 4, dec!(30))]);
    }

    #[test]
    fn test_roll_forward_respects_ceiling_cascade() {
        let schedule = two_month_schedule();
        let input = PaymentInput {
            payment_date: date(2024, 2, 1),
            amount: dec!(450),
            max_installment: dec!(120),
        };
        let out = apply(&schedule, &input).unwrap();
        // 250 leftover after clearing both months: 120 + 120 + 10
        assert_eq!(
            out.result.schedule.installments(),
            &[
                inst(2024, 4, dec!(120)),
                inst(2024, 5, dec!(120)),
                inst(2024, 6, dec!(10)),
            ]
        );
        assert_eq!(out.result.total_due_after, dec!(250));
    }

    #[test]
    fn test_unmatched_month_inside_span_distributes_forward() {
        let schedule = Schedule::new(vec![inst(2024, 2, dec!(100)), inst(2024, 4, dec!(100))]);
        let out = apply(&schedule, &payment(2024, 3, 5, dec!(30))).unwrap();
        assert_eq!(
            out.result.schedule.installments(),
            &[inst(2024, 2, dec!(100)), inst(2024, 4, dec!(70))]
        );
    }

    #[test]
    fn test_payment_before_first_installment_rejected() {
        let err = apply(&two_month_schedule(), &payment(2024, 1, 15, dec!(100))).unwrap_err();
        assert!(matches!(err, LoanServicingError::Sequencing(_)));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let err = apply(&Schedule::default(), &payment(2024, 2, 1, dec!(100))).unwrap_err();
        assert!(matches!(err, LoanServicingError::Sequencing(_)));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let err = apply(&two_month_schedule(), &payment(2024, 2, 1, dec!(0))).unwrap_err();
        assert!(matches!(err, LoanServicingError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejection_leaves_schedule_untouched() {
        let schedule = two_month_schedule();
        let before = schedule.clone();
        let _ = apply(&schedule, &payment(2024, 1, 1, dec!(100)));
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_total_due_never_increases_on_accepted_payment() {
        let schedule = Schedule::new(vec![
            inst(2024, 2, dec!(100)),
            inst(2024, 3, dec!(100)),
            inst(2024, 4, dec!(100)),
        ]);
        for amount in [dec!(25), dec!(100), dec!(150), dec!(300), dec!(350)] {
            let out = apply(&schedule, &payment(2024, 2, 1, amount)).unwrap();
            assert!(out.result.total_due_after <= out.result.total_due_before);
        }
    }

    #[test]
    fn test_surplus_conserved_within_schedule() {
        let schedule = Schedule::new(vec![
            inst(2024, 2, dec!(100)),
            inst(2024, 3, dec!(100)),
            inst(2024, 4, dec!(100)),
        ]);
        let out = apply(&schedule, &payment(2024, 2, 1, dec!(250))).unwrap();
        assert_eq!(out.result.total_due_after, dec!(50));
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 4, dec!(50))]);
    }

    #[test]
    fn test_extension_merges_into_existing_month() {
        // Surplus clears 2024-03 but not 2024-04; a second payment that
        // clears 2024-04 with leftover must merge into 2024-05, not duplicate.
        let schedule = Schedule::new(vec![inst(2024, 4, dec!(100)), inst(2024, 5, dec!(80))]);
        let out = apply(&schedule, &payment(2024, 4, 1, dec!(130))).unwrap();
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 5, dec!(50))]);

        let out = apply(&schedule, &payment(2024, 4, 1, dec!(190))).unwrap();
        // clears both, leftover 10 rolls to 2024-06
        assert_eq!(out.result.schedule.installments(), &[inst(2024, 6, dec!(10))]);
    }

    #[test]
    fn test_schedule_stays_sorted_and_unique() {
        let schedule = Schedule::new(vec![
            inst(2024, 2, dec!(100)),
            inst(2024, 3, dec!(100)),
            inst(2024, 4, dec!(100)),
        ]);
        let input = PaymentInput {
            payment_date: date(2024, 2, 1),
            amount: dec!(320),
            max_installment: dec!(15),
        };
        let out = apply(&schedule, &input).unwrap();
        let items = out.result.schedule.installments();
        for pair in items.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
        }
        assert_eq!(out.result.total_due_after, dec!(20));
    }
}
