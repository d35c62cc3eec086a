//! Net-balance credit scoring.
//!
//! The score is a step function of the user's net ledger balance (credits
//! minus debits): clamped to [300, 900], with 10 points per 15,000 of
//! balance above the lower threshold.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanServicingError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanServicingResult;

pub const MIN_SCORE: u32 = 300;
pub const MAX_SCORE: u32 = 900;
/// Balance at or below this floors the score.
pub const LOWER_BALANCE_THRESHOLD: Money = dec!(100000);
/// Balance at or above this caps the score.
pub const UPPER_BALANCE_THRESHOLD: Money = dec!(1000000);
const BALANCE_STEP: Money = dec!(15000);
const POINTS_PER_STEP: Decimal = dec!(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// One ledger entry attributed to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// External stable user identifier.
    pub user_ref: String,
    pub kind: TransactionKind,
    pub amount: Money,
}

/// A queued recomputation request. Keyed by the external identifier so any
/// downstream consumer can resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreJob {
    pub user_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreOutput {
    pub user_ref: String,
    /// Net balance across the user's transactions.
    pub total_balance: Money,
    pub score: u32,
}

/// Derive the credit score for one user from the full transaction ledger.
pub fn derive_credit_score(
    job: &CreditScoreJob,
    transactions: &[LedgerTransaction],
) -> LoanServicingResult<ComputationOutput<CreditScoreOutput>> {
    let start = Instant::now();

    let mut total_balance = Decimal::ZERO;
    for tx in transactions.iter().filter(|t| t.user_ref == job.user_ref) {
        if tx.amount < Decimal::ZERO {
            return Err(LoanServicingError::InvalidInput {
                field: "amount".into(),
                reason: format!("Ledger amounts must be non-negative, got {}", tx.amount),
            });
        }
        match tx.kind {
            TransactionKind::Credit => total_balance += tx.amount,
            TransactionKind::Debit => total_balance -= tx.amount,
        }
    }

    let score = score_for_balance(total_balance);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net ledger balance mapped through a stepped score: 300 at or below \
         100k, 900 at or above 1M, +10 points per 15k in between",
        job,
        Vec::new(),
        elapsed,
        CreditScoreOutput {
            user_ref: job.user_ref.clone(),
            total_balance,
            score,
        },
    ))
}

fn score_for_balance(balance: Money) -> u32 {
    if balance >= UPPER_BALANCE_THRESHOLD {
        return MAX_SCORE;
    }
    if balance <= LOWER_BALANCE_THRESHOLD {
        return MIN_SCORE;
    }
    let steps = ((balance - LOWER_BALANCE_THRESHOLD) / BALANCE_STEP).floor();
    let score = Decimal::from(MIN_SCORE) + steps * POINTS_PER_STEP;
    score.to_u32().unwrap_or(MIN_SCORE).min(MAX_SCORE)
}
