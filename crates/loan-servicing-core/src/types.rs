use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Interest rates expressed as annual percentages (14 = 14%).
pub type Rate = Decimal;

/// Monetary amounts carry exactly two decimal places at schedule boundaries.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round a monetary amount to 2 decimal places, half-up.
///
/// Rounding is applied only at schedule boundaries (billed installment
/// amounts), never to intermediate interest/principal splits.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Consumer loan product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Car,
    Home,
    Education,
    Personal,
}

/// Immutable inputs fixing an amortization schedule. Created once at
/// origination and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a percentage (14 = 14%), not a decimal fraction.
    pub annual_rate_percent: Rate,
    pub term_months: u32,
    pub disbursement_date: NaiveDate,
}

/// One scheduled obligation: a first-of-month due date and the amount still
/// owed against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub due_date: NaiveDate,
    pub amount_due: Money,
}

/// Ordered sequence of installments, ascending by due date, at most one per
/// calendar month. The schedule is a value: payment application takes a
/// schedule and returns a replacement, never mutating shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(Vec<Installment>);

impl Schedule {
    pub fn new(installments: Vec<Installment>) -> Self {
        Schedule(installments)
    }

    pub fn installments(&self) -> &[Installment] {
        &self.0
    }

    pub fn into_installments(self) -> Vec<Installment> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all outstanding amounts.
    pub fn total_due(&self) -> Money {
        self.0.iter().map(|i| i.amount_due).sum()
    }

    pub fn first(&self) -> Option<&Installment> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Installment> {
        self.0.last()
    }
}

/// An applied payment. Append-only: once recorded it is never mutated. This
/// is the audit trail independent of the mutable schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub amount: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
