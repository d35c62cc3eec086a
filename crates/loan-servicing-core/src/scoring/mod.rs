//! Credit-score derivation from a transaction ledger.
//!
//! Recomputation is background work in the surrounding system: it is
//! triggered after registration and modeled here as an explicit job message
//! keyed by the stable external user reference, decoupled from the schedule
//! engine.

pub mod ledger;

pub use ledger::{
    derive_credit_score, CreditScoreJob, CreditScoreOutput, LedgerTransaction, TransactionKind,
};
