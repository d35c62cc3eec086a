//! Loan servicing: the account value threading terms, schedule, and audit
//! trail through successive payments, plus statement construction.

pub mod account;
pub mod statement;

pub use account::LoanAccount;
pub use statement::{build_statement, Statement, StatementLine};
