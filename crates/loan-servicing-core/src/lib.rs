pub mod error;
pub mod schedule;
pub mod types;

#[cfg(feature = "origination")]
pub mod origination;

#[cfg(feature = "scoring")]
pub mod scoring;

#[cfg(feature = "servicing")]
pub mod servicing;

pub use error::LoanServicingError;
pub use types::*;

/// Standard result type for all loan-servicing operations
pub type LoanServicingResult<T> = Result<T, LoanServicingError>;
