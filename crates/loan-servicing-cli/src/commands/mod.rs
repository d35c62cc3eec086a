pub mod origination;
pub mod payment;
pub mod schedule;
pub mod scoring;
pub mod statement;
