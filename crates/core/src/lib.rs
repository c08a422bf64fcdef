//! Pure domain logic for the salon point-of-sale backend.
//!
//! Nothing in this crate performs I/O. The `db` and `api` crates call into
//! these modules for commission rules, customer statistics, report
//! aggregation and input validation.

pub mod appointments;
pub mod catalog;
pub mod commission;
pub mod customer_stats;
pub mod error;
pub mod money;
pub mod report;
pub mod roles;
pub mod types;
pub mod validation;
