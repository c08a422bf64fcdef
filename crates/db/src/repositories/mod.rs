//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod appointment_repo;
pub mod commission_repo;
pub mod customer_repo;
pub mod report_repo;
pub mod service_repo;
pub mod staff_repo;
pub mod transaction_repo;

pub use appointment_repo::AppointmentRepo;
pub use commission_repo::CommissionRepo;
pub use customer_repo::CustomerRepo;
pub use report_repo::ReportRepo;
pub use service_repo::ServiceRepo;
pub use staff_repo::StaffRepo;
pub use transaction_repo::TransactionRepo;
