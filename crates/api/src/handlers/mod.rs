pub mod appointments;
pub mod auth;
pub mod customers;
pub mod reports;
pub mod seed;
pub mod services;
pub mod staff;
pub mod transactions;
