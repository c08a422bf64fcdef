//! Authentication primitives.
//!
//! - [`pin`] -- Argon2id hashing and verification of staff PINs.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod pin;
