//! Authentication primitives and flows.
//!
//! - [`password`] -- Argon2id password hashing, verification, and strength rules.
//! - [`jwt`] -- JWT token generation, validation, and expiry helpers.
//! - [`service`] -- signup, login, logout, and token verification over the
//!   user repository and the revocation store.

pub mod jwt;
pub mod password;
pub mod service;
