//! Request middleware applied around the route handlers.
//!
//! - [`auth::require_auth`] -- Rejects requests without a valid, unrevoked
//!   bearer token.
//! - [`cache::serve_cached`] -- Serves GET responses straight from the
//!   response cache on a key hit.
//! - [`rate_limit::enforce_rate_limit`] -- Enforces the per-client request
//!   budget.

pub mod auth;
pub mod cache;
pub mod rate_limit;
