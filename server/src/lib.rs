//! A small social-network GraphQL API with token-based authentication.
//!
//! Accounts, friendships, posts and likes live in an in-memory [`store::Store`].
//! The [`identity`] module hashes passwords, issues identity tokens and resolves
//! the per-request [`identity::Session`] that privileged mutations act on.

pub mod auth;
pub mod errors;
pub mod identity;
pub mod routes;
pub mod schema;
pub mod setup;
pub mod state;
pub mod store;
pub mod units;
