//! Core types and trait definitions for the Ward account registry.
//!
//! This crate is deliberately free of database and CLI dependencies. Storage
//! backends implement [`store::AccountStore`]; front doors (the `ward` admin
//! binary, or anything else that logs people in) compose an
//! [`provision::AccountFactory`] with an [`access::Authenticator`] and an
//! [`access::Authorizer`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod account;
pub mod credential;
pub mod error;
pub mod profile;
pub mod provision;
pub mod store;
pub mod validate;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
