//! Domain library for the estate-market backend.
//!
//! The [`marketplace`] module carries the accounts, listings, favorites, and
//! inquiries services together with the authorization policy they all consult.
//! [`auth`] issues and verifies the bearer tokens that resolve requests to an
//! actor, while [`config`], [`error`], and [`telemetry`] provide the service
//! plumbing shared with the API binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
