//! Client for the finance assistant's HTTP API.
//!
//! The assistant is a separate service; this module only maps requests and
//! responses and turns every failure into a [`ChatError`] a front end can
//! show as-is.

mod client;
mod error;

pub use client::*;
pub use error::*;
