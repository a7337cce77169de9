//! Command-line front end of the treasury report: fetches the ledger, keeps
//! the aggregation session and renders or exports the result.

pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
