//! Double-entry transaction validation.
//!
//! Build [`domain::line::TransactionLine`]s against accounts, collect them in a
//! [`domain::transaction::Transaction`], and post it through a
//! [`worker::gateway::PostingGateway`], which refuses anything that does not
//! balance.

pub mod app;
pub mod common;
pub mod domain;
pub mod io;
pub mod worker;
