pub mod account;
pub mod line;
pub mod transaction;
