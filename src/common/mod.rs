pub mod error;
pub mod formatter;
pub mod money;
