use crate::domain::account::AccountId;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("either the debit or the credit value must be zero")]
    ImbalancedLine,
    #[error("either the debit or the credit value must be larger than zero")]
    EmptyLine,
    #[error("entry {index} is not a valid transaction line: {reason}")]
    InvalidLineEntry { index: usize, reason: String },
    #[error("account `{name}` ({id}) has been used more than once in this transaction")]
    DuplicateAccountEntry { id: AccountId, name: String },
    #[error("the transaction on {date} does not balance")]
    UnbalancedTransaction { date: String },
    #[error("unknown method: {0:?}")]
    UnknownMethod(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors surfaced by the demo binary.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("unknown scenario {0:?}. usage: double-entry [simple|unbalanced|invalid-line|all]")]
    UnknownScenario(String),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
