use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::{
    common::error::{LedgerError, LedgerResult},
    domain::transaction::{Transaction, DATE_FORMAT},
};

/// Posts a validated transaction, e.g. by writing it to a journal.
pub type PostingHandler<'h, R> = Box<dyn FnMut(&Transaction<'_>) -> R + 'h>;

/// Operations a handler can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Transact,
}

impl FromStr for Method {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transact" => Ok(Method::Transact),
            _ => Err(LedgerError::UnknownMethod(s.to_string())),
        }
    }
}

/// Gates posting on transaction validity.
///
/// Without a handler the gateway still validates, it just has nothing to
/// post to.
pub struct PostingGateway<'h, R> {
    handler: Option<PostingHandler<'h, R>>,
}

impl<'h, R> PostingGateway<'h, R> {
    pub fn new() -> Self {
        Self { handler: None }
    }

    pub fn with_handler<F>(handler: F) -> Self
    where
        F: FnMut(&Transaction<'_>) -> R + 'h,
    {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    pub fn set_posting_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Transaction<'_>) -> R + 'h,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Binds (or with `None`, unbinds) the handler for `method`. Returns
    /// whether a handler is now bound.
    pub fn register(&mut self, method: Method, handler: Option<PostingHandler<'h, R>>) -> bool {
        match method {
            Method::Transact => self.handler = handler,
        }
        self.handler.is_some()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Posts `transaction` through the bound handler.
    ///
    /// Returns the handler's result, or `None` when no handler is bound.
    ///
    /// # Errors
    ///
    /// `UnbalancedTransaction` if the transaction is not valid; the handler is
    /// not called.
    pub fn transact(&mut self, transaction: &Transaction<'_>) -> LedgerResult<Option<R>> {
        self.transact_with(transaction, |_, _| {})
    }

    /// Like [`transact`](Self::transact), then calls `on_complete` with the
    /// result and whether a handler ran.
    pub fn transact_with<C>(
        &mut self,
        transaction: &Transaction<'_>,
        on_complete: C,
    ) -> LedgerResult<Option<R>>
    where
        C: FnOnce(Option<&R>, bool),
    {
        if !transaction.is_valid() {
            let date = transaction.date().format(DATE_FORMAT).to_string();
            warn!(
                %date,
                debits = %transaction.debit_total(),
                credits = %transaction.credit_total(),
                "refusing to post unbalanced transaction"
            );
            return Err(LedgerError::UnbalancedTransaction { date });
        }

        let (result, posted) = match self.handler.as_mut() {
            Some(handler) => {
                let result = handler(transaction);
                info!(
                    comment = transaction.comment(),
                    amount = %transaction.debit_total(),
                    lines = transaction.len(),
                    "transaction posted"
                );
                (Some(result), true)
            }
            None => {
                debug!("no posting handler bound, transaction validated only");
                (None, false)
            }
        };

        on_complete(result.as_ref(), posted);
        Ok(result)
    }
}

impl<R> Default for PostingGateway<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for PostingGateway<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostingGateway")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        common::money::Money,
        domain::{
            account::{AccountType, BasicAccount},
            line::TransactionLine,
        },
    };

    fn accounts() -> (BasicAccount, BasicAccount) {
        (
            BasicAccount::new(123u64, "Purchases Account", AccountType::Liability),
            BasicAccount::new(987u64, "acc-rec-account", AccountType::Asset),
        )
    }

    fn tx<'a>(a: &'a BasicAccount, b: &'a BasicAccount, debit: i64, credit: i64) -> Transaction<'a> {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        Transaction::new(
            date,
            "Purchase of inventory",
            [
                TransactionLine::debit(a, Money::from_units(debit)).unwrap(),
                TransactionLine::credit(b, Money::from_units(credit)).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn method_name_is_trimmed_and_case_insensitive() {
        assert_eq!(Method::from_str("transact").unwrap(), Method::Transact);
        assert_eq!(Method::from_str("  TransAct ").unwrap(), Method::Transact);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert_eq!(
            Method::from_str("something"),
            Err(LedgerError::UnknownMethod("something".to_string()))
        );
    }

    #[test]
    fn register_reports_whether_handler_is_bound() {
        let mut gateway: PostingGateway<'_, &str> = PostingGateway::new();
        assert!(!gateway.has_handler());

        let bound = gateway.register(
            Method::Transact,
            Some(Box::new(|_: &Transaction<'_>| "PASS")),
        );
        assert!(bound);
        assert!(gateway.has_handler());

        assert!(!gateway.register(Method::Transact, None));
        assert!(!gateway.has_handler());
    }

    #[test]
    fn balanced_transaction_is_posted_then_completed() {
        let (a, b) = accounts();
        let txn = tx(&a, &b, 150, 150);

        let mut calls = 0;
        let mut completed = None;
        {
            let mut gateway = PostingGateway::with_handler(|t: &Transaction<'_>| {
                calls += 1;
                t.debit_total()
            });
            let result = gateway
                .transact_with(&txn, |result, posted| completed = Some((result.copied(), posted)))
                .unwrap();
            assert_eq!(result, Some(Money::from_units(150)));
        }

        assert_eq!(calls, 1);
        assert_eq!(completed, Some((Some(Money::from_units(150)), true)));
    }

    #[test]
    fn unbalanced_transaction_is_refused_without_posting() {
        let (a, b) = accounts();
        let txn = tx(&a, &b, 15, 150);

        let mut calls = 0;
        let mut completed = false;
        let err = {
            let mut gateway = PostingGateway::with_handler(|_: &Transaction<'_>| calls += 1);
            gateway
                .transact_with(&txn, |_, _| completed = true)
                .unwrap_err()
        };

        assert_eq!(calls, 0);
        assert!(!completed);
        assert_eq!(
            err,
            LedgerError::UnbalancedTransaction {
                date: "2024-03-09 14:05:07".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "the transaction on 2024-03-09 14:05:07 does not balance"
        );
    }

    #[test]
    fn without_handler_only_validates() {
        let (a, b) = accounts();
        let txn = tx(&a, &b, 150, 150);

        let mut gateway: PostingGateway<'_, ()> = PostingGateway::default();
        let mut completed = None;
        let result = gateway
            .transact_with(&txn, |result, posted| completed = Some((result.is_some(), posted)))
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(completed, Some((false, false)));
    }

    #[test]
    fn handler_can_be_replaced() {
        let (a, b) = accounts();
        let txn = tx(&a, &b, 10, 10);

        let mut gateway = PostingGateway::with_handler(|_: &Transaction<'_>| "first");
        gateway.set_posting_handler(|_: &Transaction<'_>| "second");

        assert_eq!(gateway.transact(&txn).unwrap(), Some("second"));
    }
}
