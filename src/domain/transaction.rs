use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    common::{
        error::{LedgerError, LedgerResult},
        formatter::{normalize_description_with, DescriptionLimits},
        money::Money,
    },
    domain::{
        account::{Account, AccountId},
        line::TransactionLine,
    },
};

/// Format used when a transaction date is shown to people.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An element handed to [`Transaction::from_entries`]: either an already
/// built line or the raw parts of one.
#[derive(Debug, Clone)]
pub enum LineEntry<'a> {
    Line(TransactionLine<'a>),
    Draft {
        account: &'a dyn Account,
        debit: Money,
        credit: Money,
        comment: String,
    },
}

impl<'a> From<TransactionLine<'a>> for LineEntry<'a> {
    fn from(line: TransactionLine<'a>) -> Self {
        LineEntry::Line(line)
    }
}

/// A set of debit and credit lines that must balance before posting.
///
/// Each account appears at most once. Validity is recomputed after every
/// add or remove: the transaction is balanced when debits and credits sum to
/// the same strictly positive amount.
#[derive(Debug, Clone)]
pub struct Transaction<'a> {
    date: DateTime<Utc>,
    comment: String,
    debits: Vec<TransactionLine<'a>>,
    credits: Vec<TransactionLine<'a>>,
    accounts_used: BTreeMap<AccountId, String>,
    valid: bool,
}

impl<'a> Transaction<'a> {
    /// Builds a transaction, adding `lines` in order.
    ///
    /// # Errors
    ///
    /// `DuplicateAccountEntry` if two lines share an account id,
    /// `InvalidInput` if a side's total would not fit in [`Money`]. No partial
    /// transaction is returned.
    pub fn new<I>(date: DateTime<Utc>, comment: &str, lines: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = TransactionLine<'a>>,
    {
        let mut tx = Self::empty(date, comment);
        for line in lines {
            tx.add_transaction_line(line)?;
        }
        Ok(tx)
    }

    /// Builds a transaction from mixed entries.
    ///
    /// Every draft is turned into a line before it is inserted; a draft that
    /// does not make a valid line fails the whole construction with
    /// `InvalidLineEntry`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use double_entry::common::money::Money;
    /// use double_entry::domain::account::{AccountType, BasicAccount};
    /// use double_entry::domain::transaction::{LineEntry, Transaction};
    ///
    /// let cash = BasicAccount::new(1u64, "Cash", AccountType::Asset);
    /// let bogus = LineEntry::Draft {
    ///     account: &cash,
    ///     debit: Money::zero(),
    ///     credit: Money::zero(),
    ///     comment: String::new(),
    /// };
    /// assert!(Transaction::from_entries(Utc::now(), "bad", vec![bogus]).is_err());
    /// ```
    pub fn from_entries<I>(date: DateTime<Utc>, comment: &str, entries: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = LineEntry<'a>>,
    {
        let mut tx = Self::empty(date, comment);
        for (index, entry) in entries.into_iter().enumerate() {
            let line = match entry {
                LineEntry::Line(line) => line,
                LineEntry::Draft {
                    account,
                    debit,
                    credit,
                    comment,
                } => TransactionLine::new(account, debit, credit, &comment).map_err(|e| {
                    LedgerError::InvalidLineEntry {
                        index,
                        reason: e.to_string(),
                    }
                })?,
            };
            tx.add_transaction_line(line)?;
        }
        Ok(tx)
    }

    fn empty(date: DateTime<Utc>, comment: &str) -> Self {
        Self {
            date,
            comment: normalize_description_with(comment, &DescriptionLimits::default()),
            debits: Vec::new(),
            credits: Vec::new(),
            accounts_used: BTreeMap::new(),
            valid: false,
        }
    }

    /// Adds a line, defaulting its comment to the transaction's.
    ///
    /// On `DuplicateAccountEntry`, or `InvalidInput` when the line would push
    /// its side's total past what [`Money`] holds, the transaction is left
    /// untouched.
    pub fn add_transaction_line(&mut self, mut line: TransactionLine<'a>) -> LedgerResult<()> {
        let id = line.account_id();
        if self.accounts_used.contains_key(&id) {
            return Err(LedgerError::DuplicateAccountEntry {
                id,
                name: line.account().name().to_string(),
            });
        }

        let current = if line.is_debit() {
            self.debit_total()
        } else {
            self.credit_total()
        };
        if current.checked_add(line.value()).is_none() {
            return Err(LedgerError::InvalidInput(format!(
                "{:?} total overflows adding {} for account {id}",
                line.side(),
                line.value()
            )));
        }

        if line.comment().is_empty() {
            line.set_comment(&self.comment);
        }

        debug!(account = %id, side = ?line.side(), value = %line.value(), "adding transaction line");
        self.accounts_used
            .insert(id, line.account().name().to_string());

        if line.is_debit() {
            self.debits.push(line);
        } else {
            self.credits.push(line);
        }

        self.validate();
        Ok(())
    }

    /// Drops the line for `account_id`, if any, and returns it.
    pub fn remove_transaction_line(&mut self, account_id: &AccountId) -> Option<TransactionLine<'a>> {
        self.accounts_used.remove(account_id);

        let removed = take_line(&mut self.debits, account_id)
            .or_else(|| take_line(&mut self.credits, account_id));

        if removed.is_some() {
            debug!(account = %account_id, "removed transaction line");
        }
        self.validate();
        removed
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn accounts_used(&self) -> &BTreeMap<AccountId, String> {
        &self.accounts_used
    }

    /// Debit lines, largest value first. Equal values keep insertion order.
    pub fn debits(&self) -> Vec<&TransactionLine<'a>> {
        sorted_by_value(&self.debits)
    }

    /// Credit lines, largest value first. Equal values keep insertion order.
    pub fn credits(&self) -> Vec<&TransactionLine<'a>> {
        sorted_by_value(&self.credits)
    }

    pub fn debits_unsorted(&self) -> &[TransactionLine<'a>] {
        &self.debits
    }

    pub fn credits_unsorted(&self) -> &[TransactionLine<'a>] {
        &self.credits
    }

    /// Sorted debits followed by sorted credits.
    pub fn account_line_entries(&self) -> Vec<&TransactionLine<'a>> {
        let mut entries = self.debits();
        entries.extend(self.credits());
        entries
    }

    /// Each side's total always fits in [`Money`]; `add_transaction_line`
    /// refuses lines that would overflow it.
    pub fn debit_total(&self) -> Money {
        self.debits.iter().map(TransactionLine::value).sum()
    }

    pub fn credit_total(&self) -> Money {
        self.credits.iter().map(TransactionLine::value).sum()
    }

    pub fn len(&self) -> usize {
        self.debits.len() + self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn validate(&mut self) {
        let debit_total = side_total(&self.debits);
        let credit_total = side_total(&self.credits);
        let was_valid = self.valid;
        self.valid = !self.is_empty() && debit_total > 0 && debit_total == credit_total;

        if was_valid != self.valid {
            debug!(valid = self.valid, debits = %debit_total, credits = %credit_total, "transaction validity changed");
        }
    }
}

// Summed in i128 so the balance check never wraps.
fn side_total(lines: &[TransactionLine<'_>]) -> i128 {
    lines.iter().map(|l| i128::from(l.value().as_i64())).sum()
}

fn take_line<'a>(lines: &mut Vec<TransactionLine<'a>>, account_id: &AccountId) -> Option<TransactionLine<'a>> {
    let pos = lines.iter().position(|l| &l.account_id() == account_id)?;
    Some(lines.remove(pos))
}

fn sorted_by_value<'l, 'a>(lines: &'l [TransactionLine<'a>]) -> Vec<&'l TransactionLine<'a>> {
    let mut sorted: Vec<&TransactionLine<'a>> = lines.iter().collect();
    // `sort_by` is stable, so ties stay in insertion order.
    sorted.sort_by(|a, b| b.value().cmp(&a.value()));
    sorted
}
