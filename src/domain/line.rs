use crate::{
    common::{
        error::{LedgerError, LedgerResult},
        formatter::{normalize_amount, normalize_description_with, DescriptionLimits},
        money::Money,
    },
    domain::account::{Account, AccountId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

/// One debit-or-credit entry against a single account.
///
/// Exactly one of `debit` and `credit` is positive; the other is zero. The
/// account is borrowed from the caller, only the comment can change after
/// construction.
#[derive(Debug, Clone)]
pub struct TransactionLine<'a> {
    account: &'a dyn Account,
    debit: Money,
    credit: Money,
    comment: String,
}

impl<'a> TransactionLine<'a> {
    /// Builds a line, making both amounts absolute first.
    ///
    /// # Errors
    ///
    /// `ImbalancedLine` when both sides are positive, `EmptyLine` when both
    /// are zero, `InvalidInput` when an amount cannot be made absolute.
    pub fn new(
        account: &'a dyn Account,
        debit: Money,
        credit: Money,
        comment: &str,
    ) -> LedgerResult<Self> {
        let debit = normalize_amount(debit)?;
        let credit = normalize_amount(credit)?;

        if debit.is_positive() && credit.is_positive() {
            return Err(LedgerError::ImbalancedLine);
        }
        if debit.is_zero() && credit.is_zero() {
            return Err(LedgerError::EmptyLine);
        }

        Ok(Self {
            account,
            debit,
            credit,
            comment: normalize_description_with(comment, &DescriptionLimits::default()),
        })
    }

    pub fn debit(account: &'a dyn Account, amount: Money) -> LedgerResult<Self> {
        Self::new(account, amount, Money::zero(), "")
    }

    pub fn credit(account: &'a dyn Account, amount: Money) -> LedgerResult<Self> {
        Self::new(account, Money::zero(), amount, "")
    }

    pub fn account(&self) -> &'a dyn Account {
        self.account
    }

    pub fn account_id(&self) -> AccountId {
        self.account.id()
    }

    pub fn debit_amount(&self) -> Money {
        self.debit
    }

    pub fn credit_amount(&self) -> Money {
        self.credit
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.comment = normalize_description_with(comment, &DescriptionLimits::default());
    }

    pub fn is_debit(&self) -> bool {
        self.debit > self.credit && self.credit.is_zero()
    }

    pub fn is_credit(&self) -> bool {
        self.credit > self.debit && self.debit.is_zero()
    }

    pub fn side(&self) -> Side {
        if self.is_debit() {
            Side::Debit
        } else {
            Side::Credit
        }
    }

    /// The amount on whichever side is active.
    pub fn value(&self) -> Money {
        if self.is_debit() {
            self.debit
        } else {
            self.credit
        }
    }
}

impl PartialEq for TransactionLine<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.account.id() == other.account.id()
            && self.debit == other.debit
            && self.credit == other.credit
            && self.comment == other.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountType, BasicAccount};

    fn cash() -> BasicAccount {
        BasicAccount::new(158u64, "Cash", AccountType::Asset)
    }

    fn money(v: i64) -> Money {
        Money::from_units(v)
    }

    #[test]
    fn debit_line_as_constructed() {
        let acc = cash();
        let line = TransactionLine::new(&acc, money(50), money(0), "").unwrap();

        assert_eq!(line.value(), money(50));
        assert_eq!(line.debit_amount(), money(50));
        assert_eq!(line.credit_amount(), Money::zero());
        assert!(line.is_debit());
        assert!(!line.is_credit());
        assert_eq!(line.side(), Side::Debit);
    }

    #[test]
    fn credit_line_as_constructed() {
        let acc = cash();
        let line = TransactionLine::new(&acc, money(0), money(70), "").unwrap();

        assert_eq!(line.value(), money(70));
        assert_eq!(line.credit_amount(), money(70));
        assert_eq!(line.debit_amount(), Money::zero());
        assert!(line.is_credit());
        assert!(!line.is_debit());
        assert_eq!(line.side(), Side::Credit);
    }

    #[test]
    fn fractional_amounts_are_accepted() {
        let acc = cash();
        let half: Money = "0.5".parse().unwrap();
        assert!(TransactionLine::new(&acc, Money::zero(), half, "foo").is_ok());
        assert!(TransactionLine::new(&acc, half, Money::zero(), "foo").is_ok());
    }

    #[test]
    fn both_sides_zero_is_empty_line() {
        let acc = cash();
        let err = TransactionLine::new(&acc, money(0), money(0), "foo").unwrap_err();
        assert_eq!(err, LedgerError::EmptyLine);
    }

    #[test]
    fn both_sides_positive_is_imbalanced_line() {
        let acc = cash();
        let err = TransactionLine::new(&acc, money(50), money(70), "foo").unwrap_err();
        assert_eq!(err, LedgerError::ImbalancedLine);
    }

    #[test]
    fn negative_amounts_are_normalized() {
        let acc = cash();
        let line = TransactionLine::new(&acc, money(-15), money(0), "").unwrap();
        assert!(line.is_debit());
        assert_eq!(line.value(), money(15));

        // -50 / 70 normalizes to two positive sides.
        let err = TransactionLine::new(&acc, money(-50), money(70), "").unwrap_err();
        assert_eq!(err, LedgerError::ImbalancedLine);
    }

    #[test]
    fn unrepresentable_magnitude_is_invalid_input() {
        let acc = cash();
        let err = TransactionLine::new(&acc, Money::new(i64::MIN), Money::zero(), "").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn line_keeps_reference_to_account() {
        let acc = cash();
        let line = TransactionLine::credit(&acc, money(70)).unwrap();
        assert_eq!(line.account().name(), "Cash");
        assert_eq!(line.account_id(), AccountId::from(158u64));
    }

    #[test]
    fn set_comment_overwrites_and_normalizes() {
        let acc = cash();
        let mut line = TransactionLine::credit(&acc, money(10)).unwrap();
        assert_eq!(line.comment(), "");

        line.set_comment("foo");
        assert_eq!(line.comment(), "foo");

        line.set_comment(
            "This is a very long comment for a transaction line and one would not expect that a transaction would have such a long comment.",
        );
        assert_eq!(
            line.comment(),
            "This is a very long comment for a transaction line..."
        );
    }
}
