use bigdecimal::{BigDecimal, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::common::error::LedgerError;

const SCALE: i64 = 10_000;

#[derive(Debug, Clone, Copy, Default)]
/// A monetary amount held as a fixed-point integer with 4 decimal places.
///
/// Accounting amounts on a ledger line are compared for exact equality
/// (debits must equal credits), so they are never stored as floats. Parsing
/// goes through `BigDecimal` and rounds to the fourth decimal place.
///
/// # Examples
/// ```
/// use double_entry::common::money::Money;
///
/// let amount: Money = "150.25".parse().unwrap();
/// assert_eq!(amount.as_i64(), 1_502_500);
/// assert_eq!(amount.to_string_4dp(), "150.2500");
/// assert_eq!(Money::from_units(150).to_string(), "150.0000");
/// ```
pub struct Money(i64);

impl Money {
    /// Wraps a raw value expressed in ten-thousandths.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Whole currency units, e.g. `from_units(150)` is `150.0000`.
    ///
    /// Clamps to the representable range: amounts beyond roughly
    /// 922 trillion units saturate at `i64::MAX`/`i64::MIN` ten-thousandths.
    /// Use [`Money::checked_from_units`] when the input is untrusted.
    pub fn from_units(units: i64) -> Self {
        Money(units.saturating_mul(SCALE))
    }

    pub fn checked_from_units(units: i64) -> Option<Self> {
        units.checked_mul(SCALE).map(Money)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// `None` for `i64::MIN`, whose magnitude has no positive counterpart.
    pub fn checked_abs(self) -> Option<Self> {
        self.0.checked_abs().map(Money)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn to_string_4dp(&self) -> String {
        let bd = BigDecimal::from(self.0) / BigDecimal::from(SCALE);
        format!("{:.4}", bd)
    }
}

impl std::str::FromStr for Money {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(LedgerError::InvalidInput("empty amount".into()));
        }

        let bd: BigDecimal = t
            .parse()
            .map_err(|e| LedgerError::InvalidInput(format!("amount {t:?}: {e}")))?;

        // Scale to 4 decimal places
        let scaled = (bd * BigDecimal::from(SCALE)).round(0);
        let value: i64 = scaled
            .to_i64()
            .ok_or_else(|| LedgerError::InvalidInput(format!("amount {t:?} overflows")))?;

        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_4dp())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
