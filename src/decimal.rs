use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::errors::{Result, ScheduleError};

/// number of decimal places kept once an amount settles on the cent
pub const CENT_SCALE: u32 = 2;

/// money amount backed by an arbitrary-precision decimal
///
/// arithmetic is exact; amounts only lose precision when `truncate_cents`
/// is called explicitly, which the schedule does after every balance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing, rejecting text that would lose precision
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s.trim())?))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, CENT_SCALE))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// floor toward zero at the cent boundary
    pub fn truncate_cents(&self) -> Self {
        Money(self.0.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::ToZero))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// one month of interest at an annual rate, truncated to the cent
    ///
    /// divides by twelve last so a rate like 4% does not lose a cent to the
    /// repeating digits of 0.04 / 12.
    pub fn monthly_interest(&self, annual_rate: Rate) -> Result<Self> {
        let yearly = self
            .0
            .checked_mul(annual_rate.as_decimal())
            .ok_or_else(|| ScheduleError::Calculation {
                message: format!("interest on {} at {annual_rate} overflows", self.0),
            })?;
        Ok(Money(yearly / Decimal::from(12)).truncate_cents())
    }

    /// `self + other`, or `None` when the sum is out of range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// format as `$1,234.56`
    pub fn to_currency_string(&self) -> String {
        format_currency(self.0, "$")
    }

    /// format as `1,234.56` with no symbol
    pub fn to_grouped_string(&self) -> String {
        format_currency(self.0, "")
    }
}

/// two decimals (half-even), thousands separated, sign before the symbol
fn format_currency(value: Decimal, symbol: &str) -> String {
    let rounded = value.round_dp(CENT_SCALE);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction}")
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

/// rate type for interest rates, percentages, and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a percentage figure (e.g., 5 or 4.75)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_parsing() {
        let m = Money::from_str_exact(" 100.123456789 ").unwrap();
        assert_eq!(m.as_decimal(), dec!(100.123456789));
        assert!(Money::from_str_exact("12abc").is_err());
        assert!(Money::from_str_exact("").is_err());
    }

    #[test]
    fn test_truncation_is_toward_zero() {
        assert_eq!(Money::from_decimal(dec!(520.8333)).truncate_cents(), Money::from_minor(52083));
        assert_eq!(Money::from_decimal(dec!(1.999)).truncate_cents(), Money::from_minor(199));
        assert_eq!(Money::from_decimal(dec!(-1.999)).truncate_cents(), Money::from_minor(-199));
    }

    #[test]
    fn test_truncation_idempotence() {
        for raw in [dec!(0), dec!(0.001), dec!(124194.879), dec!(1325.818940488), dec!(99.99)] {
            let once = Money::from_decimal(raw).truncate_cents();
            assert_eq!(once.truncate_cents(), once);
        }
    }

    #[test]
    fn test_monthly_interest() {
        let annual = Rate::from_percentage(dec!(5));
        assert_eq!(Money::from_major(125_000).monthly_interest(annual).unwrap(), Money::from_minor(52083));

        let annual = Rate::from_percentage(dec!(4));
        assert_eq!(Money::from_major(9_000).monthly_interest(annual).unwrap(), Money::from_major(30));
    }

    #[test]
    fn test_monthly_interest_overflow_is_an_error() {
        let huge = Money::from_decimal(Decimal::MAX);
        let err = huge.monthly_interest(Rate::from_percentage(dec!(200))).unwrap_err();
        assert!(matches!(err, ScheduleError::Calculation { .. }));
        assert_eq!(huge.checked_add(Money::from_major(1)), None);
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(Money::from_minor(12419502).to_currency_string(), "$124,195.02");
        assert_eq!(Money::from_major(1_000_000).to_currency_string(), "$1,000,000.00");
        assert_eq!(Money::from_minor(5).to_currency_string(), "$0.05");
        assert_eq!(Money::from_major(999).to_currency_string(), "$999.00");
        assert_eq!(Money::from_minor(-123456).to_currency_string(), "-$1,234.56");
        assert_eq!(Money::from_decimal(dec!(4500)).to_grouped_string(), "4,500.00");
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percentage(dec!(4.75));
        assert_eq!(rate.as_decimal(), dec!(0.0475));
        assert_eq!(rate.to_string(), "4.75%");
        assert_eq!(Rate::from_percentage(dec!(12)).monthly_rate().as_decimal(), dec!(0.01));
    }
}
