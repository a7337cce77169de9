use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::ParseError;

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Signed money amount represented as **whole rupiah**.
///
/// Rupiah has no minor unit in practice, so every amount the engine handles,
/// displays or exports is an integer. Use this type for all monetary values
/// (record amounts, totals, balance).
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1_110_000);
/// assert_eq!(amount.rupiah(), 1_110_000);
/// assert_eq!(amount.to_string(), "Rp 1.110.000");
/// assert_eq!(amount.grouped(), "1.110.000");
/// assert_eq!(amount.abbreviated(), "Rp 1,1 jt");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single ledger record may carry (`decimal(14,2)`).
    pub const MAX_RECORD: Money = Money(999_999_999_999);

    /// Largest magnitude a workbook cell stores exactly (2^53).
    pub const MAX_EXACT_F64: i64 = 1 << 53;

    /// Creates a new amount from whole rupiah.
    #[must_use]
    pub const fn new(rupiah: i64) -> Self {
        Self(rupiah)
    }

    /// Returns the raw value in rupiah.
    #[must_use]
    pub const fn rupiah(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// The amount as a float, `None` when the float would round it.
    #[must_use]
    pub fn to_exact_f64(self) -> Option<f64> {
        (self.0.unsigned_abs() <= Self::MAX_EXACT_F64.unsigned_abs()).then_some(self.0 as f64)
    }

    /// Digits grouped by thousands with the id-ID separator, no symbol.
    ///
    /// `-610000` becomes `-610.000`.
    #[must_use]
    pub fn grouped(self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        let lead = digits.len() % 3;
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (index + 3 - lead) % 3 == 0 {
                out.push(THOUSANDS_SEPARATOR);
            }
            out.push(digit);
        }
        out
    }

    /// Compact rendering for on-screen cards: `Rp 1,1 jt`, `Rp 2,5 M`.
    ///
    /// Amounts below one thousand are rendered in full. Exports never use it.
    #[must_use]
    pub fn abbreviated(self) -> String {
        const UNITS: [(u128, &str); 4] = [
            (1_000_000_000_000, "T"),
            (1_000_000_000, "M"),
            (1_000_000, "jt"),
            (1_000, "rb"),
        ];

        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = u128::from(self.0.unsigned_abs());
        let Some((unit, suffix)) = UNITS.iter().find(|(unit, _)| abs >= *unit) else {
            return self.to_string();
        };

        let tenths = (abs * 10 + unit / 2) / unit;
        let (whole, fraction) = (tenths / 10, tenths % 10);
        if fraction == 0 {
            format!("{sign}Rp {whole} {suffix}")
        } else {
            format!("{sign}Rp {whole}{DECIMAL_SEPARATOR}{fraction} {suffix}")
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}Rp {}", Money(self.0.saturating_abs()).grouped())
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Money {
    /// Converts a ledger float (stored as `decimal(14,2)`) into whole rupiah.
    ///
    /// Rounds half away from zero; rejects NaN, infinities and out-of-range
    /// values.
    pub fn from_f64(value: f64) -> Result<Self, ParseError> {
        if !value.is_finite() {
            return Err(ParseError::InvalidAmount(value.to_string()));
        }
        let rounded = value.round();
        if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return Err(ParseError::InvalidAmount(value.to_string()));
        }
        Ok(Money(rounded as i64))
    }
}

impl FromStr for Money {
    type Err = ParseError;

    /// Parses a plain decimal string as sent by the ledger (`"110000"`,
    /// `"110000.00"`, `"-5"`).
    ///
    /// Thousands separators are rejected: `"110.000"` is read as one hundred
    /// ten rupiah, exactly like the ledger's decimal columns.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAmount(s.to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::MissingAmount);
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match rest.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (rest, None),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if let Some(fraction) = fraction
            && !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut value: i64 = whole.parse().map_err(|_| invalid())?;
        let rounds_up = fraction
            .and_then(|fraction| fraction.chars().next())
            .is_some_and(|first| first >= '5');
        if rounds_up {
            value = value.checked_add(1).ok_or_else(invalid)?;
        }

        Ok(Money(if negative { -value } else { value }))
    }
}
