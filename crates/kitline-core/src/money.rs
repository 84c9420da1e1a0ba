//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront used to keep prices as floats:                          │
//! │    3 × 19.99 = 59.97000000000001  ❌                                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 1999 cents = 5997 cents    ✅                                    │
//! │                                                                         │
//! │  Pack prices, surcharges and listed prices are all cents, so the        │
//! │  pricing engine only ever adds and multiplies by counts. No rounding    │
//! │  happens inside a pricing call.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kitline_core::money::Money;
//!
//! let shirt = Money::from_cents(1999); // €19.99
//! let three = shirt * 3u32;            // €59.97
//! assert_eq!(three.cents(), 5997);
//!
//! // Decimal text from the storefront is parsed once, at the edge
//! assert_eq!(Money::from_decimal("19.99"), Some(shirt));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a corrupt catalog row may carry a negative price; the
///   aggregator clamps subtotals instead of rejecting the order
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use kitline_core::money::Money;
    ///
    /// let price = Money::from_cents(1500); // €15.00
    /// assert_eq!(price.cents(), 1500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (euros and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -€5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount in major units ("19.99", "20", "-3.5").
    ///
    /// ## Rounding Policy
    /// This is the only place a fractional amount becomes cents. Digits past
    /// the second decimal are rounded half away from zero on the third digit.
    ///
    /// ```rust
    /// use kitline_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal("20").unwrap().cents(), 2000);
    /// assert_eq!(Money::from_decimal("2.5").unwrap().cents(), 250);
    /// assert_eq!(Money::from_decimal("0.125").unwrap().cents(), 13);
    /// assert_eq!(Money::from_decimal("-0.125").unwrap().cents(), -13);
    /// assert!(Money::from_decimal("twenty").is_none());
    /// ```
    pub fn from_decimal(text: &str) -> Option<Money> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().ok()?
        };

        let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().unwrap_or(0) >= 5;

        let magnitude = major
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

        Some(Money(if negative { -magnitude } else { magnitude }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by an item count, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use kitline_core::money::Money;
    ///
    /// let pack_unit = Money::from_cents(1500);
    /// assert_eq!(pack_unit.times(5).cents(), 7500);
    /// ```
    #[inline]
    pub const fn times(&self, count: u32) -> Self {
        Money(self.0.saturating_mul(count as i64))
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// Group subtotals pass through this before they are summed so a corrupt
    /// negative price can never produce a negative order total.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Renders the amount as plain decimal text ("19.99"), without a symbol.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates instead of overflowing: storefront prices are
// client-supplied and the engine must stay total over them.

/// Human-readable euro amount, for logs and the CLI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by an item count.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: u32) -> Self {
        self.times(count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Lenient Decimal Serde
// =============================================================================

/// Serde adapter for listed prices on the storefront wire format.
///
/// Cart payloads carry `price` in euros, as a JSON number or a string. A
/// missing, null or non-numeric value becomes `None`, which the classifier
/// prices as zero instead of rejecting the cart.
pub mod lenient_decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(money) => serializer.serialize_str(&money.to_decimal_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(number)) => Money::from_decimal(&number.to_string()),
            Some(Value::String(text)) => Money::from_decimal(&text),
            _ => None,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
