//! Money amounts in the smallest currency unit.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

/// A single-currency amount counted in cents.
///
/// Balances and record amounts are kept as integers so repeated deposits and
/// transfers never accumulate rounding drift. On the wire the amount is a
/// decimal number of major units (`12.34`) with at most two fractional
/// digits; finer amounts are rejected rather than rounded.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    const CENTS_PER_UNIT: i64 = 100;
    const DECIMAL_PLACES: u32 = 2;

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Exact conversion from major units. More than two decimal places is a
    /// validation error.
    pub fn try_from_decimal(amount: Decimal) -> Result<Self, LedgerError> {
        let amount = amount.normalize();
        if amount.scale() > Self::DECIMAL_PLACES {
            return Err(LedgerError::validation(format!(
                "amount {amount} has more than {} decimal places",
                Self::DECIMAL_PLACES
            )));
        }
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(|| LedgerError::validation("amount is out of range"))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / Self::CENTS_PER_UNIT as f64
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = Self::CENTS_PER_UNIT as u64;
        write!(f, "{sign}{}.{:02}", abs / unit, abs % unit)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::try_from_decimal(amount).map_err(serde::de::Error::custom)
    }
}
