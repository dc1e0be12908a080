//! Money

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};

/// Currency every amount on the platform is quoted in.
#[must_use]
pub fn currency() -> &'static Currency {
    iso::INR
}

/// ISO 4217 code of [`currency`], as sent to the payment gateway.
#[must_use]
pub fn currency_code() -> &'static str {
    currency().iso_alpha_code
}

/// A server-supplied monetary amount in rupees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount in major units.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build an amount from paise.
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, currency().exponent))
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn decimal(self) -> Decimal {
        self.0
    }

    /// Amount in paise, rounded half away from zero.
    ///
    /// Returns `None` when the value does not fit an `i64`.
    #[must_use]
    pub fn to_minor_units(self) -> Option<i64> {
        let exponent = currency().exponent;

        let scaled = self
            .0
            .round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::from(10_i64.checked_pow(exponent)?))?;

        scaled.to_i64()
    }

    /// `self - other`, or `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let exponent = currency().exponent;
        let rounded = self
            .0
            .round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero);

        write!(
            f,
            "{}{:.prec$}",
            currency().symbol,
            rounded,
            prec = exponent as usize
        )
    }
}
