//! Decimal quantities with domain rules attached.
//!
//! Weights and prices are plain [`Decimal`]s; the database `CHECK`
//! constraints bound them. Two rules are worth stating in Rust as well:
//! percentages stay within 0-100, and a sale's total is always
//! `quantity_kg * price_per_kg`.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Total for a sale line.
///
/// Mirrors the generated `sales.total_amount` column. The product is exact
/// (no rounding), matching the unscaled `NUMERIC` the column is declared as.
/// Returns `None` only if the multiplication overflows `Decimal`.
///
/// ```
/// use bsf_core::sale_total;
/// use rust_decimal::Decimal;
///
/// let total = sale_total(Decimal::new(10, 0), Decimal::new(500, 2));
/// assert_eq!(total, Some(Decimal::new(5000, 2)));
/// ```
#[must_use]
pub fn sale_total(quantity_kg: Decimal, price_per_kg: Decimal) -> Option<Decimal> {
    quantity_kg.checked_mul(price_per_kg)
}

/// Error for a value outside 0-100.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("percentage must be between 0 and 100, got {0}")]
pub struct PercentError(pub Decimal);

/// A percentage in the closed range 0-100.
///
/// Used for `batches.current_mortality`, `mortality.mortality_rate` and
/// `environment.humidity_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Validate a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`PercentError`] if `value` is negative or above 100.
    pub fn new(value: Decimal) -> Result<Self, PercentError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PercentError(value));
        }
        Ok(Self(value))
    }

    /// The underlying value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = PercentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Percent {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Percent {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Percent {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
