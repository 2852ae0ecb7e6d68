//! Value Objects for grocery invoicing

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Identifier of a catalog entry, as assigned by the inventory service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(u64);

impl CatalogId {
    pub const fn new(value: u64) -> Self { Self(value) }
    pub fn value(&self) -> u64 { self.0 }
}

impl From<u64> for CatalogId {
    fn from(value: u64) -> Self { Self(value) }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Money value object in the store currency (INR).
///
/// Arithmetic is exact; rounding to paise only happens when displaying.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0 * Decimal::from(qty)) }
    pub fn apply_rate(&self, rate: TaxRate) -> Money { Money(self.0 * rate.fraction()) }

    /// Amount rounded half away from zero to two decimal places.
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0 + rhs.0) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, Add::add) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "₹{:.2}", self.rounded()) }
}

/// Tax rate expressed as a fraction of the taxable amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Flat 18% GST applied to every invoice.
    pub const GST: TaxRate = TaxRate(Decimal::from_parts(18, 0, 0, false, 2));
    pub fn fraction(&self) -> Decimal { self.0 }
    pub fn percent(&self) -> Decimal { (self.0 * Decimal::ONE_HUNDRED).normalize() }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.percent()) }
}

/// Invoice number of the form `INV-<unix millis>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvoiceNumber(i64);

impl InvoiceNumber {
    pub fn generate() -> Self { Self(Utc::now().timestamp_millis()) }

    /// Generate a number strictly greater than `self`, even if the clock has not moved.
    pub fn next(&self) -> Self { Self(Utc::now().timestamp_millis().max(self.0 + 1)) }

    pub fn from_millis(millis: i64) -> Self { Self(millis) }
    pub fn millis(&self) -> i64 { self.0 }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "INV-{}", self.0) }
}

impl Serialize for InvoiceNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
