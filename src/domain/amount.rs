use crate::error::ValidationError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of minor units (cents) per major unit for the supported currency.
const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// A positive payment amount in major currency units.
///
/// Holds at most two fractional digits so the conversion to minor units is exact.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        let value = value.normalize();
        if value > Decimal::ZERO && value.scale() <= 2 && to_minor_units(value).is_some() {
            Ok(Self(value))
        } else {
            Err(ValidationError::EmptyOrInvalidAmount)
        }
    }

    /// Parses the text typed into the amount field.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyOrInvalidAmount);
        }
        let value =
            Decimal::from_str(input).map_err(|_| ValidationError::EmptyOrInvalidAmount)?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The amount in integer minor units, e.g. `12.50` becomes `1250`.
    pub fn minor_units(&self) -> u64 {
        // Checked in `new`.
        to_minor_units(self.0).unwrap_or_default()
    }
}

fn to_minor_units(value: Decimal) -> Option<u64> {
    value
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .and_then(|minor| minor.to_u64())
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
