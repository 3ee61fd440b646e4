use std::fmt::Display;

use rust_decimal::{prelude::ToPrimitive, Decimal};
use rusty_money::{iso, Money};

use crate::parse::Error;

/// Longest integer part that is read as an amount.
const MAX_EURO_DIGITS: usize = 9;

/// An amount of euros, kept in cents so that it can be hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Eur(i64);

impl Eur {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn money(self) -> Money<'static, iso::Currency> {
        Money::from_minor(self.0, iso::EUR)
    }

    /// Parses a German or English decimal amount like `3,50`, `3.5` or `4`.
    /// Currency symbols and surrounding whitespace are ignored.
    pub fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim_matches(|c: char| c.is_whitespace() || c == '€');
        let invalid = || Error::price_parse_error(&format!("{s:?} is not an amount"));
        let (major, minor) = s
            .split_once(|c| c == ',' || c == '.')
            .unwrap_or((s, ""));
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        // Money::from_str panics on integer parts it cannot hold as a decimal
        if major.is_empty()
            || major.len() > MAX_EURO_DIGITS
            || minor.len() > 2
            || !digits(major)
            || !digits(minor)
        {
            return Err(invalid());
        }
        let amount = if minor.is_empty() {
            major.to_string()
        } else {
            format!("{major},{minor}")
        };
        let money = Money::from_str(&amount, iso::EUR).map_err(|_| invalid())?;
        money
            .amount()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Display for Eur {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.money().amount())
    }
}

impl serde::Serialize for Eur {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[allow(clippy::cast_precision_loss)]
        let euros = self.0 as f64 / 100.0;
        euros.serialize(serializer)
    }
}

/// The fixed part of a price. Source text that is not an amount (e.g. `?€`) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum BasePrice {
    Amount(Eur),
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Price {
    base_price: BasePrice,
    price_per_unit: Option<Eur>,
    unit: Option<String>,
}

impl Price {
    pub const fn new(base_price: Eur) -> Self {
        Self {
            base_price: BasePrice::Amount(base_price),
            price_per_unit: None,
            unit: None,
        }
    }

    pub fn per_unit(base_price: Eur, price_per_unit: Eur, unit: &str) -> Self {
        Self {
            base_price: BasePrice::Amount(base_price),
            price_per_unit: Some(price_per_unit),
            unit: Some(unit.to_string()),
        }
    }

    /// Never fails: text that is not an amount becomes an unresolved base price.
    pub fn parse(raw: &str) -> Self {
        let base_price = Eur::from_str(raw).map_or_else(
            |_| BasePrice::Unresolved(raw.trim().to_string()),
            BasePrice::Amount,
        );
        Self {
            base_price,
            price_per_unit: None,
            unit: None,
        }
    }

    #[must_use]
    pub fn with_base_price(&self, base_price: Eur) -> Self {
        Self {
            base_price: BasePrice::Amount(base_price),
            ..self.clone()
        }
    }

}

#[cfg(test)]
impl Price {
    pub const fn base_price(&self) -> &BasePrice {
        &self.base_price
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.base_price {
            BasePrice::Amount(amount) => write!(f, "{amount}€")?,
            BasePrice::Unresolved(raw) => write!(f, "{raw}")?,
        }
        match (self.price_per_unit, &self.unit) {
            (Some(per_unit), Some(unit)) if per_unit != Eur::ZERO => {
                write!(f, " + {per_unit} {unit}")
            }
            _ => Ok(()),
        }
    }
}

/// Prices for the student, staff and guest tiers. A missing tier has no price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Prices {
    students: Option<Price>,
    staff: Option<Price>,
    guests: Option<Price>,
}

impl Prices {
    pub const fn new(students: Price, staff: Price, guests: Price) -> Self {
        Self {
            students: Some(students),
            staff: Some(staff),
            guests: Some(guests),
        }
    }

    /// A single price that only fills the student tier.
    pub const fn flat(price: Price) -> Self {
        Self {
            students: Some(price),
            staff: None,
            guests: None,
        }
    }

    /// Returns a copy where every present tier has its base price replaced.
    #[must_use]
    pub fn with_base_price(&self, base_price: Eur) -> Self {
        let set = |tier: &Option<Price>| tier.as_ref().map(|p| p.with_base_price(base_price));
        Self {
            students: set(&self.students),
            staff: set(&self.staff),
            guests: set(&self.guests),
        }
    }

    pub const fn students(&self) -> Option<&Price> {
        self.students.as_ref()
    }

}

#[cfg(test)]
impl Prices {
    pub const fn staff(&self) -> Option<&Price> {
        self.staff.as_ref()
    }

    pub const fn guests(&self) -> Option<&Price> {
        self.guests.as_ref()
    }

    pub const fn is_empty(&self) -> bool {
        self.students.is_none() && self.staff.is_none() && self.guests.is_none()
    }
}
