use std::fmt::Display;

use super::{ingredients::Ingredients, price::Prices};

pub const DEFAULT_DISH_TYPE: &str = "Tagesgericht";

/// Labels whose variants (`Aktionsessen 3`, `Biogericht 1`, ...) collapse onto the bare label.
const DISH_TYPE_BUCKETS: [&str; 4] = [
    DEFAULT_DISH_TYPE,
    "Aktionsessen",
    "Biogericht",
    "StuBistro Gericht",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Dish {
    name: String,
    prices: Prices,
    ingredients: Ingredients,
    dish_type: String,
}

impl Dish {
    pub fn new(name: impl Into<String>, prices: Prices, ingredients: Ingredients, dish_type: &str) -> Self {
        Self {
            name: name.into(),
            prices,
            ingredients,
            dish_type: uniform_dish_type(dish_type).to_string(),
        }
    }

    pub const fn prices(&self) -> &Prices {
        &self.prices
    }

    pub const fn ingredients(&self) -> &Ingredients {
        &self.ingredients
    }

    pub fn dish_type(&self) -> &str {
        &self.dish_type
    }
}

#[cfg(test)]
impl Dish {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Dish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.ingredients.flags())?;
        if let Some(price) = self.prices.students() {
            write!(f, ": {price}")?;
        }
        Ok(())
    }
}

pub fn uniform_dish_type(raw: &str) -> &str {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_DISH_TYPE;
    }
    DISH_TYPE_BUCKETS
        .into_iter()
        .find(|bucket| raw.starts_with(bucket))
        .unwrap_or(raw)
}
