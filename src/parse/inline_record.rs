use crate::menu::{Dish, IngredientScope, Ingredients, Price, Prices};
use crate::parse::collapse_whitespace::collapse_whitespace;
use crate::static_regex;

const HOLIDAY: &str = "Feiertag";

/// A dish written as free text, with ingredient codes and the price inline:
/// `Schweinebraten mit Knödel S,1 3,50 €`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRecord {
    name: String,
    prices: Prices,
    ingredients: Ingredients,
}

impl InlineRecord {
    pub fn parse(raw: &str) -> Self {
        static_regex!(INGREDIENT_CODES <- r"\s[A-CE-HK-PR-Z1-9](,[A-CE-HK-PR-Z1-9])*(\s|\z)");
        static_regex!(PRICE <- r"\d+(,\d{2})\s?€");

        let mut ingredients = Ingredients::new(IngredientScope::MedizinerMensa);
        let mut text = raw.to_string();
        // matches consume the whitespace around them, so neighbouring groups need another pass
        loop {
            let codes: Vec<&str> = INGREDIENT_CODES.find_iter(&text).map(|m| m.as_str()).collect();
            if codes.is_empty() {
                break;
            }
            for code in codes {
                ingredients.parse_ingredients(code);
            }
            text = INGREDIENT_CODES.replace_all(&text, " ").into_owned();
        }
        let text = collapse_whitespace(&text).replace(" , ", ", ");

        let prices = PRICE
            .find(&text)
            .map_or_else(Prices::default, |price| Prices::flat(Price::parse(price.as_str())));
        let name = collapse_whitespace(&PRICE.replace_all(&text, "")).into_owned();

        Self {
            name,
            prices,
            ingredients,
        }
    }

    /// Empty records and holiday placeholders are not dishes.
    pub fn is_dish(&self) -> bool {
        !self.name.is_empty() && self.name != HOLIDAY
    }

    pub fn into_dish(self, dish_type: &str) -> Dish {
        Dish::new(self.name, self.prices, self.ingredients, dish_type)
    }
}

#[cfg(test)]
impl InlineRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn prices(&self) -> &Prices {
        &self.prices
    }

    pub const fn ingredients(&self) -> &Ingredients {
        &self.ingredients
    }
}
