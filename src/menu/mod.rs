mod daily_menu;
mod dish;
mod ingredients;
mod normalize;
mod price;
mod week;

use std::collections::BTreeMap;

use chrono::NaiveDate;

pub use daily_menu::Menu;
pub use dish::{Dish, DEFAULT_DISH_TYPE};
pub use ingredients::Ingredients;
pub use normalize::IngredientScope;
#[cfg(test)]
pub use price::BasePrice;
pub use price::{Eur, Price, Prices};
pub use week::Week;

/// The result of parsing one location: one menu per served date.
pub type Menus = BTreeMap<NaiveDate, Menu>;
