use std::collections::HashSet;

use chrono::NaiveDate;

use super::dish::Dish;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Menu {
    // serialized as yyyy-MM-dd
    date: NaiveDate,
    dishes: Vec<Dish>,
}

impl Menu {
    pub const fn new(date: NaiveDate, dishes: Vec<Dish>) -> Self {
        Self { date, dishes }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Drops every dish that is structurally equal to an earlier one.
    pub fn remove_duplicates(&mut self) {
        let mut seen = HashSet::with_capacity(self.dishes.len());
        self.dishes.retain(|dish| seen.insert(dish.clone()));
    }

    #[must_use]
    pub fn deduplicated(mut self) -> Self {
        self.remove_duplicates();
        self
    }
}

#[cfg(test)]
impl Menu {
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }
}

impl PartialEq for Menu {
    // dish order is ignored
    fn eq(&self, other: &Self) -> bool {
        let ours: HashSet<&Dish> = self.dishes.iter().collect();
        let theirs: HashSet<&Dish> = other.dishes.iter().collect();
        self.date == other.date && ours == theirs
    }
}

impl Eq for Menu {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Eur, IngredientScope, Ingredients, Price, Prices};

    fn dish(name: &str, cents: i64) -> Dish {
        Dish::new(
            name,
            Prices::flat(Price::new(Eur::from_cents(cents))),
            Ingredients::new(IngredientScope::Studentenwerk),
            "Tagesgericht",
        )
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let date = NaiveDate::from_ymd_opt(2017, 11, 6).unwrap();
        let mut menu = Menu::new(
            date,
            vec![
                dish("Suppe", 100),
                dish("Pasta", 350),
                dish("Suppe", 100),
                dish("Suppe", 120),
                dish("Pasta", 350),
            ],
        );
        menu.remove_duplicates();
        let names: Vec<&str> = menu.dishes().iter().map(Dish::name).collect();
        assert_eq!(names, vec!["Suppe", "Pasta", "Suppe"]);

        let once = menu.clone();
        menu.remove_duplicates();
        assert_eq!(menu.dishes(), once.dishes());
    }

    #[test]
    fn test_equality_ignores_order() {
        let date = NaiveDate::from_ymd_opt(2017, 11, 6).unwrap();
        let a = Menu::new(date, vec![dish("Suppe", 100), dish("Pasta", 350)]);
        let b = Menu::new(date, vec![dish("Pasta", 350), dish("Suppe", 100)]);
        let c = Menu::new(date.succ_opt().unwrap(), vec![dish("Pasta", 350)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
