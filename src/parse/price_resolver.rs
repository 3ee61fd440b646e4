use std::collections::HashMap;
use std::sync::OnceLock;

use crate::menu::{Eur, Price, Prices};

/// Leopoldstraße prices its dishes by its own table.
const LEOPOLDSTR_ID: u16 = 411;
/// Garching prices every dish by weight.
const GARCHING_ID: u16 = 422;

/// Self-service base fee for meat and fish.
const MEAT_BASE: Eur = Eur::from_cents(100);
const FISH_BASE: Eur = Eur::from_cents(150);

/// The markers of one dish as the structured menu page lists them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawDish<'a> {
    pub category: &'a str,
    pub additional: &'a str,
    pub allergens: &'a str,
    pub type_flags: &'a str,
    /// `0` meat, `1` vegetarian, `2` vegan
    pub meatless: &'a str,
}

impl RawDish<'_> {
    /// A row that only continues the name of the dish above it.
    pub fn is_continuation(&self) -> bool {
        [
            self.category,
            self.additional,
            self.allergens,
            self.type_flags,
            self.meatless,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }
}

struct PriceTables {
    self_service_classic: Prices,
    self_service_vegan: Prices,
    leopoldstr: HashMap<&'static str, Prices>,
    fallback: HashMap<&'static str, Prices>,
}

fn flat(students: i64, staff: i64, guests: i64) -> Prices {
    Prices::new(
        Price::new(Eur::from_cents(students)),
        Price::new(Eur::from_cents(staff)),
        Price::new(Eur::from_cents(guests)),
    )
}

fn per_100g(students: i64, staff: i64, guests: i64) -> Prices {
    let price = |cents| Price::per_unit(Eur::ZERO, Eur::from_cents(cents), "100g");
    Prices::new(price(students), price(staff), price(guests))
}

fn tables() -> &'static PriceTables {
    static TABLES: OnceLock<PriceTables> = OnceLock::new();
    TABLES.get_or_init(|| PriceTables {
        self_service_classic: per_100g(75, 90, 105),
        self_service_vegan: per_100g(33, 55, 66),
        leopoldstr: HashMap::from([
            ("Grüne Mensa", Prices::default()),
            ("Vegan", per_100g(33, 55, 66)),
            ("Vegetarisch", per_100g(75, 85, 95)),
            ("Suppe", flat(55, 65, 80)),
            ("Länder-Mensa", Prices::default()),
            ("Länder Menü", per_100g(75, 85, 95)),
            ("Länder-Suppe", flat(55, 65, 80)),
            ("Mensa Klassiker", Prices::default()),
            ("Klassik Menü", per_100g(85, 90, 100)),
            ("Klassik Tellergericht", Prices::default()),
            ("Klassik Suppe", flat(55, 65, 80)),
            ("Mensa Spezial Pasta", Prices::default()),
            ("Pasta-Menü", per_100g(60, 70, 80)),
            ("Beilage", flat(60, 77, 92)),
            ("Aktionssalat 3", flat(80, 114, 134)),
            ("Dessert", flat(60, 77, 92)),
            ("Aktionsdessert 3", flat(80, 114, 134)),
            ("Aktionsdessert 4", flat(100, 134, 154)),
            ("Frische Säfte", flat(150, 150, 150)),
        ]),
        fallback: HashMap::from([
            ("Tagesgericht 1", flat(100, 190, 240)),
            ("Tagesgericht 2", flat(155, 225, 275)),
            ("Tagesgericht 3", flat(190, 260, 310)),
            ("Tagesgericht 4", flat(240, 295, 345)),
            ("Suppe", flat(55, 65, 80)),
            ("Stärkebeilagen", flat(60, 77, 92)),
            ("Beilage", flat(60, 79, 94)),
            ("Salatbuffet", per_100g(85, 90, 95)),
            ("Obst", flat(80, 80, 80)),
            ("Aktionsgericht 1", flat(155, 225, 275)),
            ("Aktionsgericht 2", flat(190, 260, 310)),
            ("Aktionsgericht 3", flat(240, 295, 345)),
            ("Aktionsgericht 4", flat(260, 330, 380)),
            ("Aktionsgericht 5", flat(280, 365, 415)),
            ("Aktionsgericht 6", flat(300, 400, 450)),
            ("Aktionsgericht 7", flat(320, 435, 485)),
            ("Aktionsgericht 8", flat(350, 470, 520)),
            ("Aktionsgericht 9", flat(400, 505, 555)),
            ("Aktionsgericht 10", flat(450, 540, 590)),
            ("Aktionsgericht 11", flat(550, 650, 720)),
            ("Biogericht 1", flat(155, 225, 275)),
            ("Biogericht 2", flat(190, 260, 310)),
            ("Biogericht 3", flat(240, 295, 345)),
            ("Biogericht 4", flat(260, 330, 380)),
            ("Biogericht 5", flat(280, 365, 415)),
            ("Biogericht 6", flat(300, 400, 450)),
            ("Biogericht 7", flat(320, 435, 485)),
            ("Biogericht 8", flat(350, 470, 520)),
            ("Biogericht 9", flat(400, 505, 555)),
            ("Biogericht 10", flat(450, 540, 590)),
            ("Biogericht 11", flat(550, 650, 720)),
            ("Biobeilage 1", flat(60, 79, 99)),
            ("Biobeilage 2", flat(75, 94, 114)),
            ("Biobeilage 3", flat(85, 114, 134)),
            ("Biobeilage 4", flat(105, 134, 154)),
            ("Biobeilage 6", flat(140, 160, 180)),
            ("Aktionsbeilage 1", flat(60, 79, 99)),
            ("Aktionsbeilage 2", flat(75, 94, 114)),
            ("Aktionsbeilage 3", flat(85, 114, 134)),
            ("Aktionsbeilage 4", flat(105, 134, 154)),
            ("Aktionsbeilage 6", flat(140, 160, 180)),
        ]),
    })
}

/// The prices of a dish served by the Studentenwerk canteen with page id `location_id`.
///
/// Self-service dishes (and every dish in Garching) are priced by weight according to their
/// meat marker. Everything else is looked up by its raw category label; an unknown label has no
/// price.
pub fn resolve_price(location_id: u16, dish: &RawDish<'_>) -> Prices {
    let tables = tables();
    if dish.category.contains("Self-Service") || location_id == GARCHING_ID {
        match dish.meatless {
            "0" => {
                // sausages are not marked apart from other meat and pay the meat fee
                let base = if dish.allergens.contains("Fi") {
                    FISH_BASE
                } else {
                    MEAT_BASE
                };
                return tables.self_service_classic.with_base_price(base);
            }
            "1" => return tables.self_service_classic.clone(),
            "2" => return tables.self_service_vegan.clone(),
            _ => {}
        }
    }
    let table = if location_id == LEOPOLDSTR_ID {
        &tables.leopoldstr
    } else {
        &tables.fallback
    };
    table.get(dish.category).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students(prices: &Prices) -> String {
        prices.students().map(ToString::to_string).unwrap_or_default()
    }

    #[test]
    fn test_self_service_meat_gets_base_fee() {
        let meat = RawDish {
            category: "Self-Service Tagesgericht",
            meatless: "0",
            ..RawDish::default()
        };
        assert_eq!(students(&resolve_price(431, &meat)), "1.00€ + 0.75 100g");

        let fish = RawDish {
            allergens: "Fi,Gl",
            ..meat
        };
        let prices = resolve_price(431, &fish);
        assert_eq!(students(&prices), "1.50€ + 0.75 100g");
        assert_eq!(prices.guests().map(ToString::to_string).unwrap(), "1.50€ + 1.05 100g");

        // the shared table is never changed by a resolution
        let vegetarian = RawDish {
            meatless: "1",
            ..meat
        };
        assert_eq!(students(&resolve_price(431, &vegetarian)), "0.00€ + 0.75 100g");
    }

    #[test]
    fn test_garching_is_priced_by_weight() {
        let vegan = RawDish {
            category: "Tagesgericht 1",
            meatless: "2",
            ..RawDish::default()
        };
        assert_eq!(students(&resolve_price(422, &vegan)), "0.00€ + 0.33 100g");
        assert_eq!(students(&resolve_price(431, &vegan)), "1.00€");
    }

    #[test]
    fn test_table_lookup() {
        let dish = RawDish {
            category: "Klassik Suppe",
            meatless: "1",
            ..RawDish::default()
        };
        assert_eq!(students(&resolve_price(411, &dish)), "0.55€");
        assert!(resolve_price(431, &dish).is_empty());

        let side = RawDish {
            category: "Beilage",
            ..RawDish::default()
        };
        assert_eq!(
            resolve_price(411, &side).staff().map(ToString::to_string).unwrap(),
            "0.77€"
        );
        assert_eq!(
            resolve_price(423, &side).staff().map(ToString::to_string).unwrap(),
            "0.79€"
        );
    }

    #[test]
    fn test_continuation_rows() {
        assert!(RawDish::default().is_continuation());
        assert!(!RawDish {
            allergens: "Gl",
            ..RawDish::default()
        }
        .is_continuation());
    }
}
