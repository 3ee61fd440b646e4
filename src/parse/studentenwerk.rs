use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use url::Url;

use super::price_resolver::{resolve_price, RawDish};
use super::text_from_selection::{own_text, text_from_selection};
use super::{Error, Location, MenuParser};
use crate::fetch::{Fetcher, PdfText};
use crate::menu::{Dish, IngredientScope, Ingredients, Menu, Menus};
use crate::static_selector;

/// Menu pages of the Studentenwerk canteens, one page per canteen with all upcoming days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentenwerkParser;

impl StudentenwerkParser {
    pub fn url(location_id: u16) -> Result<Url, Error> {
        Url::parse(&format!(
            "http://www.studentenwerk-muenchen.de/mensa/speiseplan/speiseplan_{location_id}_-de.html"
        ))
        .map_err(|_| Error::html_parse_error("Menu page url is invalid"))
    }

    /// Parses one menu page. A day whose date cannot be read is logged and skipped.
    pub fn get_menus(html: &str, location_id: u16, scope: IngredientScope) -> Menus {
        static_selector!(DAY_SELECTOR <- "div.c-schedule__item");
        let document = Html::parse_document(html);
        let mut menus = Menus::new();
        for day in document.select(&DAY_SELECTOR) {
            match parse_day(day, location_id, scope) {
                Ok(menu) => {
                    menus.insert(menu.date(), menu);
                }
                Err(e) => log::warn!("Skipping day on menu page {location_id}: {e}"),
            }
        }
        menus
    }
}

impl MenuParser for StudentenwerkParser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        _pdf: &P,
        location: Location,
    ) -> crate::Result<Menus> {
        let Location::Studentenwerk { id, .. } = location else {
            return Err(Error::UnknownLocation(format!("{location} has no Studentenwerk menu page")).into());
        };
        let html = fetcher.fetch_text(&Self::url(id)?).await?;
        Ok(Self::get_menus(&html, id, location.ingredient_scope()))
    }
}

/// `Montag, 06.11.2017`; the weekday is ignored.
fn parse_date(label: &str) -> Result<NaiveDate, Error> {
    let date = label.rsplit(", ").next().unwrap_or(label).trim();
    Ok(NaiveDate::parse_from_str(date, "%d.%m.%Y")?)
}

fn attr<'a>(item: ElementRef<'a>, name: &str) -> &'a str {
    item.value().attr(name).unwrap_or_default()
}

fn parse_day(day: ElementRef<'_>, location_id: u16, scope: IngredientScope) -> Result<Menu, Error> {
    static_selector!(DATE_SELECTOR <- "strong");
    static_selector!(NAME_SELECTOR <- "p.js-schedule-dish-description");
    static_selector!(CATEGORY_SELECTOR <- "span.stwm-artname");
    static_selector!(ITEM_SELECTOR <- "li.js-menu__list-item");

    let date = parse_date(&text_from_selection(&DATE_SELECTOR, day, "day", "date")?)?;
    let names = make_duplicates_unique(
        day.select(&NAME_SELECTOR)
            .map(|name| own_text(name).trim_end().to_string())
            .collect(),
    );
    let categories: Vec<String> = day
        .select(&CATEGORY_SELECTOR)
        .map(|category| category.text().collect())
        .collect();
    let items: Vec<ElementRef<'_>> = day.select(&ITEM_SELECTOR).collect();

    let mut dishes: Vec<Dish> = Vec::with_capacity(names.len());
    for ((name, category), &item) in names.into_iter().zip(&categories).zip(&items) {
        let raw = RawDish {
            category: category.trim(),
            additional: attr(item, "data-essen-zusatz"),
            allergens: attr(item, "data-essen-allergene"),
            type_flags: attr(item, "data-essen-typ"),
            meatless: attr(item, "data-essen-fleischlos"),
        };
        let dish = match dishes.last() {
            // a dish spanning several rows only names its first row
            Some(previous) if raw.is_continuation() => Dish::new(
                name,
                previous.prices().clone(),
                previous.ingredients().clone(),
                previous.dish_type(),
            ),
            _ => {
                let mut ingredients = Ingredients::new(scope);
                ingredients.parse_ingredients(raw.additional);
                ingredients.parse_ingredients(raw.allergens);
                ingredients.parse_ingredients(raw.type_flags);
                Dish::new(name, resolve_price(location_id, &raw), ingredients, raw.category)
            }
        };
        dishes.push(dish);
    }
    Ok(Menu::new(date, dishes))
}

/// Appends ` (2)`, ` (3)`, ... to repeated names, skipping counters that would collide with a
/// name already on the page.
fn make_duplicates_unique(names: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = names.iter().cloned().collect();
    let mut counters: HashMap<String, usize> = HashMap::with_capacity(names.len());
    names
        .into_iter()
        .map(|name| {
            let count = counters.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            loop {
                let candidate = format!("{name} ({count})");
                if used.insert(candidate.clone()) {
                    return candidate;
                }
                *count += 1;
            }
        })
        .collect()
}
