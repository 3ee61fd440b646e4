use chrono::{Datelike, Weekday};
use unicode_normalization::UnicodeNormalization;
use url::Url;

use super::collapse_whitespace::collapse_whitespace;
use super::columns::{char_offset, ColumnBoundaries};
use super::{links, weekly_documents, Error, Location, MenuParser, WeekOfYear};
use crate::fetch::{Fetcher, PdfText};
use crate::menu::{Dish, IngredientScope, Ingredients, Menu, Menus, Price, Prices, DEFAULT_DISH_TYPE};
use crate::{static_regex, static_selector};

const PAGE_URL: &str = "http://www.wilhelm-gastronomie.de/";
const WEEKDAYS: [(&str, Weekday); 5] = [
    ("Montag", Weekday::Mon),
    ("Dienstag", Weekday::Tue),
    ("Mittwoch", Weekday::Wed),
    ("Donnerstag", Weekday::Thu),
    ("Freitag", Weekday::Fri),
];
/// Boilerplate around the featured dish of the older layout.
const AKTION_NOISE: [&str; 4] = [
    "Montag – Freitag",
    "Tagessuppe täglich wechselndes Angebot",
    "ab € 1,00",
    "Aktion",
];

/// Weekly PDF menus of the bistro in the Garching computer science building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FmiBistroParser;

impl FmiBistroParser {
    /// Parses the text of one weekly menu. Fails when the weekday header row is missing.
    pub fn get_menus(text: &str, week: WeekOfYear) -> Result<Menus, Error> {
        let lines: Vec<&str> = text.lines().collect();
        let header_index = lines
            .iter()
            .position(|line| {
                line.replace(' ', "").to_lowercase() == "montagdienstagmittwochdonnerstagfreitag"
            })
            .ok_or_else(|| Error::missing_structure("FMI bistro menu has no weekday header"))?;
        let lines = &lines[header_index..];
        let header = lines[0];
        let starts = WEEKDAYS
            .iter()
            .filter_map(|(label, _)| header.find(label).map(|byte| char_offset(header, byte)))
            .collect();
        let columns = ColumnBoundaries::<5>::new(starts)?;
        log::debug!("FMI bistro week {} columns start at {:?}", week.week, columns.starts());

        let mut blobs: [String; 5] = std::array::from_fn(|_| String::new());
        for line in lines {
            for ((blob, cell), (label, _)) in blobs.iter_mut().zip(columns.slice(line)).zip(WEEKDAYS) {
                blob.push(' ');
                blob.push_str(&cell.replace(label, ""));
            }
        }

        // up to five dishes a day since 2018; before, three plus the featured dish of the week
        let mut num_dishes = 5;
        if week.year < 2018 {
            num_dishes = 3;
            if let Some(aktion) = featured_dish(lines) {
                num_dishes += aktion.matches('€').count();
                for blob in &mut blobs {
                    *blob = format!("{aktion}, {blob}");
                }
            }
        }

        let mut menus = Menus::new();
        for (blob, (_, weekday)) in blobs.iter().zip(WEEKDAYS) {
            if blob.to_lowercase().contains("geschlossen") {
                continue;
            }
            let date = week.date(weekday)?;
            let dishes = parse_dishes(blob, num_dishes);
            menus.insert(date, Menu::new(date, dishes).deduplicated());
        }
        Ok(menus)
    }
}

impl MenuParser for FmiBistroParser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        pdf: &P,
        _location: Location,
    ) -> crate::Result<Menus> {
        static_selector!(PDF_LINK_SELECTOR <- "a[href*='Garching-KW']");
        let page_url = Url::parse(PAGE_URL).map_err(|_| Error::html_parse_error("FMI bistro url is invalid"))?;
        let page = fetcher.fetch_text(&page_url).await?;
        let urls = links(&page, &page_url, &PDF_LINK_SELECTOR, "href");
        if urls.is_empty() {
            log::warn!("No menu documents linked on {page_url}");
        }
        let current_year = chrono::Local::now().year();
        Ok(weekly_documents(fetcher, pdf, &urls, false, |name, text| {
            Self::get_menus(text, WeekOfYear::from_fmi_file_name(name, current_year)?)
        })
        .await)
    }
}

/// The older layout lists one featured dish for the whole week on the line containing `Aktion`
/// and the two lines above it.
fn featured_dish(lines: &[&str]) -> Option<String> {
    let mut marked = lines.iter().enumerate().filter(|(_, line)| line.contains("Aktion"));
    let (index, _) = marked.next()?;
    if marked.next().is_some() {
        return None;
    }
    let start = index.saturating_sub(2);
    let mut aktion = lines[start..=index].join(" ");
    for noise in AKTION_NOISE {
        aktion = aktion.replace(noise, "");
    }
    Some(aktion)
}

/// Splits the allergen lists off a day and pairs the remaining dishes with them in order.
fn parse_dishes(blob: &str, num_dishes: usize) -> Vec<Dish> {
    static_regex!(ALLERGENS <- r"Allergene:(?:\s*(?:Gluten|Laktose|Milcheiweiß|Milch|Hühnerei|Soja|Nüsse|Erdnuss|Sellerie|Fisch|Krebstiere|Weichtiere|Sesam|Senf|Ei)\b,?)*");
    static_regex!(ALLERGEN_LABEL <- r"Allergene:|\s");
    static_regex!(DISH <- r".+?€\s\d+,\d+");
    static_regex!(PRICE <- r"€\s\d+,\d+");

    let allergens: Vec<String> = ALLERGENS
        .find_iter(blob)
        .map(|m| ALLERGEN_LABEL.replace_all(m.as_str(), "").into_owned())
        .collect();
    let text: String = ALLERGENS.replace_all(blob, "").nfkc().collect();
    let text = collapse_whitespace(&text).replace("./.", "");

    DISH.find_iter(&text)
        .enumerate()
        .filter_map(|(i, dish)| {
            let price = PRICE.find(dish.as_str())?;
            let name = PRICE.replace_all(dish.as_str(), "").replace(',', "");
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            // a dish without an allergen list has none
            let ingredients = Ingredients::new(IngredientScope::FmiBistro)
                .parsed(allergens.get(i).map_or("", String::as_str));
            Some(Dish::new(
                name,
                Prices::flat(Price::parse(price.as_str())),
                ingredients,
                DEFAULT_DISH_TYPE,
            ))
        })
        .take(num_dishes)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fetch::stub::{PlainText, StubFetcher};
    use crate::menu::{BasePrice, Eur};

    const WIDTH: usize = 20;

    fn row(cells: [&str; 5]) -> String {
        cells.iter().map(|cell| format!("{cell:<WIDTH$}")).collect()
    }

    fn header() -> String {
        row(["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag"])
    }

    fn students_base(dish: &Dish) -> Option<BasePrice> {
        dish.prices().students().map(|price| price.base_price().clone())
    }

    #[test]
    fn test_five_aligned_columns() {
        let text = [
            "Speiseplan KW 45".to_string(),
            String::new(),
            header(),
            row(["Dish Name € 3,50"; 5]),
        ]
        .join("\n");
        let menus = FmiBistroParser::get_menus(&text, WeekOfYear::new(45, 2018)).unwrap();
        assert_eq!(menus.len(), 5);
        let monday = NaiveDate::from_ymd_opt(2018, 11, 5).unwrap();
        assert_eq!(menus.keys().next(), Some(&monday));
        for menu in menus.values() {
            assert_eq!(menu.dishes().len(), 1);
            let dish = &menu.dishes()[0];
            assert_eq!(dish.name(), "Dish Name");
            assert_eq!(students_base(dish), Some(BasePrice::Amount(Eur::from_cents(350))));
            assert_eq!(dish.dish_type(), "Tagesgericht");
        }
    }

    #[test]
    fn test_allergens_and_closed_days() {
        let text = [
            header(),
            row(["Pasta € 3,50", "Geschlossen", "Curry € 4,20", "Fisch € 5,10", "Suppe € 2,00"]),
            row(["Allergene: Gluten,", "", "./.", "Allergene: Fisch", ""]),
            row(["Ei", "", "", "", ""]),
        ]
        .join("\n");
        let menus = FmiBistroParser::get_menus(&text, WeekOfYear::new(45, 2018)).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2018, 11, 6).unwrap();
        assert_eq!(menus.len(), 4);
        assert!(!menus.contains_key(&tuesday));

        let dishes: Vec<(&str, Vec<&str>)> = menus
            .values()
            .map(|menu| (menu.dishes()[0].name(), menu.dishes()[0].ingredients().codes()))
            .collect();
        assert_eq!(
            dishes,
            vec![
                ("Pasta", vec!["Ei", "Gl"]),
                ("Curry", vec![]),
                ("Fisch", vec!["Fi"]),
                ("Suppe", vec![]),
            ]
        );
    }

    #[test]
    fn test_featured_dish_before_2018() {
        let far = " ".repeat(WIDTH * 4 + 2);
        let text = [
            header(),
            row(["Pasta € 2,50", "Pasta € 2,50", "Reis € 2,70", "Pasta € 2,50", "geschlossen"]),
            format!("{far}Montag – Freitag"),
            format!("{far}Pizza € 4,50"),
            format!("{far}Aktion"),
        ]
        .join("\n");
        let menus = FmiBistroParser::get_menus(&text, WeekOfYear::new(45, 2017)).unwrap();
        assert_eq!(menus.len(), 4);
        for menu in menus.values() {
            let names: Vec<&str> = menu.dishes().iter().map(Dish::name).collect();
            assert_eq!(names[0], "Pizza");
            assert_eq!(names.len(), 2);
        }
        let wednesday = &menus[&NaiveDate::from_ymd_opt(2017, 11, 8).unwrap()];
        assert_eq!(wednesday.dishes()[1].name(), "Reis");
    }

    #[test]
    fn test_dishes_are_capped() {
        let blob = " A € 1,00 B € 1,00 A € 1,00 C € 1,00 D € 1,00 E € 1,00 F € 1,00";
        let names: Vec<String> = parse_dishes(blob, 5)
            .iter()
            .map(|dish| dish.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "A", "C", "D"]);
    }

    #[test]
    fn test_missing_header_fails_the_document() {
        assert!(matches!(
            FmiBistroParser::get_menus("Betriebsferien", WeekOfYear::new(1, 2019)),
            Err(Error::MissingStructure(_))
        ));
    }

    #[tokio::test]
    async fn test_parse_follows_pdf_links() {
        let page = r#"<a href="/files/Garching-KW45-2018.pdf">KW 45</a>"#;
        let text = [header(), row(["Dish Name € 3,50"; 5])].join("\n");
        let fetcher = StubFetcher::default()
            .with_page(PAGE_URL, page)
            .with_page("http://www.wilhelm-gastronomie.de/files/Garching-KW45-2018.pdf", text);
        let menus = FmiBistroParser
            .parse(&fetcher, &PlainText, Location::FmiBistro)
            .await
            .unwrap();
        assert_eq!(menus.len(), 5);
        assert!(menus.contains_key(&NaiveDate::from_ymd_opt(2018, 11, 9).unwrap()));
    }
}
