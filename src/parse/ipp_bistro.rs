use chrono::Weekday;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use super::collapse_whitespace::collapse_whitespace;
use super::columns::{char_offset, ColumnBoundaries};
use super::{links, weekly_documents, Error, Location, MenuParser, WeekOfYear};
use crate::fetch::{Fetcher, PdfText};
use crate::menu::{Dish, Ingredients, Menu, Menus, Price, Prices, DEFAULT_DISH_TYPE};
use crate::{static_regex, static_selector};

const PAGE_URL: &str = "http://konradhof-catering.com/ipp/";
const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];
/// The categories of a regular day, in the order they are listed.
const DISH_TYPES: [&str; 4] = [
    "Veggie",
    "Traditionelle Küche",
    "Internationale Küche",
    "Specials",
];
/// Every dish of the bistro is declared with the same ingredients.
const INGREDIENTS: &str = "Mi,Gl,Sf,Sl,Ei,Se,4";

/// Weekly PDF menus of the bistro at the plasma physics institute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IppBistroParser;

/// Where a day's column starts, and whether the column only says the bistro is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Anchor {
    start: usize,
    closed: bool,
}

impl Anchor {
    fn from_matches(line: &str, regex: &regex::Regex, correction: usize, closed: bool) -> Vec<Self> {
        regex
            .find_iter(line)
            .map(|m| Self {
                start: char_offset(line, m.start()).saturating_sub(correction),
                closed,
            })
            .collect()
    }
}

/// The table of one weekly menu: its five day columns and the line the dishes start on.
#[derive(Debug)]
struct Layout {
    columns: ColumnBoundaries<5>,
    closed: [bool; 5],
    menu_start: usize,
}

impl Layout {
    /// Columns are not labelled, so their starts are taken from the soup row, which reads
    /// `Tagessuppe siehe Aushang` above every open day, or from closed markers. The centered soup
    /// text starts three characters right of its column.
    fn find(lines: &[&str], week: WeekOfYear) -> Result<Self, Error> {
        static_regex!(SOUP_ROW <- r"(?i)Tagessuppe siehe Aushang|Aushang|Aschermittwoch|Feiertag|Geschlossen");
        static_regex!(SOUP_ONE_LINE <- r"(?i)T agessuppe siehe Aushang|Tagessuppe siehe Aushang");
        static_regex!(SOUP_TWO_LINES <- r"(?i)Aushang");
        static_regex!(CLOSED <- r"(?i)Aschermittwoch|Feiertag|Geschlossen");

        // `montag` and `freitag` also appear in the date range above the table
        let header_index = lines
            .iter()
            .position(|line| {
                let shrunk = line.replace(' ', "").to_lowercase();
                ["dienstag", "mittwoch", "donnerstag"]
                    .iter()
                    .any(|day| shrunk.contains(day))
            })
            .ok_or_else(|| Error::missing_structure("IPP bistro menu is not a weekly menu"))?;
        let header = lines[header_index];

        let mut soup_rows = lines
            .iter()
            .enumerate()
            .skip(header_index + 1)
            .filter(|(_, line)| SOUP_ROW.is_match(line));
        let (soup_index, soup_line) = soup_rows
            .next()
            .ok_or_else(|| Error::missing_structure("IPP bistro menu has no soup row"))?;
        let second_soup = soup_rows.next();
        let second_soup_line = second_soup.map_or("", |(_, line)| *line);

        let mut anchors = Anchor::from_matches(header, &CLOSED, 3, true);
        anchors.extend(Anchor::from_matches(soup_line, &SOUP_ONE_LINE, 3, false));
        // a soup text broken over two lines leaves `Aushang` alone in the second
        let two_line_anchors = Anchor::from_matches(second_soup_line, &SOUP_TWO_LINES, 14, false);
        let soup_index = match second_soup {
            Some((index, _)) if !two_line_anchors.is_empty() => index,
            _ => soup_index,
        };
        anchors.extend(two_line_anchors);
        anchors.extend(Anchor::from_matches(soup_line, &CLOSED, 3, true));
        anchors.extend(Anchor::from_matches(second_soup_line, &CLOSED, 3, true));
        anchors.sort_unstable();
        if anchors.len() != WEEKDAYS.len() {
            return Err(Error::missing_structure(format!(
                "IPP bistro menu of week {} in {}: only {} of 5 columns detected",
                week.week,
                week.year,
                anchors.len()
            )));
        }

        Ok(Self {
            columns: ColumnBoundaries::new(anchors.iter().map(|a| a.start).collect())?,
            closed: std::array::from_fn(|i| anchors[i].closed),
            // the two rows below the soup only hold its price
            menu_start: soup_index + 3,
        })
    }
}

impl IppBistroParser {
    /// Parses the text of the first page of one weekly menu.
    pub fn get_menus(text: &str, week: WeekOfYear) -> Result<Menus, Error> {
        let lines: Vec<&str> = text.lines().collect();
        let layout = Layout::find(&lines, week)?;
        log::debug!(
            "IPP bistro week {} columns start at {:?}",
            week.week,
            layout.columns.starts()
        );
        let blobs = layout.columns.blobs(lines.iter().skip(layout.menu_start).copied());

        let mut menus = Menus::new();
        for ((blob, closed), weekday) in blobs.iter().zip(layout.closed).zip(WEEKDAYS) {
            if closed || blob.to_lowercase().contains("geschlossen") {
                continue;
            }
            let date = week.date(weekday)?;
            menus.insert(date, Menu::new(date, parse_dishes(blob)).deduplicated());
        }
        Ok(menus)
    }
}

impl MenuParser for IppBistroParser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        pdf: &P,
        _location: Location,
    ) -> crate::Result<Menus> {
        static_selector!(PDF_LINK_SELECTOR <- "a[title*='KW_']");
        let page_url = Url::parse(PAGE_URL).map_err(|_| Error::html_parse_error("IPP bistro url is invalid"))?;
        let page = fetcher.fetch_text(&page_url).await?;
        let urls = links(&page, &page_url, &PDF_LINK_SELECTOR, "href");
        if urls.is_empty() {
            log::warn!("No menu documents linked on {page_url}");
        }
        Ok(weekly_documents(fetcher, pdf, &urls, true, |name, text| {
            Self::get_menus(text, WeekOfYear::from_ipp_file_name(name)?)
        })
        .await)
    }
}

fn parse_dishes(blob: &str) -> Vec<Dish> {
    static_regex!(SURPRISE_WITHOUT_PRICE <- r"(Überraschungsmenü\s)(\s+[^\s\d]+)");
    static_regex!(DISH <- r"(.+?)(\d+,\d+|\?€)\s€[^)]");

    // the second `€` separates the symbolic price from the next dish
    let blob = SURPRISE_WITHOUT_PRICE.replace_all(blob, "${1}?€ € ${2}");
    let blob: String = blob.nfkc().collect();
    let blob = format!("{} ", collapse_whitespace(&blob));

    let found: Vec<(&str, &str)> = DISH
        .captures_iter(&blob)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str();
            let price = captures.get(2)?.as_str();
            Some((name, price))
        })
        .collect();
    let ingredients = Ingredients::new(Location::IppBistro.ingredient_scope()).parsed(INGREDIENTS);
    found
        .iter()
        .enumerate()
        .map(|(i, (name, price))| {
            let dish_type = if found.len() == DISH_TYPES.len() {
                DISH_TYPES[i]
            } else {
                DEFAULT_DISH_TYPE
            };
            Dish::new(
                name.trim(),
                Prices::flat(Price::parse(price)),
                ingredients.clone(),
                dish_type,
            )
        })
        .collect()
}
