use chrono::Weekday;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use super::columns::char_slice;
use super::inline_record::InlineRecord;
use super::{links, weekly_documents, Error, Location, MenuParser, WeekOfYear};
use crate::fetch::{Fetcher, PdfText};
use crate::menu::{Dish, Menu, Menus};
use crate::{static_regex, static_selector};

const START_PAGE_URL: &str = "https://www.sv.tum.de/med/startseite/";
const BASE_URL: &str = "https://www.sv.tum.de";
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
const DEFAULT_SOUP_TYPE: &str = "Suppe";
const EXTRA_DISH_TYPE: &str = "Extraessen";
const SEPARATOR: &str = "***";

/// Character columns of the soup and the main dishes within a day.
const SOUP_COLUMN: (usize, usize) = (0, 36);
const MAINS_COLUMN: (usize, usize) = (40, 100);

/// The weekly PDF menu of the hospital canteen, which serves every day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedizinerMensaParser;

impl MedizinerMensaParser {
    /// Parses the text of the first page of the weekly menu.
    ///
    /// Every day of the week must be present. A day with nothing but a holiday note gets an empty
    /// menu.
    pub fn get_menus(text: &str, week: WeekOfYear) -> Result<Menus, Error> {
        static_regex!(DAY <- r"(Montag|Dienstag|Mittwoch|Donnerstag|Freitag|Samstag|Sonntag),\s\d{1,2}.\d{1,2}.\d{4}");

        let lines: Vec<&str> = text.lines().collect();
        let dish_types = dish_types(&lines);

        let first = lines
            .iter()
            .position(|line| line.contains("Montag"))
            .unwrap_or(lines.len());
        let lines = &lines[first..];
        // additives and allergens are explained below the last separator
        let last = lines
            .iter()
            .rposition(|line| line.contains(SEPARATOR))
            .unwrap_or(lines.len());
        let body = lines[..last].join("\n").replace('*', "");

        let days: Vec<&str> = DAY
            .split(body.trim())
            .filter(|day| !day.is_empty())
            .collect();
        if days.len() != WEEKDAYS.len() {
            return Err(Error::missing_structure(format!(
                "Mediziner Mensa menu of week {} in {} lists {} days instead of 7",
                week.week,
                week.year,
                days.len()
            )));
        }

        let mut menus = Menus::new();
        for (day, weekday) in days.into_iter().zip(WEEKDAYS) {
            let date = week.date(weekday)?;
            let dishes = parse_day(day, &dish_types);
            menus.insert(date, Menu::new(date, dishes).deduplicated());
        }
        Ok(menus)
    }
}

impl MenuParser for MedizinerMensaParser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        pdf: &P,
        _location: Location,
    ) -> crate::Result<Menus> {
        static_selector!(PDF_LINK_SELECTOR <- "a[href*='Mensaplan/KW_']");
        let page_url = Url::parse(START_PAGE_URL)
            .map_err(|_| Error::html_parse_error("Mediziner Mensa url is invalid"))?;
        let base_url = Url::parse(BASE_URL)
            .map_err(|_| Error::html_parse_error("Mediziner Mensa url is invalid"))?;
        let page = fetcher.fetch_text(&page_url).await?;
        let urls = links(&page, &base_url, &PDF_LINK_SELECTOR, "href");
        // only the current week is linked
        if urls.len() != 1 {
            return Err(Error::missing_structure(format!(
                "expected one menu document on {page_url}, found {}",
                urls.len()
            ))
            .into());
        }
        Ok(weekly_documents(fetcher, pdf, &urls, true, |name, text| {
            Self::get_menus(text, WeekOfYear::from_mediziner_file_name(name)?)
        })
        .await)
    }
}

/// The dish type labels, from the last non-blank line above the first separator.
fn dish_types(lines: &[&str]) -> Vec<String> {
    static_regex!(LABEL_GAP <- r"\s{2,}");
    let Some(separator) = lines.iter().position(|line| line.contains(SEPARATOR)) else {
        return Vec::new();
    };
    lines[..separator]
        .iter()
        .rev()
        .find(|line| !line.is_empty())
        .map(|line| {
            LABEL_GAP
                .split(line)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_day(day: &str, dish_types: &[String]) -> Vec<Dish> {
    let day: String = day.nfkc().collect();
    let mut soup = String::new();
    let mut mains = String::new();
    for line in day.lines() {
        soup.push_str(char_slice(line, SOUP_COLUMN.0, SOUP_COLUMN.1).trim());
        soup.push('\n');
        mains.push_str(char_slice(line, MAINS_COLUMN.0, MAINS_COLUMN.1).trim());
        mains.push('\n');
    }

    let mut dishes = Vec::new();
    // hyphenated words are split over lines
    let soup = soup.replace("-\n", "").trim().replace('\n', " ");
    let soup = InlineRecord::parse(&soup);
    if soup.is_dish() {
        let soup_type = dish_types.first().map_or(DEFAULT_SOUP_TYPE, String::as_str);
        dishes.push(soup.into_dish(soup_type));
    }

    let mut dish_type = dish_types.get(1).map_or("", String::as_str);
    for record in split_records(&mains) {
        // everything below the marker is an extra dish
        if record.contains(EXTRA_DISH_TYPE) {
            dish_type = EXTRA_DISH_TYPE;
            continue;
        }
        let record = InlineRecord::parse(&record.trim().replace('\n', " "));
        if record.is_dish() {
            dishes.push(record.into_dish(dish_type));
        }
    }
    dishes
}

/// Splits the main dish column at blank lines and at line breaks before a capitalized word,
/// unless the line ends with `mit`.
fn split_records(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut records = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|&&b| b == b'\n').count();
        let new_dish = bytes.get(i + 1).is_some_and(u8::is_ascii_uppercase) && !text[..i].ends_with("mit");
        if run >= 2 || new_dish {
            records.push(&text[start..i]);
            start = i + run;
        }
        i += run;
    }
    records.push(&text[start..]);
    records
}
