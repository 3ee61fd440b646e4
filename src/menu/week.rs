use std::collections::BTreeMap;

use chrono::{Datelike, IsoWeek};

use super::{daily_menu::Menu, Menus};

/// The menus of one ISO calendar week.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Week<'a> {
    #[serde(rename = "number")]
    calendar_week: u32,
    /// ISO week-numbering year, e.g. 2020 for 2021-01-01.
    year: i32,
    days: Vec<&'a Menu>,
}

impl<'a> Week<'a> {
    pub const fn new(calendar_week: u32, year: i32) -> Self {
        Self {
            calendar_week,
            year,
            days: Vec::new(),
        }
    }

    pub const fn calendar_week(&self) -> u32 {
        self.calendar_week
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Groups menus by the ISO week their date falls in.
    pub fn to_weeks(menus: &'a Menus) -> BTreeMap<IsoWeek, Self> {
        let mut weeks: BTreeMap<IsoWeek, Self> = BTreeMap::new();
        for menu in menus.values() {
            let iso_week = menu.date().iso_week();
            weeks
                .entry(iso_week)
                .or_insert_with(|| Self::new(iso_week.week(), iso_week.year()))
                .days
                .push(menu);
        }
        weeks
    }
}

#[cfg(test)]
impl<'a> Week<'a> {
    pub fn days(&self) -> &[&'a Menu] {
        &self.days
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn menus(dates: &[(i32, u32, u32)]) -> Menus {
        dates
            .iter()
            .map(|&(y, m, d)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                (date, Menu::new(date, vec![]))
            })
            .collect()
    }

    #[test]
    fn test_january_dates_use_iso_year() {
        let menus = menus(&[(2020, 12, 31), (2021, 1, 1), (2021, 1, 4)]);
        let weeks = Week::to_weeks(&menus);
        let summary: Vec<(u32, i32, usize)> = weeks
            .values()
            .map(|w| (w.calendar_week(), w.year(), w.days().len()))
            .collect();
        assert_eq!(summary, vec![(53, 2020, 2), (1, 2021, 1)]);
    }

    #[test]
    fn test_week_numbers_from_different_years_stay_apart() {
        let menus = menus(&[(2017, 11, 6), (2018, 11, 5), (2017, 11, 10)]);
        let weeks = Week::to_weeks(&menus);
        assert_eq!(weeks.len(), 2);
        assert!(weeks.values().all(|w| w.calendar_week() == 45));
    }

    #[test]
    fn test_serialize() {
        let menus = menus(&[(2017, 11, 6)]);
        let weeks = Week::to_weeks(&menus);
        let week = weeks.values().next().unwrap();
        assert_eq!(
            serde_json::to_value(week).unwrap(),
            json!({"number": 45, "year": 2017, "days": [{"date": "2017-11-06", "dishes": []}]})
        );
    }
}
