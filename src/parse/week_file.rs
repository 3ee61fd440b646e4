use chrono::{NaiveDate, Weekday};

use super::Error;
use crate::static_regex;

/// The ISO week a weekly menu document covers, as read from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOfYear {
    pub week: u32,
    pub year: i32,
}

impl WeekOfYear {
    pub const fn new(week: u32, year: i32) -> Self {
        Self { week, year }
    }

    pub fn date(self, weekday: Weekday) -> Result<NaiveDate, Error> {
        get_date(self.year, self.week, weekday)
    }

    /// `Garching-Speiseplan_KW46_2017.pdf`. A missing year, or one with digits glued to the
    /// current year (`20181`), becomes `current_year`.
    pub fn from_fmi_file_name(name: &str, current_year: i32) -> Result<Self, Error> {
        static_regex!(FMI_WEEK <- r"(?i)KW[^a-zA-Z1-9]*([1-9]+\d*)[^a-zA-Z1-9]*([1-9]+\d{3})?");
        let captures = FMI_WEEK
            .captures(name)
            .ok_or_else(|| Error::text_parse_error(&format!("no week in file name {name}")))?;
        let week = parse_number(&captures[1], name)?;
        let current = current_year.to_string();
        let year = match captures.get(2).map(|m| m.as_str()) {
            Some(year) if year == current || !year.contains(&current) => parse_number(year, name)?,
            _ => current_year,
        };
        Ok(Self::new(week, year))
    }

    /// `KW-48_27.11-01.12.10.2017-3.pdf`
    pub fn from_ipp_file_name(name: &str) -> Result<Self, Error> {
        static_regex!(IPP_WEEK <- r"(?i)KW[^a-zA-Z1-9]*([1-9]+\d*).*\d+\.\d+\.(\d+).*");
        Self::from_captures(&IPP_WEEK, name)
    }

    /// `KW_44_Herbst_4_Mensa_2018.pdf` or `KW_50_Winter_1_Mensa_-2018.pdf`
    pub fn from_mediziner_file_name(name: &str) -> Result<Self, Error> {
        static_regex!(MEDIZINER_WEEK <- r"(?i)KW_([1-9]+\d*)_.*_-?(\d+).*");
        Self::from_captures(&MEDIZINER_WEEK, name)
    }

    fn from_captures(regex: &regex::Regex, name: &str) -> Result<Self, Error> {
        let captures = regex
            .captures(name)
            .ok_or_else(|| Error::text_parse_error(&format!("no week and year in file name {name}")))?;
        let week = parse_number(&captures[1], name)?;
        let year: i32 = parse_number(&captures[2], name)?;
        // two digit years
        let year = if year < 100 { year + 2000 } else { year };
        Ok(Self::new(week, year))
    }
}

/// The date of `weekday` in ISO week `week` of the ISO week-numbering year `year`.
pub fn get_date(year: i32, week: u32, weekday: Weekday) -> Result<NaiveDate, Error> {
    NaiveDate::from_isoywd_opt(year, week, weekday)
        .ok_or_else(|| Error::date_error(format!("{weekday} of week {week} in {year} does not exist")))
}

fn parse_number<T: std::str::FromStr>(digits: &str, name: &str) -> Result<T, Error> {
    digits
        .parse()
        .map_err(|_| Error::text_parse_error(&format!("{digits} in {name} is not a number")))
}
