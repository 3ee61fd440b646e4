use std::{env, num::NonZeroU32, path::PathBuf};

use crate::parse::Location;
use crate::Error;

const DEFAULT_OUT_DIR: &str = "dist";
const DEFAULT_PDFTOTEXT: &str = "pdftotext";
const DEFAULT_RATE_LIMIT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// Settings of one run, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub locations: Vec<Location>,
    pub out_dir: PathBuf,
    pub combine: bool,
    pub pdftotext: PathBuf,
    pub rate_limit: NonZeroU32,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let locations = match lookup("LOCATIONS") {
            Some(aliases) => aliases
                .split(',')
                .filter(|alias| !alias.trim().is_empty())
                .map(str::parse::<Location>)
                .collect::<Result<Vec<Location>, _>>()?,
            None => {
                log::info!("env var LOCATIONS not set, parsing every location.");
                Location::all()
            }
        };
        if locations.is_empty() {
            return Err(Error::config_error("LOCATIONS names no location"));
        }

        let out_dir = lookup("OUT_DIR").map_or_else(
            || {
                log::info!("env var OUT_DIR not set, writing to {DEFAULT_OUT_DIR}.");
                PathBuf::from(DEFAULT_OUT_DIR)
            },
            PathBuf::from,
        );

        let combine = match lookup("COMBINE").as_deref().map(str::trim) {
            None | Some("" | "0" | "false") => false,
            Some("1" | "true") => true,
            Some(other) => {
                return Err(Error::config_error(format!(
                    "COMBINE must be 1, true, 0 or false, not {other:?}"
                )))
            }
        };

        let pdftotext = lookup("PDFTOTEXT").map_or_else(|| PathBuf::from(DEFAULT_PDFTOTEXT), PathBuf::from);

        let rate_limit = match lookup("RATE_LIMIT") {
            Some(limit) => limit.trim().parse().map_err(|_| {
                Error::config_error(format!("RATE_LIMIT must be a positive number, not {limit:?}"))
            })?,
            None => DEFAULT_RATE_LIMIT,
        };

        Ok(Self {
            locations,
            out_dir,
            combine,
            pdftotext,
            rate_limit,
        })
    }
}
