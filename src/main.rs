#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod error;
mod export;
mod fetch;
mod menu;
mod parse;

use std::time::Instant;

use futures::future::join_all;

use crate::{
    config::Config,
    export::JsonStore,
    fetch::{HttpFetcher, Pdftotext},
    parse::{Location, MenuParser},
};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Parses one location and writes its menus. Returns the number of days written.
async fn run_location(
    location: Location,
    fetcher: &HttpFetcher,
    pdf: &Pdftotext,
    store: &JsonStore,
    combine: bool,
) -> Result<usize> {
    let start = Instant::now();
    let mut menus = location.parser().parse(fetcher, pdf, location).await?;
    for menu in menus.values_mut() {
        menu.remove_duplicates();
    }
    store.save_weeks(location, &menus).await?;
    if combine {
        store.save_combined(location, &menus).await?;
    }
    log::info!("Parsed {location} in {:?}", start.elapsed());
    Ok(menus.len())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    if std::env::args().nth(1).as_deref() == Some("locations") {
        let aliases: Vec<&str> = Location::all().iter().map(Location::alias).collect();
        println!("{}", serde_json::to_string_pretty(&aliases)?);
        return Ok(());
    }

    let config = Config::from_env()?;
    let fetcher = HttpFetcher::new(config.rate_limit)?;
    let pdf = Pdftotext::new(&config.pdftotext);
    let store = JsonStore::open(&config.out_dir);

    let results = join_all(
        config
            .locations
            .iter()
            .map(|&location| run_location(location, &fetcher, &pdf, &store, config.combine)),
    )
    .await;

    let mut failed = 0;
    for (location, result) in config.locations.iter().zip(results) {
        match result {
            Ok(0) => log::warn!("No menus found for {location}"),
            Ok(days) => log::debug!("{days} days of {location} written"),
            Err(e) => {
                failed += 1;
                log::error!("Error while parsing {location}: {e}");
            }
        }
    }
    log::info!(
        "Wrote menus of {} locations to {}",
        config.locations.len() - failed,
        store.root().display()
    );
    Ok(())
}
