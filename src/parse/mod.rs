mod collapse_whitespace;
mod columns;
mod error;
mod fmi_bistro;
mod inline_record;
mod ipp_bistro;
mod location;
mod mediziner_mensa;
mod price_resolver;
pub(crate) mod static_pattern;
mod studentenwerk;
mod text_from_selection;
mod week_file;

use scraper::{Html, Selector};
use url::Url;

use crate::fetch::{file_name, Fetcher, PdfText};
use crate::menu::Menus;

pub use error::Error;
pub use fmi_bistro::FmiBistroParser;
pub use ipp_bistro::IppBistroParser;
pub use location::Location;
pub use mediziner_mensa::MedizinerMensaParser;
pub use studentenwerk::StudentenwerkParser;
pub use week_file::WeekOfYear;

/// Collects the menus a location publishes, keyed by the day they are served.
#[allow(async_fn_in_trait)]
pub trait MenuParser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        pdf: &P,
        location: Location,
    ) -> crate::Result<Menus>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    Studentenwerk(StudentenwerkParser),
    FmiBistro(FmiBistroParser),
    IppBistro(IppBistroParser),
    MedizinerMensa(MedizinerMensaParser),
}

impl MenuParser for Parser {
    async fn parse<F: Fetcher, P: PdfText>(
        &self,
        fetcher: &F,
        pdf: &P,
        location: Location,
    ) -> crate::Result<Menus> {
        match self {
            Self::Studentenwerk(parser) => parser.parse(fetcher, pdf, location).await,
            Self::FmiBistro(parser) => parser.parse(fetcher, pdf, location).await,
            Self::IppBistro(parser) => parser.parse(fetcher, pdf, location).await,
            Self::MedizinerMensa(parser) => parser.parse(fetcher, pdf, location).await,
        }
    }
}

/// The `attr` urls of all elements on `page` matching `selector`, resolved against `base`.
fn links(page: &str, base: &Url, selector: &Selector, attr: &str) -> Vec<Url> {
    let document = Html::parse_document(page);
    document
        .select(selector)
        .filter_map(|element| element.attr(attr))
        .filter_map(|href| match base.join(href) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Ignoring invalid link {href}: {e}");
                None
            }
        })
        .collect()
}

/// Parses every weekly PDF in order. A document that fails to load or parse is logged and
/// skipped; a later document replaces the menus of an earlier one for the same day.
async fn weekly_documents<F, P, G>(
    fetcher: &F,
    pdf: &P,
    urls: &[Url],
    first_page_only: bool,
    get_menus: G,
) -> Menus
where
    F: Fetcher,
    P: PdfText,
    G: Fn(&str, &str) -> Result<Menus, Error>,
{
    let mut menus = Menus::new();
    for url in urls {
        let parsed = async {
            let bytes = fetcher.fetch_bytes(url).await?;
            let text = pdf.page_text(&bytes, first_page_only).await?;
            Ok::<_, crate::Error>(get_menus(file_name(url), &text)?)
        };
        match parsed.await {
            Ok(parsed) => {
                log::debug!("Parsed {} menus from {url}", parsed.len());
                menus.extend(parsed);
            }
            Err(e) => log::warn!("Skipping menu document {url}: {e}"),
        }
    }
    menus
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fetch::stub::{PlainText, StubFetcher};
    use crate::menu::Menu;
    use crate::static_selector;

    #[test]
    fn test_links_are_resolved() {
        static_selector!(PDF_LINK <- "a[href*='Mensaplan/KW_']");
        let base = Url::parse("https://www.sv.tum.de/med/startseite/").unwrap();
        let page = r#"<a href="/fileadmin/Mensaplan/KW_44_Herbst_4_Mensa_2018.pdf">Plan</a>
            <a href="/impressum/">Impressum</a>"#;
        let urls = links(page, &base, &PDF_LINK, "href");
        assert_eq!(
            urls,
            vec![Url::parse("https://www.sv.tum.de/fileadmin/Mensaplan/KW_44_Herbst_4_Mensa_2018.pdf").unwrap()]
        );
    }

    #[tokio::test]
    async fn test_later_documents_win_and_failures_are_skipped() {
        let fetcher = StubFetcher::default()
            .with_page("http://bistro.example/KW_1.pdf", "1 2")
            .with_page("http://bistro.example/KW_2.pdf", "2 3")
            .with_page("http://bistro.example/broken.pdf", "x");
        let urls: Vec<Url> = ["KW_1.pdf", "missing.pdf", "broken.pdf", "KW_2.pdf"]
            .iter()
            .map(|name| Url::parse(&format!("http://bistro.example/{name}")).unwrap())
            .collect();
        let day = |d: u32| NaiveDate::from_ymd_opt(2018, 11, d).unwrap();
        let menus = weekly_documents(&fetcher, &PlainText, &urls, true, |name, text| {
            let days: Vec<u32> = text
                .split_whitespace()
                .map(|d| d.parse().map_err(|_| Error::text_parse_error("not a day")))
                .collect::<Result<_, _>>()?;
            Ok(days
                .into_iter()
                .map(|d| {
                    let date = day(d);
                    let dish = crate::menu::Dish::new(
                        name,
                        crate::menu::Prices::default(),
                        crate::menu::Ingredients::new(crate::menu::IngredientScope::Studentenwerk),
                        "",
                    );
                    (date, Menu::new(date, vec![dish]))
                })
                .collect())
        })
        .await;
        let sources: Vec<(u32, &str)> = menus
            .values()
            .map(|menu| (chrono::Datelike::day(&menu.date()), menu.dishes()[0].name()))
            .collect();
        assert_eq!(sources, vec![(1, "KW_1.pdf"), (2, "KW_2.pdf"), (3, "KW_2.pdf")]);
    }
}
