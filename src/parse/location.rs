use std::fmt::Display;
use std::str::FromStr;

use crate::menu::IngredientScope;
use crate::parse::{
    Error, FmiBistroParser, IppBistroParser, MedizinerMensaParser, Parser, StudentenwerkParser,
};

/// Studentenwerk canteens with the id of their menu page. Some have a second alias kept for
/// backwards compatibility.
const STUDENTENWERK: [(&str, u16); 20] = [
    ("mensa-arcisstr", 421),
    ("mensa-arcisstrasse", 421),
    ("mensa-garching", 422),
    ("mensa-leopoldstr", 411),
    ("mensa-lothstr", 431),
    ("mensa-martinsried", 412),
    ("mensa-pasing", 432),
    ("mensa-weihenstephan", 423),
    ("stubistro-arcisstr", 450),
    ("stubistro-goethestr", 418),
    ("stubistro-großhadern", 414),
    ("stubistro-grosshadern", 414),
    ("stubistro-rosenheim", 441),
    ("stubistro-schellingstr", 416),
    ("stucafe-adalbertstr", 512),
    ("stucafe-akademie-weihenstephan", 526),
    ("stucafe-boltzmannstr", 527),
    ("stucafe-garching", 524),
    ("stucafe-karlstr", 532),
    ("stucafe-pasing", 534),
];

const FMI_BISTRO: &str = "fmi-bistro";
const IPP_BISTRO: &str = "ipp-bistro";
const MEDIZINER_MENSA: &str = "mediziner-mensa";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Studentenwerk { alias: &'static str, id: u16 },
    FmiBistro,
    IppBistro,
    MedizinerMensa,
}

impl Location {
    /// Every alias, in the order they are listed to users.
    pub fn all() -> Vec<Self> {
        let mut seen = Vec::with_capacity(STUDENTENWERK.len() + 3);
        for (alias, id) in STUDENTENWERK {
            let location = Self::Studentenwerk { alias, id };
            if !seen.contains(&location) {
                seen.push(location);
            }
        }
        seen.extend([Self::FmiBistro, Self::IppBistro, Self::MedizinerMensa]);
        seen
    }

    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Studentenwerk { alias, .. } => alias,
            Self::FmiBistro => FMI_BISTRO,
            Self::IppBistro => IPP_BISTRO,
            Self::MedizinerMensa => MEDIZINER_MENSA,
        }
    }

    pub const fn ingredient_scope(&self) -> IngredientScope {
        match self {
            Self::FmiBistro => IngredientScope::FmiBistro,
            Self::MedizinerMensa => IngredientScope::MedizinerMensa,
            // all ipp dishes share one list written in Studentenwerk codes
            Self::Studentenwerk { .. } | Self::IppBistro => IngredientScope::Studentenwerk,
        }
    }

    pub const fn parser(&self) -> Parser {
        match self {
            Self::Studentenwerk { .. } => Parser::Studentenwerk(StudentenwerkParser),
            Self::FmiBistro => Parser::FmiBistro(FmiBistroParser),
            Self::IppBistro => Parser::IppBistro(IppBistroParser),
            Self::MedizinerMensa => Parser::MedizinerMensa(MedizinerMensaParser),
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Accepts an alias or, for Studentenwerk canteens, the numeric page id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            FMI_BISTRO => return Ok(Self::FmiBistro),
            IPP_BISTRO => return Ok(Self::IppBistro),
            MEDIZINER_MENSA => return Ok(Self::MedizinerMensa),
            _ => {}
        }
        let id = s.parse::<u16>().ok();
        STUDENTENWERK
            .iter()
            .find(|(alias, known_id)| *alias == s || Some(*known_id) == id)
            .map(|&(alias, id)| Self::Studentenwerk { alias, id })
            .ok_or_else(|| {
                let aliases: Vec<&str> = Self::all().iter().map(Self::alias).collect();
                Error::UnknownLocation(format!("{s}. Choose one of {}.", aliases.join(", ")))
            })
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.alias())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alias_and_id() {
        assert_eq!(
            "mensa-garching".parse::<Location>().unwrap(),
            Location::Studentenwerk {
                alias: "mensa-garching",
                id: 422
            }
        );
        assert_eq!(
            "421".parse::<Location>().unwrap(),
            Location::Studentenwerk {
                alias: "mensa-arcisstr",
                id: 421
            }
        );
        assert_eq!(
            "ipp-bistro".parse::<Location>().unwrap(),
            Location::IppBistro
        );
    }

    #[test]
    fn test_unknown_location() {
        let err = "mensa-mond".parse::<Location>().unwrap_err();
        assert!(matches!(err, Error::UnknownLocation(ref msg) if msg.contains("fmi-bistro")));
        assert!("9999".parse::<Location>().is_err());
    }

    #[test]
    fn test_all_lists_each_alias_once() {
        let all = Location::all();
        assert_eq!(all.len(), 23);
        assert!(all.contains(&Location::MedizinerMensa));
        assert!(all.iter().all(|l| l.alias().parse::<Location>().unwrap() == *l));
    }

    #[test]
    fn test_parser_selection() {
        assert_eq!(
            "stucafe-karlstr".parse::<Location>().unwrap().parser(),
            Parser::Studentenwerk(StudentenwerkParser)
        );
        assert_eq!(
            Location::MedizinerMensa.parser(),
            Parser::MedizinerMensa(MedizinerMensaParser)
        );
        assert_eq!(Location::IppBistro.ingredient_scope(), IngredientScope::Studentenwerk);
    }
}
