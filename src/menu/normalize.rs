use std::fmt::Display;

use super::ingredients::IngredientFlags;
use crate::static_regex;

/// Bounds the capital letter re-splitting of unknown tokens.
const MAX_SPLIT_DEPTH: usize = 3;

/// Selects the raw code table a source writes its ingredients in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngredientScope {
    /// Raw codes are the canonical codes.
    Studentenwerk,
    /// German allergen names.
    FmiBistro,
    /// Single letter and digit codes.
    MedizinerMensa,
}

impl IngredientScope {
    pub fn lookup(self, token: &str) -> Option<IngredientFlags> {
        match self {
            Self::Studentenwerk => IngredientFlags::from_code(token),
            Self::FmiBistro => fmi_lookup(token),
            Self::MedizinerMensa => mediziner_lookup(token),
        }
    }
}

impl Display for IngredientScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Studentenwerk => write!(f, "studentenwerk"),
            Self::FmiBistro => write!(f, "fmi-bistro"),
            Self::MedizinerMensa => write!(f, "mediziner-mensa"),
        }
    }
}

fn fmi_lookup(token: &str) -> Option<IngredientFlags> {
    let flag = match token {
        "Gluten" => IngredientFlags::Gluten,
        "Laktose" | "Milcheiweiß" | "Milch" => IngredientFlags::Milk,
        "Ei" | "Hühnerei" => IngredientFlags::Egg,
        "Soja" => IngredientFlags::Soy,
        "Nüsse" => IngredientFlags::ShellFruits,
        "Erdnuss" => IngredientFlags::Peanut,
        "Sellerie" => IngredientFlags::Celery,
        "Fisch" => IngredientFlags::Fish,
        "Krebstiere" => IngredientFlags::Crustaceans,
        "Weichtiere" => IngredientFlags::Molluscs,
        "Sesam" => IngredientFlags::Sesame,
        "Senf" => IngredientFlags::Mustard,
        _ => return None,
    };
    Some(flag)
}

fn mediziner_lookup(token: &str) -> Option<IngredientFlags> {
    let flag = match token {
        "1" => IngredientFlags::Dyestuff,
        "2" => IngredientFlags::Preservative,
        "3" => IngredientFlags::Antioxidant,
        "4" => IngredientFlags::FlavorEnhancer,
        "5" => IngredientFlags::Sulphured,
        "6" => IngredientFlags::Blackened,
        "7" => IngredientFlags::Waxed,
        "8" => IngredientFlags::Phosphate,
        "9" => IngredientFlags::Sweeteners,
        "A" => IngredientFlags::Alcohol,
        "B" => IngredientFlags::Gluten,
        "C" => IngredientFlags::Crustaceans,
        "E" | "F" => IngredientFlags::Fish,
        "G" => IngredientFlags::Poultry,
        "H" => IngredientFlags::Peanut,
        "K" => IngredientFlags::Veal,
        "L" => IngredientFlags::Lamb,
        "M" => IngredientFlags::Soy,
        "N" => IngredientFlags::Milk,
        "O" => IngredientFlags::ShellFruits,
        "P" => IngredientFlags::Celery,
        "R" => IngredientFlags::Beef,
        "S" => IngredientFlags::Pork,
        "T" => IngredientFlags::Mustard,
        "U" => IngredientFlags::Sesame,
        "V" => IngredientFlags::Sulphites,
        "W" => IngredientFlags::WildMeat,
        "X" => IngredientFlags::Lupines,
        "Y" => IngredientFlags::Egg,
        "Z" => IngredientFlags::Molluscs,
        _ => return None,
    };
    Some(flag)
}

/// Maps raw tokens onto canonical flags. Blank tokens are ignored.
///
/// Sources sometimes drop the comma between codes (`GlMi`), so a token missing from the table
/// is split before every capital letter and the pieces are looked up again. Whatever is still
/// unknown after that is logged and dropped.
pub fn normalize_tokens(scope: IngredientScope, tokens: &[&str]) -> IngredientFlags {
    let mut flags = IngredientFlags::empty();
    for token in tokens {
        flags |= normalize_token(scope, token.trim(), 0);
    }
    flags
}

fn normalize_token(scope: IngredientScope, token: &str, depth: usize) -> IngredientFlags {
    static_regex!(CAPITALIZED_RUN <- r"[a-züöäA-ZÜÖÄ][^A-ZÜÖÄ]*");
    if token.is_empty() {
        return IngredientFlags::empty();
    }
    if let Some(flag) = scope.lookup(token) {
        return flag;
    }
    let pieces: Vec<&str> = CAPITALIZED_RUN
        .find_iter(token)
        .map(|m| m.as_str().trim())
        .filter(|piece| !piece.is_empty())
        .collect();
    if depth < MAX_SPLIT_DEPTH && !pieces.is_empty() && pieces != [token] {
        return pieces
            .into_iter()
            .fold(IngredientFlags::empty(), |acc, piece| {
                acc | normalize_token(scope, piece, depth + 1)
            });
    }
    log::warn!("Unknown ingredient for {scope} found: {token}");
    IngredientFlags::empty()
}
