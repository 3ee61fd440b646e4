use std::fmt::Display;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use super::normalize::{normalize_tokens, IngredientScope};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IngredientFlags: u64 {
        const CertifiedQualityBavaria = 1;
        const MarineStewardshipCouncil = 1 << 1;
        const Dyestuff = 1 << 2;
        const Preservative = 1 << 3;
        const Antioxidant = 1 << 4;
        const FlavorEnhancer = 1 << 5;
        const Sulphured = 1 << 6;
        const Blackened = 1 << 7;
        const Waxed = 1 << 8;
        const Phosphate = 1 << 9;
        const Sweeteners = 1 << 10;
        const Phenylalanine = 1 << 11;
        const SugarAndSweeteners = 1 << 12;
        const CocoaGrease = 1 << 13;
        const Gelatin = 1 << 14;
        const Alcohol = 1 << 15;
        const Meatless = 1 << 16;
        const Vegan = 1 << 17;
        const Pork = 1 << 18;
        const Beef = 1 << 19;
        const Veal = 1 << 20;
        const Poultry = 1 << 21;
        const WildMeat = 1 << 22;
        const Lamb = 1 << 23;
        const Garlic = 1 << 24;
        const Egg = 1 << 25;
        const Peanut = 1 << 26;
        const Fish = 1 << 27;
        const Gluten = 1 << 28;
        const Wheat = 1 << 29;
        const Rye = 1 << 30;
        const Barley = 1 << 31;
        const Oats = 1 << 32;
        const Spelt = 1 << 33;
        const Crustaceans = 1 << 34;
        const Lupines = 1 << 35;
        const Milk = 1 << 36;
        const ShellFruits = 1 << 37;
        const Almonds = 1 << 38;
        const Hazelnuts = 1 << 39;
        const Walnuts = 1 << 40;
        const Cashews = 1 << 41;
        const Pistachios = 1 << 42;
        const Sesame = 1 << 43;
        const Mustard = 1 << 44;
        const Celery = 1 << 45;
        const Soy = 1 << 46;
        const Sulphites = 1 << 47;
        const Molluscs = 1 << 48;
    }
}

/// Canonical ingredient codes with their description.
pub static CODES: [(IngredientFlags, &str, &str); 49] = [
    (IngredientFlags::CertifiedQualityBavaria, "GQB", "Certified Quality - Bavaria"),
    (IngredientFlags::MarineStewardshipCouncil, "MSC", "Marine Stewardship Council"),
    (IngredientFlags::Dyestuff, "1", "with dyestuff"),
    (IngredientFlags::Preservative, "2", "with preservative"),
    (IngredientFlags::Antioxidant, "3", "with antioxidant"),
    (IngredientFlags::FlavorEnhancer, "4", "with flavor enhancers"),
    (IngredientFlags::Sulphured, "5", "sulphured"),
    (IngredientFlags::Blackened, "6", "blackened (olive)"),
    (IngredientFlags::Waxed, "7", "waxed"),
    (IngredientFlags::Phosphate, "8", "with phosphate"),
    (IngredientFlags::Sweeteners, "9", "with sweeteners"),
    (IngredientFlags::Phenylalanine, "10", "contains a source of phenylalanine"),
    (IngredientFlags::SugarAndSweeteners, "11", "with sugar and sweeteners"),
    (IngredientFlags::CocoaGrease, "13", "with cocoa-containing grease"),
    (IngredientFlags::Gelatin, "14", "with gelatin"),
    (IngredientFlags::Alcohol, "99", "with alcohol"),
    (IngredientFlags::Meatless, "f", "meatless dish"),
    (IngredientFlags::Vegan, "v", "vegan dish"),
    (IngredientFlags::Pork, "S", "with pork"),
    (IngredientFlags::Beef, "R", "with beef"),
    (IngredientFlags::Veal, "K", "with veal"),
    (IngredientFlags::Poultry, "G", "with poultry"),
    (IngredientFlags::WildMeat, "W", "with wild meat"),
    (IngredientFlags::Lamb, "L", "with lamb"),
    (IngredientFlags::Garlic, "Kn", "with garlic"),
    (IngredientFlags::Egg, "Ei", "with chicken egg"),
    (IngredientFlags::Peanut, "En", "with peanut"),
    (IngredientFlags::Fish, "Fi", "with fish"),
    (IngredientFlags::Gluten, "Gl", "with gluten-containing cereals"),
    (IngredientFlags::Wheat, "GlW", "with wheat"),
    (IngredientFlags::Rye, "GlR", "with rye"),
    (IngredientFlags::Barley, "GlG", "with barley"),
    (IngredientFlags::Oats, "GlH", "with oats"),
    (IngredientFlags::Spelt, "GlD", "with spelt"),
    (IngredientFlags::Crustaceans, "Kr", "with crustaceans"),
    (IngredientFlags::Lupines, "Lu", "with lupines"),
    (IngredientFlags::Milk, "Mi", "with milk and lactose"),
    (IngredientFlags::ShellFruits, "Sc", "with shell fruits"),
    (IngredientFlags::Almonds, "ScM", "with almonds"),
    (IngredientFlags::Hazelnuts, "ScH", "with hazelnuts"),
    (IngredientFlags::Walnuts, "ScW", "with walnuts"),
    (IngredientFlags::Cashews, "ScC", "with cashew nuts"),
    (IngredientFlags::Pistachios, "ScP", "with pistachios"),
    (IngredientFlags::Sesame, "Se", "with sesame seeds"),
    (IngredientFlags::Mustard, "Sf", "with mustard"),
    (IngredientFlags::Celery, "Sl", "with celery"),
    (IngredientFlags::Soy, "So", "with soy"),
    (IngredientFlags::Sulphites, "Sw", "with sulfur dioxide and sulfites"),
    (IngredientFlags::Molluscs, "Wt", "with mollusks"),
];

impl IngredientFlags {
    pub fn from_code(code: &str) -> Option<Self> {
        CODES
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(flag, _, _)| *flag)
    }

    /// The canonical codes of all set flags, sorted.
    pub fn codes(self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = CODES
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, code, _)| *code)
            .collect();
        codes.sort_unstable();
        codes
    }
}

impl Display for IngredientFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codes().join(", "))
    }
}

/// The normalized ingredient codes of one dish.
///
/// The scope decides which raw code table `parse_ingredients` reads from; it does not take part
/// in equality, so the same codes from different sources compare equal.
#[derive(Debug, Clone)]
pub struct Ingredients {
    scope: IngredientScope,
    flags: IngredientFlags,
}

impl Ingredients {
    pub const fn new(scope: IngredientScope) -> Self {
        Self {
            scope,
            flags: IngredientFlags::empty(),
        }
    }

    /// Adds the codes of a comma separated raw list. Unknown codes are logged and dropped.
    pub fn parse_ingredients(&mut self, values: &str) {
        let tokens: Vec<&str> = values.trim().split(',').collect();
        self.flags |= normalize_tokens(self.scope, &tokens);
    }

    #[must_use]
    pub fn parsed(mut self, values: &str) -> Self {
        self.parse_ingredients(values);
        self
    }

    pub const fn flags(&self) -> IngredientFlags {
        self.flags
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.flags.codes()
    }
}

impl PartialEq for Ingredients {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
    }
}

impl Eq for Ingredients {}

impl Hash for Ingredients {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.flags.hash(state);
    }
}

impl serde::Serialize for Ingredients {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.codes().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = CODES
            .iter()
            .fold(IngredientFlags::empty(), |acc, (flag, _, _)| acc | *flag);
        assert!(all.is_all());
        let mut codes: Vec<&str> = CODES.iter().map(|(_, code, _)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CODES.len());
    }

    #[test]
    fn test_parse_default_scope() {
        let ingredients =
            Ingredients::new(IngredientScope::Studentenwerk).parsed("S,Gl,GlG,GlW,Kn,Mi");
        assert_eq!(ingredients.codes(), vec!["Gl", "GlG", "GlW", "Kn", "Mi", "S"]);
    }

    #[test]
    fn test_accumulates_across_calls() {
        let mut ingredients = Ingredients::new(IngredientScope::Studentenwerk);
        ingredients.parse_ingredients("2,3");
        ingredients.parse_ingredients("Gl,Mi");
        ingredients.parse_ingredients("");
        ingredients.parse_ingredients("v");
        assert!(ingredients.flags().contains(IngredientFlags::Preservative | IngredientFlags::Vegan));
        assert_eq!(ingredients.codes().len(), 5);
    }

    #[test]
    fn test_equality_ignores_scope() {
        let a = Ingredients::new(IngredientScope::Studentenwerk).parsed("Gl,Mi");
        let b = Ingredients::new(IngredientScope::FmiBistro).parsed("Gluten,Milch");
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_sorted() {
        let ingredients = Ingredients::new(IngredientScope::Studentenwerk).parsed("Mi,99,Gl,1");
        assert_eq!(
            serde_json::to_string(&ingredients).unwrap(),
            r#"["1","99","Gl","Mi"]"#
        );
    }
}
