//! Static game knowledge: elements, classes, special ability tables and
//! spell costs.

mod aliases;
mod element;
mod indirect;
mod player_class;
mod spell_costs;

pub use aliases::canonical_spell_name;
pub use element::Element;
pub use indirect::is_indirect_effect;
pub use player_class::PlayerClass;
pub use spell_costs::{JsonSpellCosts, NoSpellCosts, SpellCostError, SpellCosts};

/// Lowercase and strip the accents that show up in French spell/class names.
pub(crate) fn fold_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' | 'ä' => 'a',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'û' | 'ù' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::fold_name;

    #[test]
    fn test_fold_name_strips_accents_and_case() {
        assert_eq!(fold_name("  Écaflip "), "ecaflip");
        assert_eq!(fold_name("Lumière"), "lumiere");
        assert_eq!(fold_name("Xélor"), "xelor");
    }
}
