use phf::phf_map;

use super::fold_name;

/// Abilities the log reports under a different name than the spell that was cast.
static SPELL_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "exaltation" => "Cataclysme",
};

/// Map a known alias to its canonical spell name, otherwise return the input trimmed.
pub fn canonical_spell_name(spell_name: &str) -> &str {
    match SPELL_ALIASES.get(fold_name(spell_name).as_str()) {
        Some(canonical) => canonical,
        None => spell_name.trim(),
    }
}
