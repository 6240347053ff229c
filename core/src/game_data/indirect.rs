use phf::phf_set;

use super::fold_name;

/// Effects that deal damage on their own schedule, not as part of a cast.
/// Keys are folded (lowercase, no accents).
static INDIRECT_EFFECTS: phf::Set<&'static str> = phf_set! {
    "enflamme",
    "contre-attaque",
    "marque itsade",
};

pub fn is_indirect_effect(effect_name: &str) -> bool {
    let folded = fold_name(effect_name);
    !folded.is_empty() && INDIRECT_EFFECTS.contains(folded.as_str())
}

#[cfg(test)]
mod tests {
    use super::is_indirect_effect;

    #[test]
    fn test_known_indirect_effects() {
        assert!(is_indirect_effect("Enflammé"));
        assert!(is_indirect_effect("contre-attaque"));
        assert!(is_indirect_effect(" Marque Itsade "));
        assert!(!is_indirect_effect("Pulsation"));
        assert!(!is_indirect_effect(""));
    }
}
