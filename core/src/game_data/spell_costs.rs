//! Action point costs per class and spell
//!
//! The cost table is external data: a JSON array whose first element maps
//! class names to `{ spell name: cost }` objects. Missing data is never an
//! error for the engine, it just leaves the cast's base cost empty.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde_json::Value;
use thiserror::Error;

use super::fold_name;

/// Lookup of a spell's base action point cost.
pub trait SpellCosts: Send {
    fn cost_for(&self, class_name: Option<&str>, spell_name: &str) -> Option<u32>;
}

/// Used when no cost table is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpellCosts;

impl SpellCosts for NoSpellCosts {
    fn cost_for(&self, _class_name: Option<&str>, _spell_name: &str) -> Option<u32> {
        None
    }
}

#[derive(Debug, Error)]
pub enum SpellCostError {
    #[error("failed to read spell cost table {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid spell cost table")]
    Json(#[from] serde_json::Error),
}

/// Spell costs keyed by folded class name, then folded spell name.
#[derive(Debug, Default, Clone)]
pub struct JsonSpellCosts {
    classes: HashMap<String, HashMap<String, u32>>,
}

impl JsonSpellCosts {
    pub fn from_path(path: &Path) -> Result<Self, SpellCostError> {
        let content = std::fs::read_to_string(path).map_err(|source| SpellCostError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SpellCostError> {
        let root: Value = serde_json::from_str(content)?;
        let mut classes = HashMap::new();

        let Some(Value::Object(by_class)) = root.as_array().and_then(|a| a.first()) else {
            return Ok(Self { classes });
        };

        for (class_name, spells) in by_class {
            let Value::Object(spells) = spells else {
                continue;
            };
            let costs = spells
                .iter()
                .filter_map(|(spell, cost)| {
                    let cost = u32::try_from(cost.as_u64()?).ok()?;
                    Some((fold_name(spell), cost))
                })
                .collect();
            classes.insert(fold_name(class_name), costs);
        }

        Ok(Self { classes })
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SpellCosts for JsonSpellCosts {
    /// Try the caster's class first, then any class that knows the spell.
    fn cost_for(&self, class_name: Option<&str>, spell_name: &str) -> Option<u32> {
        let spell = fold_name(spell_name);

        if let Some(class_name) = class_name
            && let Some(cost) = self
                .classes
                .get(&fold_name(class_name))
                .and_then(|spells| spells.get(&spell))
        {
            return Some(*cost);
        }

        self.classes
            .values()
            .find_map(|spells| spells.get(&spell).copied())
    }
}
