use hashbrown::{HashMap, HashSet};

use crate::context::IStr;
use crate::game_data::PlayerClass;

use super::fighter::Fighter;

/// Fighters seen in the current combat, keyed by display name.
#[derive(Debug, Default)]
pub struct FighterRegistry {
    fighters: HashMap<IStr, Fighter>,
}

impl FighterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fighter from a join line. The first registration wins.
    pub fn get_or_create(
        &mut self,
        name: IStr,
        is_ai_controlled: bool,
        id: i64,
        class: Option<PlayerClass>,
    ) -> Fighter {
        *self.fighters.entry(name).or_insert_with(|| {
            if is_ai_controlled {
                Fighter::enemy(name, Some(id))
            } else {
                Fighter::player(name, Some(id), class)
            }
        })
    }

    /// Damage targets seen without a join line are assumed to be enemies.
    pub fn get_or_create_enemy(&mut self, name: IStr) -> Fighter {
        *self
            .fighters
            .entry(name)
            .or_insert_with(|| Fighter::enemy(name, None))
    }

    /// The sentinel Indirect fighter, registered on first use.
    pub fn indirect(&mut self) -> Fighter {
        let indirect = Fighter::indirect();
        *self.fighters.entry(indirect.name).or_insert(indirect)
    }

    pub fn get(&self, name: IStr) -> Option<Fighter> {
        self.fighters.get(&name).copied()
    }

    pub fn clear(&mut self) {
        self.fighters.clear();
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    /// Real players (not synthetic) that are not in `excluding`.
    pub fn count_active_players(&self, excluding: &HashSet<IStr>) -> usize {
        self.fighters
            .values()
            .filter(|f| f.is_player() && !f.is_synthetic())
            .filter(|f| !excluding.contains(&f.name))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;
    use crate::encounter::FighterKind;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = FighterRegistry::new();
        let name = intern("Portailier");

        let first = registry.get_or_create(name, false, 10482754, PlayerClass::from_breed(18));
        let second = registry.get_or_create(name, true, 1, None);

        assert_eq!(first, second);
        assert_eq!(second.kind, FighterKind::Player);
        assert_eq!(second.id, Some(10482754));
        assert_eq!(second.class, Some(PlayerClass::Eliotrope));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_enemy_fallback_does_not_override_join() {
        let mut registry = FighterRegistry::new();
        let name = intern("Hurdy Gurdy");
        registry.get_or_create(name, false, 42, None);

        let fighter = registry.get_or_create_enemy(name);
        assert!(fighter.is_player());

        let sac = registry.get_or_create_enemy(intern("Sac à patates"));
        assert_eq!(sac.kind, FighterKind::Enemy);
        assert_eq!(sac.id, None);
    }

    #[test]
    fn test_count_active_players_skips_ko_enemies_and_sentinel() {
        let mut registry = FighterRegistry::new();
        registry.get_or_create(intern("A"), false, 1, None);
        registry.get_or_create(intern("B"), false, 2, None);
        registry.get_or_create(intern("C"), false, 3, None);
        registry.get_or_create(intern("Mob"), true, -5, None);
        registry.indirect();

        let mut ko = HashSet::new();
        assert_eq!(registry.count_active_players(&ko), 3);

        ko.insert(intern("B"));
        assert_eq!(registry.count_active_players(&ko), 2);
    }

    #[test]
    fn test_clear_and_missing_lookup() {
        let mut registry = FighterRegistry::new();
        registry.get_or_create(intern("A"), false, 1, None);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.get(intern("A")), None);
    }
}
