//! Drops damage facts that would inflate player statistics.

use crate::signal_processor::EventKind;

use super::fighter::Fighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SelfDamage,
    FriendlyFire,
}

/// Classify a fact; `None` means it may be emitted.
/// Only damage is filtered: heals and shields on allies are expected.
pub fn check(caster: &Fighter, target: &Fighter, kind: EventKind) -> Option<Rejection> {
    if kind != EventKind::Damage || !caster.is_player() || !target.is_player() {
        return None;
    }
    if caster.name == target.name {
        Some(Rejection::SelfDamage)
    } else {
        Some(Rejection::FriendlyFire)
    }
}

/// `true` when the fact must be dropped. Rejections are logged at debug level.
pub fn should_reject(caster: &Fighter, target: &Fighter, kind: EventKind, value: u64) -> bool {
    let Some(reason) = check(caster, target, kind) else {
        return false;
    };
    tracing::debug!(
        caster = caster.display_name(),
        target = target.display_name(),
        value,
        ?reason,
        "Dropping damage"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;

    fn player(name: &str) -> Fighter {
        Fighter::player(intern(name), Some(7), None)
    }

    fn enemy(name: &str) -> Fighter {
        Fighter::enemy(intern(name), Some(-7))
    }

    #[test]
    fn test_self_damage_rejected() {
        let a = player("Portailier");
        assert_eq!(check(&a, &a, EventKind::Damage), Some(Rejection::SelfDamage));
        assert!(should_reject(&a, &a, EventKind::Damage, 100));
    }

    #[test]
    fn test_friendly_fire_rejected() {
        assert_eq!(
            check(&player("A"), &player("B"), EventKind::Damage),
            Some(Rejection::FriendlyFire)
        );
    }

    #[test]
    fn test_player_on_enemy_and_enemy_facts_pass() {
        assert_eq!(check(&player("A"), &enemy("Mob"), EventKind::Damage), None);
        assert_eq!(check(&enemy("Mob"), &player("A"), EventKind::Damage), None);
        assert_eq!(check(&enemy("Mob"), &enemy("Mob"), EventKind::Damage), None);
    }

    #[test]
    fn test_heals_and_shields_on_players_pass() {
        assert_eq!(check(&player("A"), &player("B"), EventKind::Heal), None);
        assert_eq!(check(&player("A"), &player("A"), EventKind::Shield), None);
    }
}
