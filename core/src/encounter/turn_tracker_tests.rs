use chrono::NaiveTime;

use super::{FighterRegistry, TurnTracker};
use crate::context::intern;
use crate::signal_processor::{BattleEvent, BattleState};

fn t0() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap()
}

fn registry_with(players: &[&str]) -> FighterRegistry {
    let mut registry = FighterRegistry::new();
    for (i, name) in players.iter().enumerate() {
        registry.get_or_create(intern(name), false, i as i64 + 1, None);
    }
    registry
}

fn states(events: &[BattleEvent]) -> Vec<BattleState> {
    events.iter().map(|e| e.state).collect()
}

#[test]
fn test_first_cast_opens_round_and_turn() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    let events = tracker.player_acted(intern("A"), &registry, t0());
    assert_eq!(
        states(&events),
        vec![
            BattleState::RoundStart { round: 1 },
            BattleState::StartTurn { player: intern("A") },
        ]
    );
    assert_eq!(tracker.current_player(), Some(intern("A")));
}

#[test]
fn test_repeated_cast_by_current_player_is_noop() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    assert!(tracker.player_acted(intern("A"), &registry, t0()).is_empty());
}

#[test]
fn test_turn_change_ends_previous_turn_first() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    let events = tracker.player_acted(intern("B"), &registry, t0());
    assert_eq!(
        states(&events),
        vec![
            BattleState::EndTurn { player: intern("A") },
            BattleState::StartTurn { player: intern("B") },
        ]
    );
}

#[test]
fn test_everyone_acted_completes_round() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    tracker.player_acted(intern("B"), &registry, t0());
    let events = tracker.player_acted(intern("C"), &registry, t0());

    assert_eq!(
        states(&events).last(),
        Some(&BattleState::RoundEnd { round: 1 })
    );
    assert_eq!(tracker.round(), 2);

    // Next actor opens round 2
    let events = tracker.player_acted(intern("A"), &registry, t0());
    assert_eq!(
        states(&events),
        vec![
            BattleState::RoundStart { round: 2 },
            BattleState::EndTurn { player: intern("C") },
            BattleState::StartTurn { player: intern("A") },
        ]
    );
}

#[test]
fn test_opener_returning_completes_round() {
    // Four registered players, only two act
    let registry = registry_with(&["A", "B", "C", "D"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    tracker.player_acted(intern("B"), &registry, t0());
    let events = tracker.player_acted(intern("A"), &registry, t0());

    assert_eq!(
        states(&events),
        vec![
            BattleState::EndTurn { player: intern("B") },
            BattleState::StartTurn { player: intern("A") },
            BattleState::RoundEnd { round: 1 },
        ]
    );
    assert_eq!(tracker.round(), 2);
}

#[test]
fn test_same_player_twice_in_a_row_completes_round() {
    let registry = registry_with(&["A", "B", "C", "D"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    tracker.player_acted(intern("B"), &registry, t0());
    tracker.turn_ended(intern("B"), t0());
    let events = tracker.player_acted(intern("B"), &registry, t0());

    assert_eq!(
        states(&events),
        vec![
            BattleState::StartTurn { player: intern("B") },
            BattleState::RoundEnd { round: 1 },
        ]
    );
}

#[test]
fn test_ko_player_is_ignored_until_revived() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    tracker.player_acted(intern("B"), &registry, t0());

    let events = tracker.mark_ko(intern("B"), t0());
    assert_eq!(states(&events), vec![BattleState::EndTurn { player: intern("B") }]);
    assert_eq!(tracker.current_player(), None);

    assert!(tracker.player_acted(intern("B"), &registry, t0()).is_empty());

    tracker.revive(intern("B"));
    assert!(!tracker.is_ko(intern("B")));
    assert!(!tracker.player_acted(intern("B"), &registry, t0()).is_empty());
}

#[test]
fn test_ko_players_do_not_count_toward_round_completion() {
    let registry = registry_with(&["A", "B", "C"]);
    let mut tracker = TurnTracker::new();

    tracker.mark_ko(intern("C"), t0());
    tracker.player_acted(intern("A"), &registry, t0());
    let events = tracker.player_acted(intern("B"), &registry, t0());

    assert_eq!(
        states(&events).last(),
        Some(&BattleState::RoundEnd { round: 1 })
    );
}

#[test]
fn test_ko_of_non_acting_player_emits_nothing() {
    let registry = registry_with(&["A", "B"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    assert!(tracker.mark_ko(intern("B"), t0()).is_empty());
    assert_eq!(tracker.current_player(), Some(intern("A")));
}

#[test]
fn test_reset_returns_to_round_one() {
    let registry = registry_with(&["A", "B"]);
    let mut tracker = TurnTracker::new();

    tracker.player_acted(intern("A"), &registry, t0());
    tracker.player_acted(intern("B"), &registry, t0());
    tracker.mark_ko(intern("A"), t0());
    assert_eq!(tracker.round(), 2);

    tracker.reset();
    assert_eq!(tracker.round(), 1);
    assert_eq!(tracker.current_player(), None);
    assert!(tracker.ko_players().is_empty());
}
