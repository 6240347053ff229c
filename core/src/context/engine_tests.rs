use std::time::Duration;

use chrono::NaiveTime;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::sleep;

use super::CombatLogEngine;
use crate::context::resolve;
use crate::game_data::NoSpellCosts;
use crate::signal_processor::{BattleState, LogEvent};
use wakmeter_types::EngineConfig;

fn engine() -> (CombatLogEngine, UnboundedReceiver<LogEvent>) {
    let engine = CombatLogEngine::new(&EngineConfig::default(), Box::new(NoSpellCosts));
    let (tx, rx) = mpsc::unbounded_channel();
    engine.add_handler(tx);
    (engine, rx)
}

fn drain(rx: &mut UnboundedReceiver<LogEvent>) -> Vec<LogEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn combat_count(events: &[LogEvent]) -> usize {
    events.iter().filter(|e| e.as_combat().is_some()).count()
}

fn feed(engine: &CombatLogEngine, lines: &[&str]) {
    let fallback = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    for line in lines {
        engine.feed_line_at(line, fallback);
    }
}

const START: &str = "INFO 00:49:15,273 [AWT-EventQueue-0] (aWl:47) - CREATION DU COMBAT";
const JOIN: &str = "INFO 00:49:15,277 [AWT-EventQueue-0] (eRL:1407) - [_FL_] fightId=1552013926 Portailier breed : 18 [10482754] isControlledByAI=false obstacleId : -1 join the fight";
const CAST: &str = "INFO 00:49:25,064 [AWT-EventQueue-0] (aOC:174) - [Information (combat)] Portailier lance le sort Pulsation";
const HIT: &str = "INFO 00:49:25,114 [AWT-EventQueue-0] (aOC:174) - [Information (combat)] Sac à patates: -5726 PV (Eau)";
const HIT_AGAIN: &str = "INFO 00:49:25,300 [AWT-EventQueue-0] (aOC:174) - [Information (combat)] Sac à patates: -100 PV (Eau)";
const RECAST: &str = "INFO 00:49:25,500 [AWT-EventQueue-0] (aOC:174) - [Information (combat)] Portailier lance le sort Fulgur";
const END: &str = "INFO 00:49:26,000 [AWT-EventQueue-0] (aVi:92) - [FIGHT] End fight with id 1552013926";

#[tokio::test(start_paused = true)]
async fn test_debounce_timer_flushes_after_quiet_period() {
    let (engine, mut rx) = engine();
    feed(&engine, &[START, JOIN, CAST, HIT]);

    let events = drain(&mut rx);
    assert_eq!(events[0].as_battle().unwrap().state, BattleState::Start);
    assert_eq!(combat_count(&events), 0);

    sleep(Duration::from_millis(3100)).await;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    let combat = events[0].as_combat().unwrap();
    assert_eq!(resolve(combat.caster.name), "Portailier");
    assert_eq!(resolve(combat.target.name), "Sac à patates");
    assert_eq!(combat.value, 5726);
    assert!(!engine.has_open_cast());
}

#[tokio::test(start_paused = true)]
async fn test_related_line_resets_the_timer() {
    let (engine, mut rx) = engine();
    feed(&engine, &[START, JOIN, CAST, HIT]);
    drain(&mut rx);

    sleep(Duration::from_millis(2000)).await;
    feed(&engine, &[HIT_AGAIN]);

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(combat_count(&drain(&mut rx)), 0, "deadline moved forward");

    sleep(Duration::from_millis(1100)).await;
    assert_eq!(combat_count(&drain(&mut rx)), 2);
}

#[tokio::test(start_paused = true)]
async fn test_new_cast_at_deadline_flushes_once() {
    let (engine, mut rx) = engine();
    feed(&engine, &[START, JOIN, CAST, HIT]);
    drain(&mut rx);

    sleep(Duration::from_millis(2999)).await;
    feed(&engine, &[RECAST]);
    sleep(Duration::from_millis(10)).await;

    let events = drain(&mut rx);
    assert_eq!(combat_count(&events), 1);
    assert!(engine.has_open_cast(), "new cast still open");

    // The stale timer for the first cast never fires a second flush
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(combat_count(&drain(&mut rx)), 0);
}

#[tokio::test(start_paused = true)]
async fn test_end_after_timer_flush_does_not_repeat_events() {
    let (engine, mut rx) = engine();
    feed(&engine, &[START, JOIN, CAST, HIT]);
    sleep(Duration::from_millis(3100)).await;
    feed(&engine, &[END]);

    let events = drain(&mut rx);
    assert_eq!(combat_count(&events), 1);
    assert_eq!(
        events.last().and_then(LogEvent::as_battle).map(|b| b.state),
        Some(BattleState::End)
    );
}

#[test]
fn test_without_runtime_flush_is_explicit() {
    let (engine, mut rx) = engine();
    feed(&engine, &[START, JOIN, CAST, HIT]);
    assert!(engine.has_open_cast());
    assert!(engine.in_combat());

    engine.flush();
    assert_eq!(combat_count(&drain(&mut rx)), 1);
    assert!(!engine.has_open_cast());
}
