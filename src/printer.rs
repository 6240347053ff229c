use std::io::Write;

use wakmeter_core::{
    BattleEvent, BattleState, BonusDamageEvent, CombatEvent, EventHandler, LogEvent, resolve,
};

/// Prints one line per event to stdout.
#[derive(Debug, Default)]
pub struct StdoutPrinter;

impl EventHandler for StdoutPrinter {
    fn handle_event(&mut self, event: &LogEvent) {
        let line = match event {
            LogEvent::Battle(e) => format_battle(e),
            LogEvent::Combat(e) => format_combat(e),
            LogEvent::BonusDamage(e) => format_bonus(e),
        };
        // stdout may be closed when piped into `head`
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}

fn format_battle(event: &BattleEvent) -> String {
    let label = match event.state {
        BattleState::Start => "COMBAT START",
        BattleState::End => "COMBAT END",
        BattleState::RoundStart { .. } => "ROUND START",
        BattleState::RoundEnd { .. } => "ROUND END",
        BattleState::StartTurn { .. } => "TURN START",
        BattleState::EndTurn { .. } => "TURN END",
    };
    match (event.round(), event.player_name()) {
        (Some(round), _) => format!("{} {label} {round}", event.timestamp),
        (None, Some(player)) => format!("{} {label} {player}", event.timestamp),
        (None, None) => format!("{} {label}", event.timestamp),
    }
}

fn format_combat(event: &CombatEvent) -> String {
    let cost = match event.base_cost {
        Some(cost) => format!(" [{cost} PA, {} refunded]", event.refunded_cost),
        None if event.refunded_cost > 0 => format!(" [{} PA refunded]", event.refunded_cost),
        None => String::new(),
    };
    format!(
        "{} {} {} -> {} {:?} {} {} ({}){cost}",
        event.timestamp,
        event.cast_id,
        event.caster.display_name(),
        event.target.display_name(),
        event.kind,
        resolve(event.ability.name),
        event.value,
        event.element,
    )
}

fn format_bonus(event: &BonusDamageEvent) -> String {
    format!(
        "{} {} {} -> {} Bonus {} {} ({})",
        event.timestamp,
        event.cast_id,
        event.caster.display_name(),
        event.target.display_name(),
        resolve(event.effect_name),
        event.value,
        event.element,
    )
}
