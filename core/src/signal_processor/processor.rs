use chrono::NaiveTime;

use crate::combat_log::{LogLine, LogParser, ParsedLine};
use crate::context::{IStr, intern, resolve};
use crate::encounter::{Ability, DamageSource, Fighter, validator};
use crate::game_data::{Element, NoSpellCosts, PlayerClass, SpellCosts, is_indirect_effect};
use crate::spell_cast::{BonusDamageInstance, DamageInstance, SpellCast};
use wakmeter_types::EngineConfig;

use super::combat_state::CombatState;
use super::event::{BattleEvent, EventKind, LogEvent};

/// Turns raw log lines into the event stream.
/// Synchronous and single-threaded: each call returns the events the line
/// produced, in emission order.
pub struct CombatInterpreter {
    parser: LogParser,
    state: CombatState,
    spell_costs: Box<dyn SpellCosts>,
    pa_regain_window_ms: u64,
}

impl Default for CombatInterpreter {
    fn default() -> Self {
        Self::new(&EngineConfig::default(), Box::new(NoSpellCosts))
    }
}

impl CombatInterpreter {
    pub fn new(config: &EngineConfig, spell_costs: Box<dyn SpellCosts>) -> Self {
        Self {
            parser: LogParser::new(),
            state: CombatState::new(config),
            spell_costs,
            pa_regain_window_ms: config.attribution.pa_regain_window_ms,
        }
    }

    /// Process one raw line. `fallback` is used when the line has no
    /// readable timestamp prefix.
    pub fn process_line(&mut self, raw: &str, fallback: NaiveTime) -> Vec<LogEvent> {
        if raw.trim().is_empty() {
            return Vec::new();
        }
        let parsed = self.parser.parse_line(raw);
        self.process_parsed(parsed, fallback)
    }

    /// Process a line that was already classified (parallel replay).
    pub fn process_parsed(&mut self, parsed: ParsedLine, fallback: NaiveTime) -> Vec<LogEvent> {
        // Only in-band time advances the log-time debounce
        let mut events = match parsed.timestamp {
            Some(ts) => self.state.aggregator.flush_due(ts),
            None => Vec::new(),
        };
        let now = parsed.timestamp.unwrap_or(fallback);

        match parsed.line {
            LogLine::CombatStart => events.extend(self.state.start(now)),
            LogLine::CombatEnd { fight_id } => events.extend(self.state.end(fight_id, now)),
            LogLine::Unrecognized => {}
            line if !self.state.in_combat => {
                tracing::trace!(
                    kind = line.kind_name(),
                    subject = line.subject(),
                    "Ignoring line outside of combat"
                );
            }
            LogLine::Join {
                name,
                breed,
                id,
                is_ai_controlled,
                ..
            } => self.handle_join(name, breed, id, is_ai_controlled),
            LogLine::Ko { fighter } => events.extend(self.handle_ko(fighter, now)),
            LogLine::Revived { fighter } => self.state.tracker.revive(fighter),
            LogLine::TurnEnd { fighter } => events.extend(self.handle_turn_end(fighter, now)),
            LogLine::Cast { caster, spell } => events.extend(self.handle_cast(caster, spell, now)),
            LogLine::DirectDamage {
                target,
                value,
                element,
            } => events.extend(self.handle_fact(target, value, element, EventKind::Damage, now)),
            LogLine::IndirectDamage {
                target,
                value,
                element,
                effect,
            } => events.extend(self.handle_indirect_damage(target, value, element, effect, now)),
            LogLine::Heal {
                target,
                value,
                element,
            } => events.extend(self.handle_fact(target, value, element, EventKind::Heal, now)),
            LogLine::Shield { target, value, .. } => {
                events.extend(self.handle_fact(target, value, Element::Unknown, EventKind::Shield, now))
            }
            LogLine::PaRegain { fighter, amount } => self.handle_pa_regain(fighter, amount, now),
        }

        events
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Debounce hooks for the engine's timer
    // ─────────────────────────────────────────────────────────────────────────

    pub fn debounce_generation(&self) -> u64 {
        self.state.aggregator.generation()
    }

    pub fn debounce_ms(&self) -> u64 {
        self.state.aggregator.debounce_ms()
    }

    pub fn has_open_cast(&self) -> bool {
        self.state.aggregator.is_open()
    }

    /// Flush the open cast if no related line arrived since `generation` was armed.
    pub fn flush_if_generation(&mut self, generation: u64) -> Vec<LogEvent> {
        self.state.aggregator.flush_if_generation(generation)
    }

    /// Force out the open cast (end of a replay, shutdown).
    pub fn flush_pending(&mut self) -> Vec<LogEvent> {
        self.state.aggregator.flush_current_spell_cast()
    }

    pub fn in_combat(&self) -> bool {
        self.state.in_combat
    }

    pub fn round(&self) -> u32 {
        self.state.tracker.round()
    }

    pub fn fighter(&self, name: &str) -> Option<Fighter> {
        self.state.registry.get(intern(name))
    }

    pub fn fighter_count(&self) -> usize {
        self.state.registry.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_join(&mut self, name: IStr, breed: Option<u32>, id: i64, is_ai_controlled: bool) {
        let class = breed.and_then(PlayerClass::from_breed);
        let fighter = self
            .state
            .registry
            .get_or_create(name, is_ai_controlled, id, class);
        tracing::debug!(
            name = resolve(name),
            id,
            kind = ?fighter.kind,
            class = ?fighter.class,
            "Fighter joined"
        );
    }

    fn handle_ko(&mut self, fighter: IStr, now: NaiveTime) -> Vec<LogEvent> {
        if self.state.registry.get(fighter).is_some_and(|f| !f.is_player()) {
            return Vec::new();
        }
        tracing::debug!(player = resolve(fighter), "Player KO");
        let mut events = self.flush_if_acting(fighter);
        events.extend(battle(self.state.tracker.mark_ko(fighter, now)));
        events
    }

    fn handle_turn_end(&mut self, fighter: IStr, now: NaiveTime) -> Vec<LogEvent> {
        let mut events = self.flush_if_acting(fighter);
        events.extend(battle(self.state.tracker.turn_ended(fighter, now)));
        events
    }

    // A turn's casts are emitted before its END_TURN
    fn flush_if_acting(&mut self, fighter: IStr) -> Vec<LogEvent> {
        if self.state.tracker.current_player() == Some(fighter) {
            self.state.aggregator.flush_current_spell_cast()
        } else {
            Vec::new()
        }
    }

    fn handle_cast(&mut self, caster_name: IStr, spell: IStr, now: NaiveTime) -> Vec<LogEvent> {
        // Casters without a join line get a synthetic, unregistered player
        let caster = self
            .state
            .registry
            .get(caster_name)
            .unwrap_or_else(|| Fighter::player(caster_name, None, None));

        let ability = Ability::spell(spell);
        let base_cost = self
            .spell_costs
            .cost_for(caster.class.map(PlayerClass::name), resolve(spell));

        self.state.history.record_cast(caster_name, ability, now);

        // Previous cast belongs to the previous turn
        let mut events = self.state.aggregator.flush_current_spell_cast();

        if caster.is_player() {
            events.extend(battle(self.state.tracker.player_acted(
                caster_name,
                &self.state.registry,
                now,
            )));
        }

        let cast_id = self.state.aggregator.next_cast_id();
        let cast = SpellCast::new(cast_id, now, caster, ability, base_cost);
        tracing::debug!(
            %cast_id,
            caster = caster.display_name(),
            spell = resolve(spell),
            ?base_cost,
            "Spell cast"
        );
        events.extend(self.state.aggregator.start_new_spell_cast(cast, now));
        events
    }

    /// Damage, heal or shield attributed to the most recent caster.
    fn handle_fact(
        &mut self,
        target_name: IStr,
        value: u64,
        element: Element,
        kind: EventKind,
        now: NaiveTime,
    ) -> Vec<LogEvent> {
        let caster = self.resolve_caster(now);
        let target = self.state.registry.get_or_create_enemy(target_name);

        if validator::should_reject(&caster, &target, kind, value) {
            return Vec::new();
        }

        let instance = DamageInstance {
            timestamp: now,
            target,
            value,
            element,
            kind,
        };

        if self.owns_open_cast(&caster) {
            if kind == EventKind::Damage {
                self.state.history.reveal_element(caster.name, element);
            }
            self.state.aggregator.add_damage(instance);
            return Vec::new();
        }

        let ability = self
            .state
            .history
            .last_ability(caster.name)
            .unwrap_or_else(|| Ability::unknown(element));
        self.standalone(caster, ability, instance)
    }

    fn handle_indirect_damage(
        &mut self,
        target_name: IStr,
        value: u64,
        element: Element,
        effect: IStr,
        now: NaiveTime,
    ) -> Vec<LogEvent> {
        let target = self.state.registry.get_or_create_enemy(target_name);

        if is_indirect_effect(resolve(effect)) {
            let caster = self.state.registry.indirect();
            if validator::should_reject(&caster, &target, EventKind::Damage, value) {
                return Vec::new();
            }
            tracing::debug!(effect = resolve(effect), value, "Indirect damage");
            let ability = Ability::effect(effect, element, DamageSource::Indirect);
            let instance = DamageInstance {
                timestamp: now,
                target,
                value,
                element,
                kind: EventKind::Damage,
            };
            return self.standalone(caster, ability, instance);
        }

        // Anything else is credited to whoever most likely caused it
        let caster = self.resolve_caster(now);
        if validator::should_reject(&caster, &target, EventKind::Damage, value) {
            return Vec::new();
        }
        tracing::debug!(
            caster = caster.display_name(),
            effect = resolve(effect),
            value,
            "Indirect damage reassigned as direct"
        );

        if self.owns_open_cast(&caster) {
            self.state.aggregator.add_bonus_damage(BonusDamageInstance {
                timestamp: now,
                effect_name: effect,
                target,
                value,
                element,
            });
            return Vec::new();
        }

        let ability = Ability::effect(effect, element, DamageSource::Direct);
        let instance = DamageInstance {
            timestamp: now,
            target,
            value,
            element,
            kind: EventKind::Damage,
        };
        self.standalone(caster, ability, instance)
    }

    fn handle_pa_regain(&mut self, fighter: IStr, amount: u32, now: NaiveTime) {
        let is_enemy = self.state.registry.get(fighter).is_some_and(|f| !f.is_player());
        if is_enemy || self.state.tracker.is_ko(fighter) {
            return;
        }
        if !self
            .state
            .history
            .cast_within(fighter, now, self.pa_regain_window_ms)
        {
            tracing::debug!(player = resolve(fighter), amount, "PA regain without a recent cast");
            return;
        }
        if !self.state.aggregator.add_pa_regain(fighter, amount, now) {
            tracing::debug!(player = resolve(fighter), amount, "PA regain for a cast already emitted");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_caster(&mut self, now: NaiveTime) -> Fighter {
        match self.state.history.resolve(now) {
            Some(name) => self
                .state
                .registry
                .get(name)
                .unwrap_or_else(|| Fighter::player(name, None, None)),
            None => self.state.registry.indirect(),
        }
    }

    fn owns_open_cast(&self, caster: &Fighter) -> bool {
        self.state
            .aggregator
            .current()
            .is_some_and(|cast| cast.caster.name == caster.name)
    }

    /// Emit a fact that cannot join the open cast as its own single-instance cast.
    fn standalone(&mut self, caster: Fighter, ability: Ability, instance: DamageInstance) -> Vec<LogEvent> {
        let cast_id = self.state.aggregator.next_cast_id();
        let mut cast = SpellCast::new(cast_id, instance.timestamp, caster, ability, None);
        cast.add_damage(instance);
        cast.into_events()
    }
}

fn battle(events: Vec<BattleEvent>) -> impl Iterator<Item = LogEvent> {
    events.into_iter().map(LogEvent::Battle)
}
