//! Spell cast aggregation
//!
//! At most one cast is open at a time. Lines related to it (damage, bonus
//! damage, PA refunds) are merged in and each one pushes the flush deadline
//! forward by the debounce delay. The cast is emitted when:
//! - a new cast starts (flush-then-replace)
//! - combat ends
//! - the debounce deadline passes, either in log time (checked when the
//!   next line arrives) or in wall time (the engine's timer task)
//!
//! Every arm/cancel bumps `generation`. A timer armed for generation `g`
//! may only flush while the generation is still `g`.

use chrono::NaiveTime;

use crate::context::IStr;
use crate::encounter::elapsed_ms;
use crate::signal_processor::LogEvent;

use super::aggregate::{BonusDamageInstance, CastId, DamageInstance, SpellCast};

#[derive(Debug)]
pub struct SpellCastAggregator {
    current: Option<SpellCast>,
    debounce_ms: u64,
    /// Log time of the last line merged into the open cast
    last_activity: Option<NaiveTime>,
    generation: u64,
    next_id: u64,
}

impl SpellCastAggregator {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            current: None,
            debounce_ms,
            last_activity: None,
            generation: 0,
            next_id: 1,
        }
    }

    pub fn next_cast_id(&mut self) -> CastId {
        let id = CastId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Flush the open cast (if any), then open `cast` and arm the debounce.
    /// Returns the events of the flushed cast.
    pub fn start_new_spell_cast(&mut self, cast: SpellCast, now: NaiveTime) -> Vec<LogEvent> {
        let flushed = self.flush_current_spell_cast();
        self.current = Some(cast);
        self.arm(now);
        flushed
    }

    /// Merge a damage/heal/shield instance. No-op (returns false) when nothing is open.
    pub fn add_damage(&mut self, instance: DamageInstance) -> bool {
        let now = instance.timestamp;
        let Some(cast) = self.current.as_mut() else {
            return false;
        };
        cast.add_damage(instance);
        self.arm(now);
        true
    }

    pub fn add_bonus_damage(&mut self, instance: BonusDamageInstance) -> bool {
        let now = instance.timestamp;
        let Some(cast) = self.current.as_mut() else {
            return false;
        };
        cast.add_bonus_damage(instance);
        self.arm(now);
        true
    }

    /// Add refunded PA to the open cast, only if `caster` owns it.
    pub fn add_pa_regain(&mut self, caster: IStr, amount: u32, now: NaiveTime) -> bool {
        let Some(cast) = self.current.as_mut() else {
            return false;
        };
        if cast.caster.name != caster {
            return false;
        }
        cast.add_pa_regain(amount);
        self.arm(now);
        true
    }

    /// Emit the open cast and clear the slot. Safe to call with nothing open.
    pub fn flush_current_spell_cast(&mut self) -> Vec<LogEvent> {
        self.cancel();
        let Some(cast) = self.current.take() else {
            return Vec::new();
        };

        if cast.is_empty() {
            tracing::debug!(cast_id = %cast.id, "Dropping spell cast without damage");
            return Vec::new();
        }

        tracing::debug!(
            cast_id = %cast.id,
            caster = cast.caster.display_name(),
            instances = cast.damage.len(),
            bonus = cast.bonus_damage.len(),
            total = cast.total_damage(),
            bonus_total = cast.total_bonus_damage(),
            "Flushing spell cast"
        );
        cast.into_events()
    }

    /// Flush if the quiet period has elapsed in log time.
    pub fn flush_due(&mut self, now: NaiveTime) -> Vec<LogEvent> {
        match self.last_activity {
            Some(last) if self.current.is_some() && elapsed_ms(last, now) >= self.debounce_ms => {
                self.flush_current_spell_cast()
            }
            _ => Vec::new(),
        }
    }

    /// Timer-driven flush. Stale timers (older generation) do nothing.
    pub fn flush_if_generation(&mut self, generation: u64) -> Vec<LogEvent> {
        if generation != self.generation {
            return Vec::new();
        }
        self.flush_current_spell_cast()
    }

    /// Discard the open cast without emitting it.
    pub fn reset(&mut self) {
        self.cancel();
        self.current = None;
    }

    pub fn current(&self) -> Option<&SpellCast> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    fn arm(&mut self, now: NaiveTime) {
        self.generation += 1;
        self.last_activity = Some(now);
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.last_activity = None;
    }
}
