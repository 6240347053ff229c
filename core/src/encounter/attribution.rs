//! Recency-based attribution of damage lines that do not name their caster.
//!
//! Casts are recorded as they are seen. A damage line is credited to the
//! most recent caster inside the recent window, then inside the sticky
//! window, otherwise to nobody (the caller substitutes the Indirect fighter).

use chrono::NaiveTime;
use hashbrown::HashMap;

use crate::context::IStr;
use crate::game_data::Element;
use wakmeter_types::AttributionConfig;

use super::ability::Ability;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const HALF_DAY_MS: i64 = MS_PER_DAY / 2;

/// Milliseconds from `earlier` to `later` on a 24 h clock.
///
/// Log timestamps carry no date, so a jump back by more than half a day is
/// read as crossing midnight. Lines that arrive slightly out of order yield 0.
pub fn elapsed_ms(earlier: NaiveTime, later: NaiveTime) -> u64 {
    let mut delta = (later - earlier).num_milliseconds();
    if delta < -HALF_DAY_MS {
        delta += MS_PER_DAY;
    } else if delta > HALF_DAY_MS {
        delta -= MS_PER_DAY;
    }
    delta.max(0) as u64
}

#[derive(Debug, Clone, Copy)]
struct CastRecord {
    at: NaiveTime,
    /// Arrival order, breaks ties between casts with the same timestamp
    seq: u64,
}

/// Who cast what, and when, within the current combat.
#[derive(Debug)]
pub struct CastHistory {
    recent_window_ms: u64,
    sticky_window_ms: u64,
    last_cast: HashMap<IStr, CastRecord>,
    last_ability: HashMap<IStr, Ability>,
    next_seq: u64,
}

impl CastHistory {
    pub fn new(config: &AttributionConfig) -> Self {
        Self {
            recent_window_ms: config.recent_window_ms,
            sticky_window_ms: config.sticky_window_ms,
            last_cast: HashMap::new(),
            last_ability: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn record_cast(&mut self, caster: IStr, ability: Ability, at: NaiveTime) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_cast.insert(caster, CastRecord { at, seq });
        self.last_ability.insert(caster, ability);
    }

    /// Remember an element revealed after the cast was recorded.
    pub fn reveal_element(&mut self, caster: IStr, element: Element) {
        if let Some(known) = self.last_ability.get_mut(&caster) {
            known.reveal_element(element);
        }
    }

    pub fn last_ability(&self, caster: IStr) -> Option<Ability> {
        self.last_ability.get(&caster).copied()
    }

    /// True when `caster` cast something no more than `window_ms` before `now`.
    pub fn cast_within(&self, caster: IStr, now: NaiveTime, window_ms: u64) -> bool {
        self.last_cast
            .get(&caster)
            .is_some_and(|r| elapsed_ms(r.at, now) <= window_ms)
    }

    /// Most plausible caster for a damage line observed at `now`.
    pub fn resolve(&self, now: NaiveTime) -> Option<IStr> {
        self.most_recent_within(now, self.recent_window_ms)
            .or_else(|| self.most_recent_within(now, self.sticky_window_ms))
    }

    fn most_recent_within(&self, now: NaiveTime, window_ms: u64) -> Option<IStr> {
        self.last_cast
            .iter()
            .map(|(name, record)| (*name, elapsed_ms(record.at, now), record.seq))
            .filter(|(_, elapsed, _)| *elapsed <= window_ms)
            .min_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
            .map(|(name, _, _)| name)
    }

    pub fn clear(&mut self) {
        self.last_cast.clear();
        self.last_ability.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.last_cast.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;

    fn t(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    fn history() -> CastHistory {
        CastHistory::new(&AttributionConfig::default())
    }

    #[test]
    fn test_elapsed_wraps_midnight() {
        assert_eq!(elapsed_ms(t(23, 59, 59, 500), t(0, 0, 0, 500)), 1000);
        assert_eq!(elapsed_ms(t(10, 0, 0, 0), t(10, 0, 2, 0)), 2000);
        // Slightly out of order is not a full day
        assert_eq!(elapsed_ms(t(10, 0, 2, 0), t(10, 0, 0, 0)), 0);
    }

    #[test]
    fn test_resolve_prefers_most_recent_in_window() {
        let mut h = history();
        h.record_cast(intern("A"), Ability::spell(intern("Fulgur")), t(12, 0, 0, 0));
        h.record_cast(intern("B"), Ability::spell(intern("Flamiche")), t(12, 0, 3, 0));

        assert_eq!(h.resolve(t(12, 0, 4, 0)), Some(intern("B")));
    }

    #[test]
    fn test_resolve_ties_go_to_latest_recorded() {
        let mut h = history();
        h.record_cast(intern("A"), Ability::spell(intern("Fulgur")), t(12, 0, 0, 0));
        h.record_cast(intern("B"), Ability::spell(intern("Fulgur")), t(12, 0, 0, 0));

        assert_eq!(h.resolve(t(12, 0, 1, 0)), Some(intern("B")));
    }

    #[test]
    fn test_resolve_falls_back_to_sticky_then_none() {
        let mut h = history();
        h.record_cast(intern("A"), Ability::spell(intern("Fulgur")), t(12, 0, 0, 0));

        // Outside 10 s, inside 20 s
        assert_eq!(h.resolve(t(12, 0, 15, 0)), Some(intern("A")));
        assert_eq!(h.resolve(t(12, 0, 25, 0)), None);
    }

    #[test]
    fn test_cast_within_and_clear() {
        let mut h = history();
        h.record_cast(intern("A"), Ability::spell(intern("Fulgur")), t(12, 0, 0, 0));

        assert!(h.cast_within(intern("A"), t(12, 0, 4, 0), 5000));
        assert!(!h.cast_within(intern("A"), t(12, 0, 6, 0), 5000));
        assert!(!h.cast_within(intern("B"), t(12, 0, 0, 0), 5000));

        h.reveal_element(intern("A"), Element::Air);
        assert_eq!(h.last_ability(intern("A")).map(|a| a.element), Some(Element::Air));

        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.last_ability(intern("A")), None);
    }
}
