use std::borrow::Cow;

use chrono::NaiveTime;
use memchr::{memchr, memmem};

use crate::context::intern;
use crate::game_data::{Element, canonical_spell_name};

use super::log_line::{LogLine, ParsedLine};


/// Decorations the game inserts into combat lines that carry no information
const NOISE_TOKENS: [&str; 6] = [
    "(Parade !)",
    "(Parade!)",
    "(Lumière)",
    "(Critiques)",
    "(Simple)",
    "(Double)",
];

const COMBAT_START: &[u8] = b"CREATION DU COMBAT";
const FIGHT_END: &[u8] = b"[FIGHT] End fight with id";
const COMBAT_OVER: &[u8] = "Combat terminé".as_bytes();
const COMBAT_INFO: &[u8] = b"[Information (combat)] ";

const JOIN_FIGHT_ID: &[u8] = b"fightId=";
const JOIN_BREED: &[u8] = b" breed";
const JOIN_AI: &[u8] = b"isControlledByAI=";

const CAST: &[u8] = b" lance le sort ";
const KO_MARKERS: [&str; 2] = [": tombe instantanément KO", " est KO"];
const REVIVE_MARKERS: [&str; 2] = [" est réanimé", " est ressuscité"];
const TURN_END_MARKERS: [&str; 2] = [" passe son tour", " termine son tour"];

const UNIT_PV: &str = " PV";
const UNIT_PA: &str = " PA";
const UNIT_ARMOR: &str = " Armure";

/// Current time of day, used when a line carries no readable timestamp.
pub fn wall_clock_time() -> NaiveTime {
    chrono::Local::now().time()
}

/// Line text with noise tokens stripped and whitespace collapsed.
/// Only `LogParser::clean` builds one, so cleaning happens once per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedLine(String);

impl CleanedLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogParser;

impl LogParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_line(&self, raw: &str) -> ParsedLine {
        let timestamp = Self::parse_timestamp(raw);
        let cleaned = Self::clean(raw);
        ParsedLine {
            timestamp,
            line: self.classify(&cleaned),
        }
    }

    pub fn clean(raw: &str) -> CleanedLine {
        let mut stripped = Cow::Borrowed(raw);
        for token in NOISE_TOKENS {
            if memmem::find(stripped.as_bytes(), token.as_bytes()).is_some() {
                stripped = Cow::Owned(stripped.replace(token, ""));
            }
        }

        let mut normalized = String::with_capacity(stripped.len());
        for word in stripped.split_whitespace() {
            if !normalized.is_empty() {
                normalized.push(' ');
            }
            normalized.push_str(word);
        }
        CleanedLine(normalized)
    }

    // parse "LEVEL HH:MM:SS,mmm ..."
    pub fn parse_timestamp(line: &str) -> Option<NaiveTime> {
        let b = line.trim_start().as_bytes();
        let space = memchr(b' ', b)?;
        if space == 0 || !b[..space].iter().all(u8::is_ascii_uppercase) {
            return None;
        }

        let ts = b.get(space + 1..space + 13)?;
        if ts[2] != b':' || ts[5] != b':' || ts[8] != b',' {
            return None;
        }
        if ![0, 1, 3, 4, 6, 7, 9, 10, 11]
            .iter()
            .all(|&i| ts[i].is_ascii_digit())
        {
            return None;
        }

        let two = |i: usize| (ts[i] - b'0') as u32 * 10 + (ts[i + 1] - b'0') as u32;
        let millis = two(9) * 10 + (ts[11] - b'0') as u32;

        NaiveTime::from_hms_milli_opt(two(0), two(3), two(6), millis)
    }

    pub fn classify(&self, line: &CleanedLine) -> LogLine {
        let text = line.as_str();
        let b = text.as_bytes();

        if memmem::find(b, COMBAT_START).is_some() {
            return LogLine::CombatStart;
        }
        if let Some(pos) = memmem::find(b, FIGHT_END) {
            return LogLine::CombatEnd {
                fight_id: leading_number(&text[pos + FIGHT_END.len()..]),
            };
        }
        if memmem::find(b, COMBAT_OVER).is_some() {
            return LogLine::CombatEnd { fight_id: None };
        }
        if let Some(join) = Self::parse_join(text) {
            return join;
        }

        match memmem::find(b, COMBAT_INFO) {
            Some(pos) => Self::classify_combat(&text[pos + COMBAT_INFO.len()..]),
            None => LogLine::Unrecognized,
        }
    }

    // "fightId=<n> <name> breed : <b> [<id>] isControlledByAI=<bool> ..."
    fn parse_join(text: &str) -> Option<LogLine> {
        let fid = memmem::find(text.as_bytes(), JOIN_FIGHT_ID)?;
        let after = &text[fid + JOIN_FIGHT_ID.len()..];
        let space = memchr(b' ', after.as_bytes())?;
        let fight_id = after[..space].parse::<u64>().ok()?;

        let rest = &after[space + 1..];
        let breed_pos = memmem::find(rest.as_bytes(), JOIN_BREED)?;
        let name = rest[..breed_pos].trim();
        if name.is_empty() {
            return None;
        }

        let after_breed = &rest[breed_pos + JOIN_BREED.len()..];
        let open = memchr(b'[', after_breed.as_bytes())?;
        let close = open + memchr(b']', &after_breed.as_bytes()[open..])?;

        let breed = after_breed[..open]
            .trim()
            .trim_start_matches(':')
            .trim()
            .parse::<u32>()
            .ok();
        let id = after_breed[open + 1..close].trim().parse::<i64>().ok()?;

        let ai = memmem::find(after_breed.as_bytes(), JOIN_AI)?;
        let is_ai_controlled = after_breed[ai + JOIN_AI.len()..].starts_with("true");

        Some(LogLine::Join {
            fight_id,
            name: intern(name),
            breed,
            id,
            is_ai_controlled,
        })
    }

    fn classify_combat(body: &str) -> LogLine {
        let body = body.trim();
        let b = body.as_bytes();

        if let Some(pos) = memmem::find(b, CAST) {
            let caster = body[..pos].trim();
            let spell = &body[pos + CAST.len()..];
            let spell_end = memchr(b'(', spell.as_bytes()).unwrap_or(spell.len());
            let spell = canonical_spell_name(spell[..spell_end].trim());
            if caster.is_empty() || spell.is_empty() {
                return LogLine::Unrecognized;
            }
            return LogLine::Cast {
                caster: intern(caster),
                spell: intern(spell),
            };
        }

        if let Some(fighter) = subject_before_any(body, &KO_MARKERS) {
            return LogLine::Ko {
                fighter: intern(fighter),
            };
        }
        if let Some(fighter) = subject_before_any(body, &REVIVE_MARKERS) {
            return LogLine::Revived {
                fighter: intern(fighter),
            };
        }
        if let Some(fighter) = subject_before_any(body, &TURN_END_MARKERS) {
            return LogLine::TurnEnd {
                fighter: intern(fighter),
            };
        }

        let Some(sep) = memmem::find(b, b": ") else {
            return LogLine::Unrecognized;
        };
        let subject = body[..sep].trim();
        if subject.is_empty() {
            return LogLine::Unrecognized;
        }
        let rest = body[sep + 2..].trim_start();

        match rest.as_bytes().first() {
            Some(b'-') => match find_unit(rest, UNIT_PV) {
                Some(unit) => Self::damage(
                    subject,
                    parse_amount(&rest[1..unit]),
                    &rest[unit + UNIT_PV.len()..],
                ),
                None => LogLine::Unrecognized,
            },
            Some(b'+') => {
                if let Some(unit) = find_unit(rest, UNIT_PV) {
                    let tokens = paren_tokens(&rest[unit + UNIT_PV.len()..]);
                    LogLine::Heal {
                        target: intern(subject),
                        value: parse_amount(&rest[1..unit]),
                        element: last_element(&tokens),
                    }
                } else if let Some(unit) = find_unit(rest, UNIT_PA) {
                    let amount = parse_amount(&rest[1..unit]);
                    LogLine::PaRegain {
                        fighter: intern(subject),
                        amount: u32::try_from(amount).unwrap_or(u32::MAX),
                    }
                } else {
                    LogLine::Unrecognized
                }
            }
            Some(c) if c.is_ascii_digit() => match find_unit(rest, UNIT_ARMOR) {
                Some(unit) => {
                    let tokens = paren_tokens(&rest[unit + UNIT_ARMOR.len()..]);
                    LogLine::Shield {
                        target: intern(subject),
                        value: parse_amount(&rest[..unit]),
                        effect: tokens.last().map(|t| intern(t)),
                    }
                }
                None => LogLine::Unrecognized,
            },
            _ => LogLine::Unrecognized,
        }
    }

    // Element-only (or empty) parenthesis means the cast's own damage; any
    // other token names the effect that dealt it.
    fn damage(target: &str, value: u64, tail: &str) -> LogLine {
        let tokens = paren_tokens(tail);
        let element = last_element(&tokens);
        let effect = tokens
            .iter()
            .rev()
            .find(|t| !Element::from_token(t).is_known());

        match effect {
            Some(effect) => LogLine::IndirectDamage {
                target: intern(target),
                value,
                element,
                effect: intern(effect),
            },
            None => LogLine::DirectDamage {
                target: intern(target),
                value,
                element,
            },
        }
    }
}

/// Strip every non-digit and parse. Malformed input yields 0.
pub(crate) fn parse_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        tracing::warn!(raw, "Numeric field without digits, using 0");
        return 0;
    }
    match digits.parse::<u64>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(raw, error = %e, "Unparseable numeric field, using 0");
            0
        }
    }
}

fn leading_number(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let end = text
        .bytes()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn subject_before_any<'a>(body: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|marker| {
        let pos = memmem::find(body.as_bytes(), marker.as_bytes())?;
        let subject = body[..pos].trim();
        (!subject.is_empty()).then_some(subject)
    })
}

// Position of a unit word, rejecting matches that are a prefix of a longer word
fn find_unit(text: &str, unit: &str) -> Option<usize> {
    let b = text.as_bytes();
    memmem::find_iter(b, unit.as_bytes())
        .find(|&pos| b.get(pos + unit.len()).is_none_or(|c| !c.is_ascii_alphanumeric()))
}

// Contents of each "(...)" group; an unclosed last group runs to the end
fn paren_tokens(tail: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = tail;

    while let Some(open) = memchr(b'(', rest.as_bytes()) {
        let inner = &rest[open + 1..];
        let (token, next) = match memchr(b')', inner.as_bytes()) {
            Some(close) => (&inner[..close], &inner[close + 1..]),
            None => (inner, ""),
        };
        let token = token.trim();
        if !token.is_empty() {
            tokens.push(token);
        }
        rest = next;
    }
    tokens
}

fn last_element(tokens: &[&str]) -> Element {
    tokens
        .iter()
        .rev()
        .map(|t| Element::from_token(t))
        .find(|e| e.is_known())
        .unwrap_or_default()
}
