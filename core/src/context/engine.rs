//! Thread-safe shell around the interpreter.
//!
//! Line processing and the debounce timer both touch the open spell cast, so
//! the interpreter, the handlers and the pending timer share one mutex. The
//! timer is a tokio task tagged with the aggregator's debounce generation; it
//! flushes only if that generation is still current when it gets the lock.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::NaiveTime;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::combat_log::{ParsedLine, Reader, ReaderError, wall_clock_time};
use crate::game_data::{JsonSpellCosts, NoSpellCosts, SpellCosts};
use crate::signal_processor::{CombatInterpreter, EventHandler, LogEvent};
use wakmeter_types::EngineConfig;

type SharedEngine = Arc<Mutex<EngineInner>>;

struct EngineInner {
    interpreter: CombatInterpreter,
    handlers: Vec<Box<dyn EventHandler + Send>>,
    timer: Option<JoinHandle<()>>,
    armed_generation: Option<u64>,
    warned_no_runtime: bool,
}

impl EngineInner {
    fn dispatch(&mut self, events: &[LogEvent]) {
        if events.is_empty() {
            return;
        }
        for handler in &mut self.handlers {
            handler.handle_events(events);
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.armed_generation = None;
    }
}

/// Feeds lines to the interpreter and pushes the resulting events to every
/// registered handler, in emission order. Cloning shares the same engine.
#[derive(Clone)]
pub struct CombatLogEngine {
    inner: SharedEngine,
}

impl CombatLogEngine {
    pub fn new(config: &EngineConfig, spell_costs: Box<dyn SpellCosts>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                interpreter: CombatInterpreter::new(config, spell_costs),
                handlers: Vec::new(),
                timer: None,
                armed_generation: None,
                warned_no_runtime: false,
            })),
        }
    }

    /// Engine with the spell cost table named in the config, if it loads.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config, load_spell_costs(config))
    }

    pub fn add_handler<H: EventHandler + Send + 'static>(&self, handler: H) {
        lock(&self.inner).handlers.push(Box::new(handler));
    }

    /// Feed a live line; lines without a timestamp prefix use the wall clock.
    pub fn feed_line(&self, line: &str) {
        self.feed_line_at(line, wall_clock_time());
    }

    pub fn feed_line_at(&self, line: &str, fallback: NaiveTime) {
        let mut guard = lock(&self.inner);
        let events = guard.interpreter.process_line(line, fallback);
        guard.dispatch(&events);
        sync_timer(&mut guard, &self.inner);
    }

    /// Feed already classified lines under a single lock.
    pub fn feed_parsed(&self, lines: impl IntoIterator<Item = ParsedLine>) {
        let mut guard = lock(&self.inner);
        for parsed in lines {
            let events = guard.interpreter.process_parsed(parsed, wall_clock_time());
            guard.dispatch(&events);
        }
        sync_timer(&mut guard, &self.inner);
    }

    /// Emit the open cast now, without waiting for the debounce.
    pub fn flush(&self) {
        let mut guard = lock(&self.inner);
        guard.cancel_timer();
        let events = guard.interpreter.flush_pending();
        guard.dispatch(&events);
    }

    /// Replay a whole file. Returns the byte offset to tail from.
    pub fn replay(&self, reader: &Reader) -> Result<u64, ReaderError> {
        let (lines, end_pos) = reader.read_log_file()?;
        tracing::info!(path = %reader.path().display(), lines = lines.len(), "Replaying log file");
        self.feed_parsed(lines);
        Ok(end_pos)
    }

    /// Follow the file from `start_pos` until aborted.
    pub async fn tail(&self, reader: &Reader, start_pos: u64) -> Result<(), ReaderError> {
        tracing::info!(path = %reader.path().display(), start_pos, "Tailing log file");
        reader
            .tail_log_file(start_pos, |line| self.feed_line(line))
            .await
    }

    pub fn in_combat(&self) -> bool {
        lock(&self.inner).interpreter.in_combat()
    }

    pub fn has_open_cast(&self) -> bool {
        lock(&self.inner).interpreter.has_open_cast()
    }

    pub fn round(&self) -> u32 {
        lock(&self.inner).interpreter.round()
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Forward events to a channel; a closed receiver just drops them.
impl EventHandler for UnboundedSender<LogEvent> {
    fn handle_event(&mut self, event: &LogEvent) {
        let _ = self.send(event.clone());
    }
}

pub fn load_spell_costs(config: &EngineConfig) -> Box<dyn SpellCosts> {
    let Some(path) = config.spell_costs_path.as_deref() else {
        return Box::new(NoSpellCosts);
    };
    match JsonSpellCosts::from_path(Path::new(path)) {
        Ok(costs) => {
            tracing::info!(path, "Loaded spell cost table");
            Box::new(costs)
        }
        Err(err) => {
            tracing::warn!(path, error = %err, "Spell cost table unavailable, casts will have no base cost");
            Box::new(NoSpellCosts)
        }
    }
}

fn lock(inner: &Mutex<EngineInner>) -> MutexGuard<'_, EngineInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Re-arm the wall-clock debounce after the aggregator's generation moved.
fn sync_timer(guard: &mut EngineInner, shared: &SharedEngine) {
    let generation = guard.interpreter.debounce_generation();
    if guard.armed_generation == Some(generation) {
        return;
    }

    guard.cancel_timer();
    if !guard.interpreter.has_open_cast() {
        return;
    }

    let Ok(runtime) = Handle::try_current() else {
        if !guard.warned_no_runtime {
            tracing::warn!("No tokio runtime, spell casts flush only on log activity");
            guard.warned_no_runtime = true;
        }
        return;
    };

    let delay = Duration::from_millis(guard.interpreter.debounce_ms());
    let weak = Arc::downgrade(shared);
    guard.timer = Some(runtime.spawn(debounce_flush(weak, generation, delay)));
    guard.armed_generation = Some(generation);
}

async fn debounce_flush(engine: Weak<Mutex<EngineInner>>, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;

    let Some(engine) = engine.upgrade() else {
        return;
    };
    let mut guard = lock(&engine);
    let events = guard.interpreter.flush_if_generation(generation);
    if !events.is_empty() {
        tracing::debug!(generation, events = events.len(), "Debounce flush");
    }
    guard.dispatch(&events);

    // The handle in the slot is this task's own
    if guard.armed_generation == Some(generation) {
        guard.armed_generation = None;
        guard.timer = None;
    }
}
