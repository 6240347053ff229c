use super::event::LogEvent;

/// Subscriber to the engine's event stream.
/// Implement this for statistics aggregation, persistence, UI feeds, etc.
pub trait EventHandler {
    /// Handle a single event.
    fn handle_event(&mut self, event: &LogEvent);

    /// Handle multiple events (default implementation calls handle_event for each)
    fn handle_events(&mut self, events: &[LogEvent]) {
        for event in events {
            self.handle_event(event);
        }
    }
}

/// Collects every event; handy for tests and replays.
impl EventHandler for Vec<LogEvent> {
    fn handle_event(&mut self, event: &LogEvent) {
        self.push(event.clone());
    }
}
