//! # LogWriter: progress lines on stdout.
//!
//! ## Example output
//! ```text
//! time=1.000234s vehicle=3 incident=bodywork phase=0 status=Entering
//! time=2.001871s vehicle=3 incident=bodywork phase=0 status=Leaving
//! [state] code=2 now=ONLY B
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Prints phase transitions and state changes.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Formats a transition line; `None` for other kinds.
    pub fn line(e: &Event) -> Option<String> {
        if !e.is_transition() {
            return None;
        }
        let (vehicle, incident, phase) = (e.vehicle?, e.incident?, e.phase?);
        Some(format!(
            "time={:?} vehicle={} incident={} phase={} status={}",
            e.elapsed,
            vehicle,
            incident.as_label(),
            phase.number(),
            e.kind.as_label(),
        ))
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Entering | EventKind::Leaving => {
                if let Some(line) = Self::line(e) {
                    println!("{line}");
                }
            }
            EventKind::StateChanged => {
                if let (Some(code), Some(state)) = (e.code, e.state) {
                    println!("[state] code={code} now={}", state.summary());
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::Phase;
    use crate::vehicles::{Category, Vehicle};
    use std::time::Duration;

    #[test]
    fn test_line_format() {
        let car = Vehicle::new(12, Category::B);
        let ev = Event::leaving(Duration::from_millis(1500), &car, Phase::Cleaning);
        assert_eq!(
            LogWriter::line(&ev).as_deref(),
            Some("time=1.5s vehicle=12 incident=electrical phase=2 status=Leaving")
        );
        assert!(LogWriter::line(&Event::new(EventKind::Requeued, Duration::ZERO)).is_none());
    }
}
