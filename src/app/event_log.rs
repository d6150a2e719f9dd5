//! Begrenzter Verlauf der ausgelösten View-Events (Diagnose, Tests).

use super::events::{EventKind, ViewEvent};

/// Speichert ausgelöste Events in Reihenfolge.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: Vec<ViewEvent>,
    limit: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl EventLog {
    /// Standard-Obergrenze
    pub const DEFAULT_LIMIT: usize = crate::shared::options::EVENT_LOG_LIMIT;

    /// Erstellt ein leeres Log mit Obergrenze (mindestens 2).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(2),
        }
    }

    /// Fügt ein Event hinzu.
    /// Bei Erreichen der Obergrenze wird die ältere Hälfte verworfen.
    pub fn record(&mut self, event: ViewEvent) {
        if self.entries.len() >= self.limit {
            self.entries.drain(..self.limit / 2);
        }
        self.entries.push(event);
    }

    /// Gibt die Anzahl der geloggten Events zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Events vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[ViewEvent] {
        &self.entries
    }

    /// Anzahl der Events einer Art
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|e| e.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::NodeRemove;

    #[test]
    fn log_drops_older_half_at_limit() {
        let mut log = EventLog::with_limit(4);
        for id in 0..5 {
            log.record(ViewEvent::NodeRemove(NodeRemove { id }));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0], ViewEvent::NodeRemove(NodeRemove { id: 2 }));
        assert_eq!(log.count(EventKind::NodeRemove), 3);
    }
}
