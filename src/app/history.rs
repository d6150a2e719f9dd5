//! Generischer, linearer Undo/Redo-Verlauf.

/// Begrenzter linearer Verlauf mit Cursor.
///
/// Der erste Eintrag dient als Ausgangszustand: `undo` geht nie vor ihn
/// zurück. Ein Cursor `i` zeigt hinter den aktuellen Eintrag
/// (`0 ≤ i ≤ len`); `push` bei `i < len` verwirft den Redo-Zweig.
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    items: Vec<T>,
    cursor: usize,
    capacity: usize,
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::with_capacity(crate::shared::options::HISTORY_DEPTH)
    }
}

impl<T> UndoStack<T> {
    /// Erstellt einen leeren Verlauf mit maximaler Tiefe (mindestens 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity.min(64)),
            cursor: 0,
            capacity,
        }
    }

    /// Legt einen neuen Eintrag ab.
    ///
    /// Steht der Cursor nicht am Ende, wird zuerst alles ab dem Cursor
    /// verworfen. Bei voller Kapazität fällt der älteste Eintrag heraus.
    pub fn push(&mut self, item: T) {
        self.items.truncate(self.cursor);
        if self.items.len() >= self.capacity {
            self.items.remove(0);
        }
        self.items.push(item);
        self.cursor = self.items.len();
    }

    /// Einen Schritt zurück; liefert den neuen aktuellen Eintrag.
    ///
    /// Am Ausgangszustand `None`, der Cursor bleibt stehen.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor <= 1 {
            log::debug!("Undo: Anfang des Verlaufs erreicht");
            return None;
        }
        self.cursor -= 1;
        self.items.get(self.cursor - 1)
    }

    /// Einen Schritt vor; `None` wenn kein Redo-Zweig existiert.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor == self.items.len() {
            log::debug!("Redo: Ende des Verlaufs erreicht");
            return None;
        }
        self.cursor += 1;
        self.items.get(self.cursor - 1)
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        self.cursor > 1
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        self.cursor != self.items.len()
    }

    /// Aktueller Eintrag (vor dem Cursor)
    pub fn current(&self) -> Option<&T> {
        self.cursor.checked_sub(1).and_then(|i| self.items.get(i))
    }

    /// Anzahl gespeicherter Einträge (inkl. Redo-Zweig)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Gibt `true` zurück, wenn der Verlauf leer ist.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximale Tiefe
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Verwirft den gesamten Verlauf
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_sequence() {
        let mut stack = UndoStack::with_capacity(10);
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.undo(), Some(&2));
        assert_eq!(stack.undo(), Some(&1));
        assert_eq!(stack.undo(), None);
        assert_eq!(stack.redo(), Some(&2));

        stack.push(9);
        assert_eq!(stack.redo(), None);
        assert!(!stack.can_redo());
        assert_eq!(stack.current(), Some(&9));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut stack: UndoStack<u32> = UndoStack::default();
        assert_eq!(stack.undo(), None);
        assert_eq!(stack.redo(), None);
        assert!(!stack.can_undo());
        assert!(stack.current().is_none());
    }

    #[test]
    fn capacity_drops_oldest_entry() {
        let mut stack = UndoStack::with_capacity(3);
        for i in 0..5 {
            stack.push(i);
        }

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.undo(), Some(&3));
        assert_eq!(stack.undo(), Some(&2));
        assert_eq!(stack.undo(), None);
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut stack = UndoStack::with_capacity(10);
        stack.push("a");
        stack.push("b");
        stack.push("c");
        stack.undo();
        stack.undo();
        assert!(stack.can_redo());

        stack.push("x");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.undo(), Some(&"a"));
        assert_eq!(stack.redo(), Some(&"x"));
    }
}
