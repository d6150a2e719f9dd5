use indexmap::IndexSet;

/// Auswahlbezogener Zustand der Ansicht.
///
/// `IndexSet` hält die Auswahlreihenfolge, damit Gruppen-Operationen
/// deterministisch in Klick-Reihenfolge ablaufen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selektierte Node-IDs
    pub node_ids: IndexSet<u64>,
    /// Selektierte Kanten-IDs
    pub edge_ids: IndexSet<u64>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nichts selektiert?
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.edge_ids.is_empty()
    }

    /// Anzahl selektierter Entities
    pub fn len(&self) -> usize {
        self.node_ids.len() + self.edge_ids.len()
    }

    /// Mehr als eine Entity selektiert (Gruppen-Transformation)
    pub fn is_group(&self) -> bool {
        self.len() > 1
    }

    /// Hebt die Selektion auf
    pub fn clear(&mut self) {
        self.node_ids.clear();
        self.edge_ids.clear();
    }

    /// Selektiert einen Node; ohne `additive` wird die bisherige Auswahl ersetzt.
    pub fn select_node(&mut self, id: u64, additive: bool) {
        if !additive {
            self.clear();
        }
        self.node_ids.insert(id);
    }

    /// Selektiert eine Kante; ohne `additive` wird die bisherige Auswahl ersetzt.
    pub fn select_edge(&mut self, id: u64, additive: bool) {
        if !additive {
            self.clear();
        }
        self.edge_ids.insert(id);
    }

    /// Schaltet einen Node in der Auswahl um
    pub fn toggle_node(&mut self, id: u64) {
        if !self.node_ids.shift_remove(&id) {
            self.node_ids.insert(id);
        }
    }

    /// Schaltet eine Kante in der Auswahl um
    pub fn toggle_edge(&mut self, id: u64) {
        if !self.edge_ids.shift_remove(&id) {
            self.edge_ids.insert(id);
        }
    }

    /// Ist der Node selektiert?
    pub fn contains_node(&self, id: u64) -> bool {
        self.node_ids.contains(&id)
    }

    /// Ist die Kante selektiert?
    pub fn contains_edge(&self, id: u64) -> bool {
        self.edge_ids.contains(&id)
    }

    /// Entfernt IDs, die es nicht mehr gibt
    pub fn retain(&mut self, node_exists: impl Fn(u64) -> bool, edge_exists: impl Fn(u64) -> bool) {
        self.node_ids.retain(|id| node_exists(*id));
        self.edge_ids.retain(|id| edge_exists(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_and_additive_selection() {
        let mut sel = SelectionState::new();
        sel.select_node(1, false);
        sel.select_edge(5, true);
        assert_eq!(sel.len(), 2);
        assert!(sel.is_group());

        sel.select_node(2, false);
        assert_eq!(sel.node_ids.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert!(sel.edge_ids.is_empty());
    }

    #[test]
    fn toggle_and_retain() {
        let mut sel = SelectionState::new();
        sel.toggle_node(1);
        sel.toggle_node(2);
        sel.toggle_node(1);
        sel.toggle_edge(7);
        assert!(!sel.contains_node(1));
        assert!(sel.contains_node(2));

        sel.retain(|_| false, |id| id == 7);
        assert!(sel.node_ids.is_empty());
        assert!(sel.contains_edge(7));
    }
}
