//! Abgleich der Ansicht mit einem neuen kanonischen Snapshot.

use super::GraphView;
use crate::core::{DiffEntity, DiffKind, GraphData, GraphDiff};

impl GraphView {
    /// Bringt die Ansicht auf den Stand von `snapshot`.
    ///
    /// Verglichen wird gegen den angezeigten Stand; nur geänderte Entities
    /// werden angefasst. Geänderte Entities werden zerstört und neu erzeugt,
    /// Löschungen laufen vor Erzeugungen, Nodes vor Kanten.
    pub fn reconcile(&mut self, snapshot: &GraphData) -> GraphDiff {
        if let Some(drag) = self.drag.take() {
            log::warn!("Abgleich während einer laufenden Geste; Geste verworfen");
            self.clear_previews(&drag.previews);
        }

        let displayed = self.displayed_graph();
        let diff = snapshot.diff(&displayed);

        for entry in diff.iter() {
            match (entry.kind, &entry.entity) {
                (DiffKind::Deletion, DiffEntity::Node(node)) => {
                    if let Some(mut view) = self.nodes.shift_remove(&node.id) {
                        view.destroy();
                    }
                }
                (DiffKind::Deletion, DiffEntity::Edge(edge)) => {
                    if let Some(mut view) = self.edges.shift_remove(&edge.id) {
                        view.destroy();
                    }
                }
                (DiffKind::Update | DiffKind::Addition, DiffEntity::Node(node)) => {
                    // Altes Drawable zuerst entfernen, die neue Darstellung trägt dieselbe ID
                    if let Some(old) = self.nodes.get_mut(&node.id) {
                        old.destroy();
                    }
                    let view = self.build_node_view(node.clone());
                    self.nodes.insert(node.id, view);
                }
                (DiffKind::Update | DiffKind::Addition, DiffEntity::Edge(edge)) => {
                    if let Some(old) = self.edges.get_mut(&edge.id) {
                        old.destroy();
                    }
                    let view = self.build_edge_view(edge.clone());
                    self.edges.insert(edge.id, view);
                }
            }
        }

        let nodes = &self.nodes;
        let edges = &self.edges;
        self.selection
            .retain(|id| nodes.contains_key(&id), |id| edges.contains_key(&id));
        self.refresh_highlights();

        if !diff.is_empty() {
            log::debug!(
                "Abgleich: {} Änderungen ({} Nodes, {} Kanten angezeigt)",
                diff.len(),
                self.nodes.len(),
                self.edges.len()
            );
        }
        diff
    }
}
