//! Gruppen-Transformation: mehrere selektierte Nodes und Kanten gemeinsam ziehen.
//!
//! Pro Schritt werden zuerst die Kanten, dann die Nodes verschoben. Beim
//! Loslassen werden die Verbindungen an selektierten Nodes explizit gelöst
//! und anschließend pro Node neu gemeldet, damit der Controller sie gegen
//! die bereits aktualisierten Kanten-Positionen wieder herstellt.

use super::{GraphView, ENDS};
use crate::app::events::{NodeMove, ViewEvent};
use crate::core::{EdgeEnd, GraphData};
use glam::Vec2;

impl GraphView {
    pub(super) fn step_group(&mut self, nodes: &[u64], edges: &[u64], delta: Vec2) {
        for id in edges {
            if let Some(edge) = self.edges.get_mut(id) {
                edge.shift(delta);
            }
        }
        for &id in nodes {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.translate(delta);
            }
            // Selektierte Kanten wurden bereits als Ganzes verschoben
            for (edge_id, end) in self.attached_ends(id) {
                if edges.contains(&edge_id) {
                    continue;
                }
                if let Some(edge) = self.edges.get_mut(&edge_id) {
                    edge.translate_end(end, delta);
                }
            }
        }
    }

    pub(super) fn release_group(
        &mut self,
        nodes: &[u64],
        edges: &[u64],
        attached: &[(u64, EdgeEnd, u64)],
        scene: &GraphData,
    ) {
        // 1. Selektierte Kanten: Enden an nicht selektierten Nodes neu auflösen
        for &edge_id in edges {
            let Some(edge) = self.edges.get(&edge_id) else {
                continue;
            };
            let outside: Vec<EdgeEnd> = ENDS
                .into_iter()
                .filter(|&end| {
                    edge.data()
                        .node_at(end)
                        .is_some_and(|node_id| !nodes.contains(&node_id))
                })
                .collect();

            let mut changed = Vec::new();
            for end in outside {
                if self.resolve_end(edge_id, end, scene, |node_id| nodes.contains(&node_id)) {
                    changed.push(end);
                }
            }
            self.emit_edge_result(edge_id, &changed);
        }

        // 2. Alle Verbindungen zu selektierten Nodes lösen
        for &(edge_id, end, _) in attached {
            self.emit_disconnect(edge_id, end);
        }

        // 3. Node-Bewegungen nachspielen und Verbindungen wieder herstellen
        for &node_id in nodes {
            let Some(position) = self.nodes.get(&node_id).map(|n| n.position()) else {
                continue;
            };
            self.bus.emit(ViewEvent::NodeMove(NodeMove {
                id: node_id,
                position,
            }));
            for &(edge_id, end, owner) in attached {
                if owner == node_id {
                    self.emit_connection(edge_id, end);
                }
            }
            self.attach_dangling_ends(node_id, scene, edges);
        }

        log::debug!(
            "Gruppen-Geste beendet: {} Nodes, {} Kanten",
            nodes.len(),
            edges.len()
        );
    }
}
