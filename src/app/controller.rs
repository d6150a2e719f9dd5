//! Referenz-Controller: wendet View-Events auf den kanonischen Graphen an.

use super::events::{EdgeCombine, EdgeConnection, ViewEvent};
use super::UndoStack;
use crate::core::{EdgeData, EdgeEnd, GraphData, NodeData};
use crate::shared::EditorOptions;
use std::sync::Arc;

/// Hält den kanonischen Snapshot und dessen Undo-Verlauf.
///
/// Controller und Verlauf teilen sich die Snapshots per `Arc`.
pub struct GraphController {
    graph: Arc<GraphData>,
    history: UndoStack<Arc<GraphData>>,
}

impl GraphController {
    /// Erstellt einen Controller; der Startgraph ist die Basis des Verlaufs.
    pub fn new(graph: GraphData, history_depth: usize) -> Self {
        let graph = Arc::new(graph);
        let mut history = UndoStack::with_capacity(history_depth);
        history.push(Arc::clone(&graph));
        Self { graph, history }
    }

    /// Controller mit Verlaufstiefe aus den Optionen
    pub fn from_options(graph: GraphData, options: &EditorOptions) -> Self {
        Self::new(graph, options.history_depth)
    }

    /// Aktueller kanonischer Graph
    pub fn graph(&self) -> &GraphData {
        &self.graph
    }

    /// Geteilter Snapshot für die Ansicht
    pub fn snapshot(&self) -> Arc<GraphData> {
        Arc::clone(&self.graph)
    }

    /// Undo-Verlauf
    pub fn history(&self) -> &UndoStack<Arc<GraphData>> {
        &self.history
    }

    /// Wendet ein einzelnes Event an; bei Änderung entsteht ein Verlaufseintrag.
    pub fn apply(&mut self, event: &ViewEvent) -> bool {
        self.apply_batch(std::slice::from_ref(event)) > 0
    }

    /// Wendet die Events einer Geste an und speichert genau einen Snapshot.
    ///
    /// Liefert die Anzahl Events, die den Graphen verändert haben.
    pub fn apply_batch(&mut self, events: &[ViewEvent]) -> usize {
        if events.is_empty() {
            return 0;
        }
        let mut working = GraphData::clone(&self.graph);
        let changed = events
            .iter()
            .filter(|event| apply_event(&mut working, event))
            .count();

        if changed > 0 {
            self.graph = Arc::new(working);
            self.history.push(Arc::clone(&self.graph));
            log::info!("{} von {} Events übernommen", changed, events.len());
        }
        changed
    }

    /// Fügt einen Node mit neuer ID hinzu.
    pub fn add_node(&mut self, mut node: NodeData) -> u64 {
        let graph = Arc::make_mut(&mut self.graph);
        node.id = graph.next_node_id();
        let id = node.id;
        graph.insert_node(node);
        self.history.push(Arc::clone(&self.graph));
        log::info!("Node {} hinzugefügt", id);
        id
    }

    /// Fügt eine Kante mit neuer ID hinzu.
    pub fn add_edge(&mut self, mut edge: EdgeData) -> u64 {
        let graph = Arc::make_mut(&mut self.graph);
        edge.id = graph.next_edge_id();
        let id = edge.id;
        graph.insert_edge(edge);
        self.history.push(Arc::clone(&self.graph));
        log::info!("Kante {} hinzugefügt", id);
        id
    }

    /// Einen Schritt zurück; `false` am Anfang des Verlaufs.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.graph = Arc::clone(snapshot);
                true
            }
            None => false,
        }
    }

    /// Einen Schritt vor; `false` wenn nichts wiederherzustellen ist.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.graph = Arc::clone(snapshot);
                true
            }
            None => false,
        }
    }
}

/// Führt ein Event auf dem Graphen aus. `true` wenn sich etwas geändert hat.
fn apply_event(graph: &mut GraphData, event: &ViewEvent) -> bool {
    match event {
        ViewEvent::NodeSelected(_) | ViewEvent::ObjectDeselected(_) => false,
        ViewEvent::NodeMove(e) => {
            let moved = graph.update_node_position(e.id, e.position);
            if !moved {
                log::warn!("node:move für unbekannten Node {}", e.id);
            }
            moved
        }
        ViewEvent::NodeRemove(e) => graph.remove_node(e.id).is_some(),
        ViewEvent::EdgeMove(e) => graph
            .update_edge(e.id, |edge| edge.set_anchors(e.anchors))
            .is_some(),
        ViewEvent::EdgeConnectionSrc(c) => apply_connection(graph, EdgeEnd::Source, c),
        ViewEvent::EdgeConnectionDst(c) => apply_connection(graph, EdgeEnd::Destination, c),
        ViewEvent::EdgeCombine(c) => apply_combine(graph, c),
        ViewEvent::EdgeRemove(e) => graph.remove_edge(e.id).is_some(),
        ViewEvent::TriggerUpdate(e) => graph
            .update_edge(e.edge_id, |edge| match edge.triggers.get_mut(e.trigger_index) {
                Some(trigger) => {
                    trigger.params = e.value.clone();
                    true
                }
                None => false,
            })
            .unwrap_or(false),
        ViewEvent::TriggerRemove(e) => graph
            .update_edge(e.edge_id, |edge| {
                if e.trigger_index >= edge.triggers.len() {
                    return false;
                }
                edge.triggers.remove(e.trigger_index);
                edge.reindex_triggers();
                true
            })
            .unwrap_or(false),
        ViewEvent::ActionUpdate(e) => graph
            .update_node(e.node_id, |node| node.params = e.value.clone())
            .is_some(),
    }
}

fn apply_connection(graph: &mut GraphData, end: EdgeEnd, c: &EdgeConnection) -> bool {
    let node_id = match c.node_id {
        Some(id) if !graph.contains_node(id) => {
            log::warn!("Kante {} verweist auf unbekannten Node {}; Ende bleibt lose", c.id, id);
            None
        }
        other => other,
    };
    let side = node_id.and(c.side);
    graph
        .update_edge(c.id, |edge| {
            edge.set_anchors(c.anchors);
            edge.set_connection(end, node_id, side);
        })
        .is_some()
}

fn apply_combine(graph: &mut GraphData, c: &EdgeCombine) -> bool {
    if c.removed == c.kept {
        log::error!("Kante {} kann nicht mit sich selbst zusammengeführt werden", c.kept);
        return false;
    }
    let Some(removed) = graph.edge(c.removed).cloned() else {
        log::warn!("edge:combine: Kante {} existiert nicht", c.removed);
        return false;
    };
    let merged = graph.update_edge(c.kept, |edge| {
        edge.triggers.extend(removed.triggers);
        edge.reindex_triggers();
    });
    if merged.is_none() {
        log::warn!("edge:combine: Zielkante {} existiert nicht", c.kept);
        return false;
    }
    graph.remove_edge(c.removed);
    true
}
