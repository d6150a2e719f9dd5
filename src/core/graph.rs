//! Der kanonische Automations-Graph: Nodes, Trigger-Kanten und Spatial-Indizes.

mod diff;

pub use diff::{DiffEntity, DiffEntry, DiffKind, GraphDiff};

use super::{EdgeData, NodeData};
use super::{SpatialIndex, SpatialMatch};
use glam::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maximale Anzahl Kandidaten einer Proximity-Abfrage
pub const MAX_PROXIMITY_CANDIDATES: usize = 8;

/// Snapshot des gesamten Graphen.
///
/// Nodes und Kanten liegen in Einfügereihenfolge vor; die Reihenfolge der
/// Kanten bestimmt auch die Zeichen- und Trefferreihenfolge der Ansicht.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphRepr", into = "GraphRepr")]
pub struct GraphData {
    nodes: IndexMap<u64, NodeData>,
    edges: IndexMap<u64, EdgeData>,
    node_index: SpatialIndex,
    edge_index: SpatialIndex,
}

/// Serialisierte Form ohne Indizes
#[derive(Serialize, Deserialize)]
struct GraphRepr {
    #[serde(default)]
    nodes: Vec<NodeData>,
    #[serde(default)]
    edges: Vec<EdgeData>,
}

impl From<GraphRepr> for GraphData {
    fn from(repr: GraphRepr) -> Self {
        GraphData::from_parts(repr.nodes, repr.edges)
    }
}

impl From<GraphData> for GraphRepr {
    fn from(graph: GraphData) -> Self {
        Self {
            nodes: graph.nodes.into_values().collect(),
            edges: graph.edges.into_values().collect(),
        }
    }
}

/// Wertgleichheit über Nodes und Kanten (Reihenfolge eingeschlossen)
impl PartialEq for GraphData {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.edges.len() == other.edges.len()
            && self.nodes.iter().eq(other.nodes.iter())
            && self.edges.iter().eq(other.edges.iter())
    }
}

impl GraphData {
    /// Erstellt einen leeren Graphen
    pub fn new() -> Self {
        Self::default()
    }

    /// Baut einen Graphen aus Nodes und Kanten; die Indizes werden einmal aufgebaut.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = NodeData>,
        edges: impl IntoIterator<Item = EdgeData>,
    ) -> Self {
        let mut graph = GraphData::new();
        graph.nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
        graph.edges = edges.into_iter().map(|e| (e.id, e)).collect();
        graph.rebuild_node_index();
        graph.rebuild_edge_index();
        graph
    }

    /// Node nach ID
    pub fn node(&self, id: u64) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    /// Kante nach ID
    pub fn edge(&self, id: u64) -> Option<&EdgeData> {
        self.edges.get(&id)
    }

    /// Prüft ob ein Node existiert
    pub fn contains_node(&self, id: u64) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Prüft ob eine Kante existiert
    pub fn contains_edge(&self, id: u64) -> bool {
        self.edges.contains_key(&id)
    }

    /// Iterator über alle Nodes (Einfügereihenfolge)
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.values()
    }

    /// Iterator über alle Kanten (Einfügereihenfolge)
    pub fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.values()
    }

    /// Anzahl der Nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Anzahl der Kanten
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Leerer Graph?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Nodes im Radius um `point`, nächste zuerst, höchstens
    /// [`MAX_PROXIMITY_CANDIDATES`] Treffer.
    pub fn nodes_within_radius(&self, point: Vec2, radius: f32) -> Vec<SpatialMatch> {
        let mut matches = self.node_index.within_radius(point, radius);
        matches.truncate(MAX_PROXIMITY_CANDIDATES);
        matches
    }

    /// Nächster Node zur Position
    pub fn nearest_node(&self, point: Vec2) -> Option<SpatialMatch> {
        self.node_index.nearest(point)
    }

    /// Node-IDs, deren Mittelpunkt im Rechteck liegt
    pub fn nodes_within_rect(&self, min: Vec2, max: Vec2) -> Vec<u64> {
        self.node_index.within_rect(min, max)
    }

    /// Kanten mit einem Anker (Start, Gelenk, Ende) im Radius um `point`.
    ///
    /// Pro Kante zählt der nächste Anker; höchstens
    /// [`MAX_PROXIMITY_CANDIDATES`] Treffer.
    pub fn edges_within_radius(&self, point: Vec2, radius: f32) -> Vec<SpatialMatch> {
        let mut seen = Vec::with_capacity(MAX_PROXIMITY_CANDIDATES);
        let mut matches = Vec::with_capacity(MAX_PROXIMITY_CANDIDATES);
        for candidate in self.edge_index.within_radius(point, radius) {
            if seen.contains(&candidate.id) {
                continue;
            }
            seen.push(candidate.id);
            matches.push(candidate);
            if matches.len() == MAX_PROXIMITY_CANDIDATES {
                break;
            }
        }
        matches
    }

    /// Kanten-IDs, deren Anker im Rechteck liegen
    pub fn edges_within_rect(&self, min: Vec2, max: Vec2) -> Vec<u64> {
        self.edge_index.within_rect(min, max)
    }

    /// Kanten, die am gegebenen Node starten
    pub fn edges_with_source(&self, node_id: u64) -> Vec<&EdgeData> {
        self.edges
            .values()
            .filter(|e| e.source == Some(node_id))
            .collect()
    }

    /// Kanten, die am gegebenen Node enden
    pub fn edges_with_destination(&self, node_id: u64) -> Vec<&EdgeData> {
        self.edges
            .values()
            .filter(|e| e.destination == Some(node_id))
            .collect()
    }

    /// Kanten, die an einem der Enden mit dem Node verbunden sind
    pub fn edges_connected_to(&self, node_id: u64) -> Vec<&EdgeData> {
        self.edges
            .values()
            .filter(|e| e.touches_node(node_id))
            .collect()
    }

    /// Fügt einen Node ein oder ersetzt den mit gleicher ID
    pub fn insert_node(&mut self, node: NodeData) -> Option<NodeData> {
        let previous = self.nodes.insert(node.id, node);
        self.rebuild_node_index();
        previous
    }

    /// Fügt eine Kante ein oder ersetzt die mit gleicher ID
    pub fn insert_edge(&mut self, edge: EdgeData) -> Option<EdgeData> {
        let previous = self.edges.insert(edge.id, edge);
        self.rebuild_edge_index();
        previous
    }

    /// Entfernt einen Node. Verbundene Kanten bleiben unverändert bestehen.
    pub fn remove_node(&mut self, id: u64) -> Option<NodeData> {
        let removed = self.nodes.shift_remove(&id);
        if removed.is_some() {
            self.rebuild_node_index();
        }
        removed
    }

    /// Entfernt eine Kante
    pub fn remove_edge(&mut self, id: u64) -> Option<EdgeData> {
        let removed = self.edges.shift_remove(&id);
        if removed.is_some() {
            self.rebuild_edge_index();
        }
        removed
    }

    /// Setzt die Position eines Nodes. `false`, wenn die ID unbekannt ist.
    pub fn update_node_position(&mut self, id: u64, position: Vec2) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.position == position {
            return true;
        }
        node.position = position;
        self.rebuild_node_index();
        true
    }

    /// Ändert eine Kante in-place; der Index wird danach neu aufgebaut.
    pub fn update_edge<R>(&mut self, id: u64, f: impl FnOnce(&mut EdgeData) -> R) -> Option<R> {
        let edge = self.edges.get_mut(&id)?;
        let result = f(edge);
        self.rebuild_edge_index();
        Some(result)
    }

    /// Ändert einen Node in-place; der Index wird danach neu aufgebaut.
    pub fn update_node<R>(&mut self, id: u64, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        let node = self.nodes.get_mut(&id)?;
        let result = f(node);
        self.rebuild_node_index();
        Some(result)
    }

    /// Nächste freie Node-ID
    pub fn next_node_id(&self) -> u64 {
        self.nodes.keys().max().copied().unwrap_or(0) + 1
    }

    /// Nächste freie Kanten-ID
    pub fn next_edge_id(&self) -> u64 {
        self.edges.keys().max().copied().unwrap_or(0) + 1
    }

    fn rebuild_node_index(&mut self) {
        self.node_index = SpatialIndex::from_points(self.nodes.values().map(|n| (n.id, n.position)));
    }

    fn rebuild_edge_index(&mut self) {
        self.edge_index = SpatialIndex::from_points(
            self.edges
                .values()
                .flat_map(|e| [(e.id, e.start), (e.id, e.center), (e.id, e.end)]),
        );
    }
}

#[cfg(test)]
mod tests;
