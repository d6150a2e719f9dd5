//! Struktureller Vergleich zweier Graph-Snapshots.
//!
//! Der Diff treibt ausschließlich den Abgleich der Ansicht und verändert
//! keinen der beiden Snapshots.

use super::GraphData;
use crate::core::{EdgeData, NodeData};

/// Art einer Änderung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Entity ist neu
    Addition,
    /// Gleiche ID, mindestens ein Feld anders
    Update,
    /// Entity existiert nicht mehr
    Deletion,
}

/// Betroffene Entity (bei Löschungen der alte Stand, sonst der neue)
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntity {
    /// Aktions-Node
    Node(NodeData),
    /// Trigger-Kante
    Edge(EdgeData),
}

impl DiffEntity {
    /// ID der Entity (Namensraum hängt von der Variante ab)
    pub fn id(&self) -> u64 {
        match self {
            DiffEntity::Node(node) => node.id,
            DiffEntity::Edge(edge) => edge.id,
        }
    }
}

/// Ein Eintrag des Diffs
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    /// Art der Änderung
    pub kind: DiffKind,
    /// Betroffene Entity
    pub entity: DiffEntity,
}

/// Geordnete Liste von Änderungen.
///
/// Reihenfolge: Löschungen (Kanten, dann Nodes), Updates (Nodes, dann Kanten),
/// Hinzufügungen (Nodes, dann Kanten).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDiff {
    entries: Vec<DiffEntry>,
}

impl GraphDiff {
    /// Alle Einträge in Abarbeitungsreihenfolge
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Iterator über alle Einträge
    pub fn iter(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter()
    }

    /// Anzahl der Einträge
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keine Änderungen?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node-Einträge als (Art, Node)
    pub fn node_entries(&self) -> impl Iterator<Item = (DiffKind, &NodeData)> {
        self.entries.iter().filter_map(|e| match &e.entity {
            DiffEntity::Node(node) => Some((e.kind, node)),
            DiffEntity::Edge(_) => None,
        })
    }

    /// Kanten-Einträge als (Art, Kante)
    pub fn edge_entries(&self) -> impl Iterator<Item = (DiffKind, &EdgeData)> {
        self.entries.iter().filter_map(|e| match &e.entity {
            DiffEntity::Edge(edge) => Some((e.kind, edge)),
            DiffEntity::Node(_) => None,
        })
    }

    /// Anzahl der Einträge einer Art
    pub fn count(&self, kind: DiffKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

impl IntoIterator for GraphDiff {
    type Item = DiffEntry;
    type IntoIter = std::vec::IntoIter<DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl GraphData {
    /// Vergleicht diesen Snapshot mit `previous`.
    ///
    /// Update heißt: gleiche ID, aber Wertungleichheit in irgendeinem Feld
    /// (Position, Parameter, Verbindung, Trigger-Liste).
    pub fn diff(&self, previous: &GraphData) -> GraphDiff {
        let mut entries = Vec::new();

        let deleted_edges = previous.edges().filter(|e| !self.contains_edge(e.id));
        entries.extend(deleted_edges.map(|e| DiffEntry {
            kind: DiffKind::Deletion,
            entity: DiffEntity::Edge(e.clone()),
        }));
        let deleted_nodes = previous.nodes().filter(|n| !self.contains_node(n.id));
        entries.extend(deleted_nodes.map(|n| DiffEntry {
            kind: DiffKind::Deletion,
            entity: DiffEntity::Node(n.clone()),
        }));

        let updated_nodes = self
            .nodes()
            .filter(|n| previous.node(n.id).is_some_and(|old| old != *n));
        entries.extend(updated_nodes.map(|n| DiffEntry {
            kind: DiffKind::Update,
            entity: DiffEntity::Node(n.clone()),
        }));
        let updated_edges = self
            .edges()
            .filter(|e| previous.edge(e.id).is_some_and(|old| old != *e));
        entries.extend(updated_edges.map(|e| DiffEntry {
            kind: DiffKind::Update,
            entity: DiffEntity::Edge(e.clone()),
        }));

        let added_nodes = self.nodes().filter(|n| !previous.contains_node(n.id));
        entries.extend(added_nodes.map(|n| DiffEntry {
            kind: DiffKind::Addition,
            entity: DiffEntity::Node(n.clone()),
        }));
        let added_edges = self.edges().filter(|e| !previous.contains_edge(e.id));
        entries.extend(added_edges.map(|e| DiffEntry {
            kind: DiffKind::Addition,
            entity: DiffEntity::Edge(e.clone()),
        }));

        GraphDiff { entries }
    }
}
