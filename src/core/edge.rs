//! Trigger-Kanten zwischen zwei Aktions-Nodes.

use super::ParamMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Seite eines Nodes, an der ein Kanten-Ende andockt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionSide {
    /// Linke Kante
    Left,
    /// Rechte Kante
    Right,
    /// Obere Kante
    Top,
    /// Untere Kante
    Bottom,
}

impl ConnectionSide {
    /// Alle Seiten in fester Reihenfolge
    pub const ALL: [ConnectionSide; 4] = [
        ConnectionSide::Left,
        ConnectionSide::Right,
        ConnectionSide::Top,
        ConnectionSide::Bottom,
    ];

    /// Textcode der Seite (Event-Payload)
    pub fn code(self) -> &'static str {
        match self {
            ConnectionSide::Left => "left",
            ConnectionSide::Right => "right",
            ConnectionSide::Top => "top",
            ConnectionSide::Bottom => "bottom",
        }
    }

    /// Parst einen Seitencode. Unbekannte Codes bedeuten "nicht angedockt".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "left" => Some(ConnectionSide::Left),
            "right" => Some(ConnectionSide::Right),
            "top" => Some(ConnectionSide::Top),
            "bottom" => Some(ConnectionSide::Bottom),
            _ => None,
        }
    }

    /// `true` für links/rechts
    pub fn is_horizontal(self) -> bool {
        matches!(self, ConnectionSide::Left | ConnectionSide::Right)
    }

    /// Einheitsvektor, der vom Node weg nach außen zeigt (Y wächst nach unten)
    pub fn outward(self) -> Vec2 {
        match self {
            ConnectionSide::Left => Vec2::NEG_X,
            ConnectionSide::Right => Vec2::X,
            ConnectionSide::Top => Vec2::NEG_Y,
            ConnectionSide::Bottom => Vec2::Y,
        }
    }
}

/// Ende einer Kante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeEnd {
    /// Quell-Ende (Start der Kurve)
    Source,
    /// Ziel-Ende (Pfeilspitze)
    Destination,
}

/// Die drei Ankerpunkte einer Kante: Start, Gelenk, Ende
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAnchors {
    /// Startpunkt
    pub start: Vec2,
    /// Gelenkpunkt zwischen den beiden Teilkurven
    pub center: Vec2,
    /// Endpunkt
    pub end: Vec2,
}

impl EdgeAnchors {
    /// Verschiebt alle drei Anker um denselben Offset
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            start: self.start + delta,
            center: self.center + delta,
            end: self.end + delta,
        }
    }
}

/// Ein Trigger-Eintrag auf einer Kante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEntry {
    /// Katalog-Schlüssel des Triggertyps
    pub trigger_type_id: String,
    /// Parameter des Triggers
    #[serde(default)]
    pub params: ParamMap,
    /// Position innerhalb der Kante
    pub index: usize,
}

impl TriggerEntry {
    /// Erstellt einen Trigger ohne Parameter
    pub fn new(trigger_type_id: impl Into<String>, index: usize) -> Self {
        Self {
            trigger_type_id: trigger_type_id.into(),
            params: ParamMap::new(),
            index,
        }
    }
}

/// Eine gerichtete Trigger-Kante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Eindeutige Kanten-ID
    pub id: u64,
    /// Geordnete Trigger-Kette
    pub triggers: Vec<TriggerEntry>,
    /// Quell-Node (None = loses Startende)
    pub source: Option<u64>,
    /// Ziel-Node (None = loses Zielende)
    pub destination: Option<u64>,
    /// Startpunkt
    pub start: Vec2,
    /// Gelenkpunkt
    pub center: Vec2,
    /// Endpunkt
    pub end: Vec2,
    /// Andock-Seite am Quell-Node
    pub source_side: Option<ConnectionSide>,
    /// Andock-Seite am Ziel-Node
    pub destination_side: Option<ConnectionSide>,
}

impl EdgeData {
    /// Erstellt eine lose Kante zwischen zwei Punkten, Gelenk in der Mitte
    pub fn dangling(id: u64, start: Vec2, end: Vec2) -> Self {
        Self {
            id,
            triggers: Vec::new(),
            source: None,
            destination: None,
            start,
            center: (start + end) * 0.5,
            end,
            source_side: None,
            destination_side: None,
        }
    }

    /// Builder: hängt einen Trigger an (Index = bisherige Länge)
    pub fn with_trigger(mut self, trigger_type_id: impl Into<String>) -> Self {
        let index = self.triggers.len();
        self.triggers.push(TriggerEntry::new(trigger_type_id, index));
        self
    }

    /// Builder: dockt das Quell-Ende an
    pub fn with_source(mut self, node_id: u64, side: ConnectionSide) -> Self {
        self.source = Some(node_id);
        self.source_side = Some(side);
        self
    }

    /// Builder: dockt das Ziel-Ende an
    pub fn with_destination(mut self, node_id: u64, side: ConnectionSide) -> Self {
        self.destination = Some(node_id);
        self.destination_side = Some(side);
        self
    }

    /// Aktuelle Ankerpunkte
    pub fn anchors(&self) -> EdgeAnchors {
        EdgeAnchors {
            start: self.start,
            center: self.center,
            end: self.end,
        }
    }

    /// Übernimmt neue Ankerpunkte
    pub fn set_anchors(&mut self, anchors: EdgeAnchors) {
        self.start = anchors.start;
        self.center = anchors.center;
        self.end = anchors.end;
    }

    /// Node-ID des gegebenen Endes
    pub fn node_at(&self, end: EdgeEnd) -> Option<u64> {
        match end {
            EdgeEnd::Source => self.source,
            EdgeEnd::Destination => self.destination,
        }
    }

    /// Andock-Seite des gegebenen Endes
    pub fn side_at(&self, end: EdgeEnd) -> Option<ConnectionSide> {
        match end {
            EdgeEnd::Source => self.source_side,
            EdgeEnd::Destination => self.destination_side,
        }
    }

    /// Koordinate des gegebenen Endes
    pub fn point_at(&self, end: EdgeEnd) -> Vec2 {
        match end {
            EdgeEnd::Source => self.start,
            EdgeEnd::Destination => self.end,
        }
    }

    /// Setzt Verbindung (Node + Seite) eines Endes; die Koordinate bleibt unberührt
    pub fn set_connection(
        &mut self,
        end: EdgeEnd,
        node_id: Option<u64>,
        side: Option<ConnectionSide>,
    ) {
        match end {
            EdgeEnd::Source => {
                self.source = node_id;
                self.source_side = side;
            }
            EdgeEnd::Destination => {
                self.destination = node_id;
                self.destination_side = side;
            }
        }
    }

    /// Setzt die Koordinate eines Endes
    pub fn set_point(&mut self, end: EdgeEnd, point: Vec2) {
        match end {
            EdgeEnd::Source => self.start = point,
            EdgeEnd::Destination => self.end = point,
        }
    }

    /// Prüft ob die Kante an einem der Enden mit dem Node verbunden ist
    pub fn touches_node(&self, node_id: u64) -> bool {
        self.source == Some(node_id) || self.destination == Some(node_id)
    }

    /// Nummeriert die Trigger lückenlos neu (nach Entfernen/Zusammenführen)
    pub fn reindex_triggers(&mut self) {
        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            trigger.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_codes_roundtrip_and_unknown_is_unattached() {
        for side in ConnectionSide::ALL {
            assert_eq!(ConnectionSide::from_code(side.code()), Some(side));
        }
        assert_eq!(ConnectionSide::from_code("diagonal"), None);
        assert_eq!(ConnectionSide::from_code(""), None);
    }

    #[test]
    fn reindex_closes_gaps() {
        let mut edge = EdgeData::dangling(1, Vec2::ZERO, Vec2::new(10.0, 0.0))
            .with_trigger("a")
            .with_trigger("b")
            .with_trigger("c");
        edge.triggers.remove(1);
        edge.reindex_triggers();

        let indices: Vec<usize> = edge.triggers.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(edge.triggers[1].trigger_type_id, "c");
    }

    #[test]
    fn dangling_edge_has_center_between_ends() {
        let edge = EdgeData::dangling(7, Vec2::new(0.0, 0.0), Vec2::new(100.0, 40.0));
        assert_eq!(edge.center, Vec2::new(50.0, 20.0));
        assert!(edge.source.is_none() && edge.destination.is_none());
    }
}
