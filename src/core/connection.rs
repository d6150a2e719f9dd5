//! Andock-Regeln für Kanten-Enden: Seitenklassifikation, Anker-Offsets und
//! Reichweite. Zustandslos; die Ansicht ruft die Regeln während eines Drags auf.

use super::ConnectionSide;
use crate::shared::EditorOptions;
use glam::Vec2;

/// Klassifiziert einen Winkel (Grad, Y nach unten) in eine Node-Seite.
///
/// `[-25, 15]` rechts, `(15, 160]` unten, `(160, 180] ∪ [-180, -160)` links,
/// `[-160, -25)` oben.
pub fn classify_angle(degrees: f32) -> ConnectionSide {
    if (-25.0..=15.0).contains(&degrees) {
        ConnectionSide::Right
    } else if degrees > 15.0 && degrees <= 160.0 {
        ConnectionSide::Bottom
    } else if (-160.0..-25.0).contains(&degrees) {
        ConnectionSide::Top
    } else {
        ConnectionSide::Left
    }
}

/// Seite, auf der `point` relativ zum Node-Mittelpunkt `origin` liegt.
pub fn classify_side(origin: Vec2, point: Vec2) -> ConnectionSide {
    let delta = point - origin;
    classify_angle(delta.y.atan2(delta.x).to_degrees())
}

/// Ergebnis einer Andock-Prüfung
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Ziel-Node
    pub node_id: u64,
    /// Seite am Ziel-Node
    pub side: ConnectionSide,
    /// Eingerasteter Ankerpunkt auf dieser Seite
    pub anchor: Vec2,
}

/// Regelsatz für Andocken und Lösen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionRules {
    half_size: Vec2,
    attach_radius: f32,
}

impl Default for ConnectionRules {
    fn default() -> Self {
        Self::from_options(&EditorOptions::default())
    }
}

impl ConnectionRules {
    /// Übernimmt Node-Größe und Andock-Rand aus den Optionen
    pub fn from_options(options: &EditorOptions) -> Self {
        Self {
            half_size: options.half_node_size(),
            attach_radius: options.attach_radius(),
        }
    }

    /// Andock-Radius um den Node-Mittelpunkt
    pub fn attach_radius(&self) -> f32 {
        self.attach_radius
    }

    /// Ankerpunkt auf der gegebenen Seite eines Nodes
    pub fn anchor_point(&self, center: Vec2, side: ConnectionSide) -> Vec2 {
        let offset = if side.is_horizontal() {
            self.half_size.x
        } else {
            self.half_size.y
        };
        center + side.outward() * offset
    }

    /// Liegt `point` im Andock-Radius des Nodes bei `center`?
    pub fn in_range(&self, center: Vec2, point: Vec2) -> bool {
        center.distance_squared(point) <= self.attach_radius * self.attach_radius
    }

    /// Andock-Ergebnis für einen bestimmten Node, unabhängig von der Reichweite.
    pub fn attachment_for(&self, node_id: u64, center: Vec2, endpoint: Vec2) -> Attachment {
        let side = classify_side(center, endpoint);
        Attachment {
            node_id,
            side,
            anchor: self.anchor_point(center, side),
        }
    }

    /// Nächster Node in Reichweite des Endpunkts.
    ///
    /// Bei gleicher Distanz gewinnt der zuerst gelieferte Kandidat.
    pub fn find_attach_target(
        &self,
        endpoint: Vec2,
        candidates: impl IntoIterator<Item = (u64, Vec2)>,
    ) -> Option<Attachment> {
        let mut best: Option<(u64, Vec2, f32)> = None;
        for (node_id, center) in candidates {
            if !self.in_range(center, endpoint) {
                continue;
            }
            let distance_sq = center.distance_squared(endpoint);
            if best.map_or(true, |(_, _, d)| distance_sq < d) {
                best = Some((node_id, center, distance_sq));
            }
        }

        best.map(|(node_id, center, _)| self.attachment_for(node_id, center, endpoint))
    }
}
