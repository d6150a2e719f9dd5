//! Payloads des Event-Vokabulars der Ansicht.

use crate::core::{ConnectionSide, EdgeAnchors, ParamMap};
use glam::Vec2;

/// `node:selected`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSelected {
    /// Selektierter Node
    pub id: u64,
}

/// `node:move`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMove {
    /// Bewegter Node
    pub id: u64,
    /// Neuer Mittelpunkt
    pub position: Vec2,
}

/// `node:remove`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRemove {
    /// Zu löschender Node
    pub id: u64,
}

/// `edge:move`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMove {
    /// Bewegte Kante
    pub id: u64,
    /// Neue Anker (Start, Gelenk, Ende)
    pub anchors: EdgeAnchors,
}

/// `edge:connectionSrc` bzw. `edge:connectionDst`.
///
/// `node_id == None` bedeutet: das Ende wurde gelöst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeConnection {
    /// Betroffene Kante
    pub id: u64,
    /// Anker nach der Änderung
    pub anchors: EdgeAnchors,
    /// Node am betroffenen Ende
    pub node_id: Option<u64>,
    /// Seite am betroffenen Ende
    pub side: Option<ConnectionSide>,
}

impl EdgeConnection {
    /// Seitencode für den Payload (`None` = nicht angedockt)
    pub fn side_code(&self) -> Option<&'static str> {
        self.side.map(ConnectionSide::code)
    }
}

/// `edge:combine`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCombine {
    /// Kante, die aufgelöst wird
    pub removed: u64,
    /// Kante, die deren Trigger übernimmt
    pub kept: u64,
}

/// `edge:remove`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRemove {
    /// Zu löschende Kante
    pub id: u64,
}

/// `trigger:update`
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerUpdate {
    /// Kante des Triggers
    pub edge_id: u64,
    /// Position des Triggers in der Kante
    pub trigger_index: usize,
    /// Neue Parameter
    pub value: ParamMap,
}

/// `trigger:remove`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRemove {
    /// Kante des Triggers
    pub edge_id: u64,
    /// Position des Triggers in der Kante
    pub trigger_index: usize,
}

/// `action:update`
#[derive(Debug, Clone, PartialEq)]
pub struct ActionUpdate {
    /// Betroffener Node
    pub node_id: u64,
    /// Neue Parameter
    pub value: ParamMap,
}

/// `object:deselected`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectDeselected;

/// Art eines Events (ein Kanal pro Art)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `node:selected`
    NodeSelected,
    /// `node:move`
    NodeMove,
    /// `node:remove`
    NodeRemove,
    /// `edge:move`
    EdgeMove,
    /// `edge:connectionSrc`
    EdgeConnectionSrc,
    /// `edge:connectionDst`
    EdgeConnectionDst,
    /// `edge:combine`
    EdgeCombine,
    /// `edge:remove`
    EdgeRemove,
    /// `trigger:update`
    TriggerUpdate,
    /// `trigger:remove`
    TriggerRemove,
    /// `action:update`
    ActionUpdate,
    /// `object:deselected`
    ObjectDeselected,
}

impl EventKind {
    /// Name im Event-Vokabular
    pub fn name(self) -> &'static str {
        match self {
            EventKind::NodeSelected => "node:selected",
            EventKind::NodeMove => "node:move",
            EventKind::NodeRemove => "node:remove",
            EventKind::EdgeMove => "edge:move",
            EventKind::EdgeConnectionSrc => "edge:connectionSrc",
            EventKind::EdgeConnectionDst => "edge:connectionDst",
            EventKind::EdgeCombine => "edge:combine",
            EventKind::EdgeRemove => "edge:remove",
            EventKind::TriggerUpdate => "trigger:update",
            EventKind::TriggerRemove => "trigger:remove",
            EventKind::ActionUpdate => "action:update",
            EventKind::ObjectDeselected => "object:deselected",
        }
    }
}

/// Ein von der Ansicht ausgelöstes Domain-Event
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Node wurde angeklickt
    NodeSelected(NodeSelected),
    /// Node wurde verschoben
    NodeMove(NodeMove),
    /// Node soll gelöscht werden
    NodeRemove(NodeRemove),
    /// Kante wurde verschoben, Verbindungen unverändert
    EdgeMove(EdgeMove),
    /// Quell-Ende an- oder abgedockt
    EdgeConnectionSrc(EdgeConnection),
    /// Ziel-Ende an- oder abgedockt
    EdgeConnectionDst(EdgeConnection),
    /// Kante in eine andere überführen
    EdgeCombine(EdgeCombine),
    /// Kante soll gelöscht werden
    EdgeRemove(EdgeRemove),
    /// Trigger-Parameter geändert
    TriggerUpdate(TriggerUpdate),
    /// Trigger entfernt
    TriggerRemove(TriggerRemove),
    /// Aktions-Parameter geändert
    ActionUpdate(ActionUpdate),
    /// Selektion aufgehoben
    ObjectDeselected(ObjectDeselected),
}

impl ViewEvent {
    /// Art des Events
    pub fn kind(&self) -> EventKind {
        match self {
            ViewEvent::NodeSelected(_) => EventKind::NodeSelected,
            ViewEvent::NodeMove(_) => EventKind::NodeMove,
            ViewEvent::NodeRemove(_) => EventKind::NodeRemove,
            ViewEvent::EdgeMove(_) => EventKind::EdgeMove,
            ViewEvent::EdgeConnectionSrc(_) => EventKind::EdgeConnectionSrc,
            ViewEvent::EdgeConnectionDst(_) => EventKind::EdgeConnectionDst,
            ViewEvent::EdgeCombine(_) => EventKind::EdgeCombine,
            ViewEvent::EdgeRemove(_) => EventKind::EdgeRemove,
            ViewEvent::TriggerUpdate(_) => EventKind::TriggerUpdate,
            ViewEvent::TriggerRemove(_) => EventKind::TriggerRemove,
            ViewEvent::ActionUpdate(_) => EventKind::ActionUpdate,
            ViewEvent::ObjectDeselected(_) => EventKind::ObjectDeselected,
        }
    }

    /// Name im Event-Vokabular
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Liefert die Verbindungsänderung, falls es ein Src/Dst-Event ist
    pub fn as_connection(&self) -> Option<&EdgeConnection> {
        match self {
            ViewEvent::EdgeConnectionSrc(c) | ViewEvent::EdgeConnectionDst(c) => Some(c),
            _ => None,
        }
    }
}
