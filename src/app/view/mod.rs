//! Interaktive Ansicht des Automations-Graphen.
//!
//! Die Ansicht hält eine Arbeitskopie jeder Entity plus ihr Drawable.
//! Gesten ändern nur diese Arbeitskopie und melden das Ergebnis als
//! [`ViewEvent`]; kanonisch wird ein Stand erst, wenn der Controller einen
//! neuen Snapshot liefert und [`GraphView::reconcile`] ihn einarbeitet.

mod edge_view;
mod gesture;
mod group;
mod loading;
mod node_view;
mod reconcile;

pub use edge_view::EdgeView;
pub use loading::AssetRequest;
pub use node_view::NodeView;

use crate::app::assets::{AssetCache, AssetKey, AssetKind};
use crate::app::events::{
    ActionUpdate, EdgeConnection, EdgeRemove, EventBus, NodeRemove, NodeSelected,
    ObjectDeselected, TriggerRemove, TriggerUpdate, ViewEvent,
};
use crate::app::{EventLog, SelectionState};
use crate::core::{Catalog, ConnectionRules, EdgeData, EdgeEnd, GraphData, NodeData, ParamMap};
use crate::render::{DrawableFactory, DrawableId, Highlight};
use crate::shared::EditorOptions;
use glam::Vec2;
use indexmap::IndexMap;
use std::sync::Arc;

const ENDS: [EdgeEnd; 2] = [EdgeEnd::Source, EdgeEnd::Destination];

/// Getroffener Teil einer Kante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgePart {
    /// Linie (verschiebt die ganze Kurve)
    Line,
    /// Gelenk-Griff
    Center,
    /// Griff am Startende
    Start,
    /// Griff am Zielende
    End,
}

impl EdgePart {
    /// Enden, deren Koordinate sich beim Ziehen dieses Teils ändert
    pub fn moved_ends(self) -> &'static [EdgeEnd] {
        match self {
            EdgePart::Line => &ENDS,
            EdgePart::Center => &[],
            EdgePart::Start => &[EdgeEnd::Source],
            EdgePart::End => &[EdgeEnd::Destination],
        }
    }
}

/// Ergebnis eines Treffertests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// Node-Rechteck
    Node(u64),
    /// Kante oder einer ihrer Griffe
    Edge {
        /// Kanten-ID
        id: u64,
        /// Getroffener Teil
        part: EdgePart,
    },
}

/// Interaktive Ansicht
pub struct GraphView {
    options: EditorOptions,
    rules: ConnectionRules,
    catalog: Arc<dyn Catalog>,
    assets: Arc<AssetCache>,
    factory: Box<dyn DrawableFactory>,
    nodes: IndexMap<u64, NodeView>,
    edges: IndexMap<u64, EdgeView>,
    selection: SelectionState,
    drag: Option<gesture::DragState>,
    bus: EventBus,
}

impl GraphView {
    /// Erstellt eine leere Ansicht. Inhalte kommen über [`GraphView::reconcile`].
    pub fn new(
        options: EditorOptions,
        catalog: Arc<dyn Catalog>,
        assets: Arc<AssetCache>,
        factory: Box<dyn DrawableFactory>,
    ) -> Self {
        Self {
            rules: ConnectionRules::from_options(&options),
            bus: EventBus::new(options.event_log_limit),
            options,
            catalog,
            assets,
            factory,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            selection: SelectionState::new(),
            drag: None,
        }
    }

    /// Aktive Optionen
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Node-Darstellung nach ID
    pub fn node(&self, id: u64) -> Option<&NodeView> {
        self.nodes.get(&id)
    }

    /// Kanten-Darstellung nach ID
    pub fn edge(&self, id: u64) -> Option<&EdgeView> {
        self.edges.get(&id)
    }

    /// Alle Node-Darstellungen in Zeichenreihenfolge
    pub fn nodes(&self) -> impl Iterator<Item = &NodeView> {
        self.nodes.values()
    }

    /// Alle Kanten-Darstellungen in Zeichenreihenfolge
    pub fn edges(&self) -> impl Iterator<Item = &EdgeView> {
        self.edges.values()
    }

    /// Aktuelle Selektion
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Event-Bus zum Registrieren von Handlern
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Begrenzter Verlauf aller ausgelösten Events
    pub fn event_log(&self) -> &EventLog {
        self.bus.log()
    }

    /// Holt die seit dem letzten Aufruf ausgelösten Events ab
    pub fn take_emitted(&mut self) -> Vec<ViewEvent> {
        self.bus.take_emitted()
    }

    /// Läuft gerade eine Ziehgeste?
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Der aktuell angezeigte Stand als Graph (inklusive nicht übernommener Gesten)
    pub fn displayed_graph(&self) -> GraphData {
        GraphData::from_parts(
            self.nodes.values().map(|v| v.data().clone()),
            self.edges.values().map(|v| v.data().clone()),
        )
    }

    /// Treffertest: Griffe vor Nodes vor Linien, jeweils die oberste Entity zuerst.
    pub fn pick(&self, point: Vec2) -> Option<PickTarget> {
        let radius = self.options.handle_pick_radius;
        for edge in self.edges.values().rev() {
            let data = edge.data();
            let handles = [
                (EdgePart::Start, data.start),
                (EdgePart::End, data.end),
                (EdgePart::Center, data.center),
            ];
            if let Some((part, _)) = handles
                .into_iter()
                .find(|(_, p)| p.distance(point) <= radius)
            {
                return Some(PickTarget::Edge { id: edge.id(), part });
            }
        }

        let half = self.options.half_node_size();
        if let Some(node) = self.nodes.values().rev().find(|n| n.contains(point, half)) {
            return Some(PickTarget::Node(node.id()));
        }

        self.edges
            .values()
            .rev()
            .find(|e| e.curve().distance_to(point) <= self.options.line_pick_tolerance)
            .map(|e| PickTarget::Edge {
                id: e.id(),
                part: EdgePart::Line,
            })
    }

    /// Reagiert die getroffene Entity auf Gesten?
    pub fn is_interactive(&self, target: PickTarget) -> bool {
        match target {
            PickTarget::Node(id) => self.nodes.get(&id).is_some_and(NodeView::is_interactive),
            PickTarget::Edge { id, .. } => {
                self.edges.get(&id).is_some_and(EdgeView::is_interactive)
            }
        }
    }

    /// Klick auf eine Entity; `additive` schaltet sie in der Auswahl um.
    pub fn click(&mut self, target: PickTarget, additive: bool) {
        if !self.is_interactive(target) {
            log::debug!("Klick auf nicht-interaktive Entity ignoriert: {:?}", target);
            return;
        }

        match target {
            PickTarget::Node(id) => {
                if additive {
                    self.selection.toggle_node(id);
                } else {
                    self.selection.select_node(id, false);
                }
                if self.selection.contains_node(id) {
                    self.bus.emit(ViewEvent::NodeSelected(NodeSelected { id }));
                }
            }
            PickTarget::Edge { id, .. } => {
                if additive {
                    self.selection.toggle_edge(id);
                } else {
                    self.selection.select_edge(id, false);
                }
            }
        }
        self.refresh_highlights();
    }

    /// Klick ins Leere hebt die Selektion auf.
    pub fn click_empty(&mut self) {
        self.selection.clear();
        self.refresh_highlights();
        self.bus.emit(ViewEvent::ObjectDeselected(ObjectDeselected));
    }

    /// Rechteck-Selektion: Nodes mit Mittelpunkt im Rechteck, Kanten mit beiden Enden darin.
    pub fn select_in_rect(&mut self, corner_a: Vec2, corner_b: Vec2, additive: bool) {
        let min = corner_a.min(corner_b);
        let max = corner_a.max(corner_b);
        let inside = |p: Vec2| p.cmpge(min).all() && p.cmple(max).all();

        if !additive {
            self.selection.clear();
        }
        for node in self.nodes.values().filter(|n| n.is_interactive()) {
            if inside(node.position()) {
                self.selection.node_ids.insert(node.id());
            }
        }
        for edge in self.edges.values().filter(|e| e.is_interactive()) {
            if inside(edge.data().start) && inside(edge.data().end) {
                self.selection.edge_ids.insert(edge.id());
            }
        }
        log::debug!("Rechteck-Selektion: {} Entities", self.selection.len());
        self.refresh_highlights();
    }

    /// Löscht die Selektion: Kanten direkt, Nodes nach dem Lösen aller
    /// verbleibenden Kanten-Enden.
    pub fn delete_selected(&mut self) {
        let edge_ids: Vec<u64> = self
            .selection
            .edge_ids
            .iter()
            .copied()
            .filter(|id| self.edges.get(id).is_some_and(EdgeView::is_interactive))
            .collect();
        let node_ids: Vec<u64> = self
            .selection
            .node_ids
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(NodeView::is_interactive))
            .collect();

        for &id in &edge_ids {
            self.bus.emit(ViewEvent::EdgeRemove(EdgeRemove { id }));
        }
        for &id in &node_ids {
            for (edge_id, end) in self.attached_ends(id) {
                if !edge_ids.contains(&edge_id) {
                    self.emit_disconnect(edge_id, end);
                }
            }
            self.bus.emit(ViewEvent::NodeRemove(NodeRemove { id }));
        }

        log::info!(
            "{} Kanten und {} Nodes zum Löschen gemeldet",
            edge_ids.len(),
            node_ids.len()
        );
        self.selection.clear();
        self.refresh_highlights();
    }

    /// Meldet neue Parameter eines Triggers
    pub fn update_trigger(&mut self, edge_id: u64, trigger_index: usize, value: ParamMap) -> bool {
        if !self.has_trigger(edge_id, trigger_index) {
            return false;
        }
        self.bus.emit(ViewEvent::TriggerUpdate(TriggerUpdate {
            edge_id,
            trigger_index,
            value,
        }));
        true
    }

    /// Meldet das Entfernen eines Triggers; die Kante bleibt bestehen.
    pub fn remove_trigger(&mut self, edge_id: u64, trigger_index: usize) -> bool {
        if !self.has_trigger(edge_id, trigger_index) {
            return false;
        }
        self.bus.emit(ViewEvent::TriggerRemove(TriggerRemove {
            edge_id,
            trigger_index,
        }));
        true
    }

    /// Meldet neue Parameter einer Aktion
    pub fn update_action(&mut self, node_id: u64, value: ParamMap) -> bool {
        if !self.nodes.contains_key(&node_id) {
            log::warn!("Aktion für unbekannten Node {} ignoriert", node_id);
            return false;
        }
        self.bus
            .emit(ViewEvent::ActionUpdate(ActionUpdate { node_id, value }));
        true
    }

    fn has_trigger(&self, edge_id: u64, trigger_index: usize) -> bool {
        let found = self
            .edges
            .get(&edge_id)
            .is_some_and(|e| trigger_index < e.data().triggers.len());
        if !found {
            log::warn!("Trigger {} auf Kante {} existiert nicht", trigger_index, edge_id);
        }
        found
    }

    /// Alle Kanten-Enden, die am Node hängen
    fn attached_ends(&self, node_id: u64) -> Vec<(u64, EdgeEnd)> {
        let mut ends = Vec::new();
        for edge in self.edges.values() {
            for end in ENDS {
                if edge.data().node_at(end) == Some(node_id) {
                    ends.push((edge.id(), end));
                }
            }
        }
        ends
    }

    fn connection_payload(&self, edge_id: u64, end: EdgeEnd, connected: bool) -> Option<EdgeConnection> {
        let data = self.edges.get(&edge_id)?.data();
        let (node_id, side) = if connected {
            (data.node_at(end), data.side_at(end))
        } else {
            (None, None)
        };
        Some(EdgeConnection {
            id: edge_id,
            anchors: data.anchors(),
            node_id,
            side,
        })
    }

    fn emit_for_end(&mut self, end: EdgeEnd, payload: EdgeConnection) {
        let event = match end {
            EdgeEnd::Source => ViewEvent::EdgeConnectionSrc(payload),
            EdgeEnd::Destination => ViewEvent::EdgeConnectionDst(payload),
        };
        self.bus.emit(event);
    }

    /// Meldet den aktuellen Verbindungszustand eines Endes
    fn emit_connection(&mut self, edge_id: u64, end: EdgeEnd) {
        if let Some(payload) = self.connection_payload(edge_id, end, true) {
            self.emit_for_end(end, payload);
        }
    }

    /// Meldet ein gelöstes Ende, ohne die Arbeitskopie zu ändern
    fn emit_disconnect(&mut self, edge_id: u64, end: EdgeEnd) {
        if let Some(payload) = self.connection_payload(edge_id, end, false) {
            self.emit_for_end(end, payload);
        }
    }

    fn base_highlight(&self, id: DrawableId) -> Highlight {
        let selected = match id {
            DrawableId::Node(id) => self.selection.contains_node(id),
            DrawableId::Edge(id) => self.selection.contains_edge(id),
        };
        if selected {
            Highlight::Selected
        } else {
            Highlight::None
        }
    }

    fn set_highlight(&mut self, id: DrawableId, highlight: Highlight) {
        match id {
            DrawableId::Node(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_highlight(highlight);
                }
            }
            DrawableId::Edge(id) => {
                if let Some(edge) = self.edges.get_mut(&id) {
                    edge.set_highlight(highlight);
                }
            }
        }
    }

    /// Setzt alle Hervorhebungen auf den Selektionszustand zurück
    fn refresh_highlights(&mut self) {
        let ids: Vec<DrawableId> = self
            .nodes
            .keys()
            .map(|&id| DrawableId::Node(id))
            .chain(self.edges.keys().map(|&id| DrawableId::Edge(id)))
            .collect();
        for id in ids {
            let highlight = self.base_highlight(id);
            self.set_highlight(id, highlight);
        }
    }

    fn build_node_view(&mut self, data: NodeData) -> NodeView {
        let entry = self.catalog.action(&data.action_type_id);
        if entry.is_none() {
            log::warn!(
                "Unbekannter Aktionstyp '{}' (Node {})",
                data.action_type_id,
                data.id
            );
        }
        let keys: Vec<AssetKey> = entry
            .filter(|e| e.icon.is_some())
            .map(|e| AssetKey::action(e.id.clone()))
            .into_iter()
            .collect();

        let drawable = self.factory.create_node(&data);
        NodeView::new(data, drawable, keys, &self.assets)
    }

    fn build_edge_view(&mut self, data: EdgeData) -> EdgeView {
        let mut keys = Vec::new();
        let mut lines = Vec::with_capacity(data.triggers.len());
        for trigger in &data.triggers {
            match self.catalog.trigger(&trigger.trigger_type_id) {
                Some(entry) => {
                    lines.push(entry.display_text(&trigger.params));
                    if entry.icon.is_some() {
                        keys.push(AssetKey::trigger(entry.id.clone()));
                    }
                }
                None => {
                    log::warn!(
                        "Unbekannter Triggertyp '{}' (Kante {})",
                        trigger.trigger_type_id,
                        data.id
                    );
                    lines.push(trigger.trigger_type_id.clone());
                }
            }
        }
        let drawable = self.factory.create_edge(&data);
        EdgeView::new(
            data,
            drawable,
            keys,
            &self.assets,
            lines,
            self.options.label_offset,
        )
    }

    fn icon_path(&self, key: &AssetKey) -> Option<String> {
        let entry = match key.kind {
            AssetKind::Action => self.catalog.action(&key.type_id),
            AssetKind::Trigger => self.catalog.trigger(&key.type_id),
        };
        entry.and_then(|e| e.icon.clone())
    }
}
