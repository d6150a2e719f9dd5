//! Ziehgesten auf einzelnen Nodes und Kanten.
//!
//! Während der Bewegung ändert sich nur die Arbeitskopie; Andock- und
//! Zusammenführ-Ziele werden lediglich hervorgehoben. Erst beim Loslassen
//! werden Verbindungen aufgelöst und Events gemeldet.

use super::{EdgePart, GraphView, PickTarget, ENDS};
use crate::app::events::{EdgeCombine, EdgeMove, NodeMove, ViewEvent};
use crate::core::{Attachment, EdgeEnd, GraphData};
use crate::render::{DrawableId, Highlight};
use glam::Vec2;

#[derive(Debug, Clone)]
pub(super) enum DragMode {
    Node {
        id: u64,
        attached: Vec<(u64, EdgeEnd)>,
    },
    Edge {
        id: u64,
        part: EdgePart,
    },
    Group {
        nodes: Vec<u64>,
        edges: Vec<u64>,
        /// (Kante, Ende, Node) für alle Enden an selektierten Nodes
        attached: Vec<(u64, EdgeEnd, u64)>,
    },
}

pub(super) struct DragState {
    mode: DragMode,
    origin: Vec2,
    last: Vec2,
    moved: bool,
    /// Angezeigter Stand bei Gestenbeginn (für Proximity-Abfragen)
    scene: GraphData,
    pub(super) previews: Vec<(DrawableId, Highlight)>,
}

impl GraphView {
    /// Beginnt eine Ziehgeste. Liefert `false`, wenn das Ziel nicht reagiert.
    pub fn begin_drag(&mut self, target: PickTarget, point: Vec2) -> bool {
        if !self.is_interactive(target) {
            log::debug!("Geste auf nicht-interaktiver Entity ignoriert: {:?}", target);
            return false;
        }
        if let Some(previous) = self.drag.take() {
            log::warn!("Neue Geste vor Ende der vorherigen; alte Vorschau verworfen");
            self.clear_previews(&previous.previews);
        }

        let in_selection = match target {
            PickTarget::Node(id) => self.selection.contains_node(id),
            PickTarget::Edge { id, .. } => self.selection.contains_edge(id),
        };

        let mode = if in_selection && self.selection.is_group() {
            let nodes: Vec<u64> = self
                .selection
                .node_ids
                .iter()
                .copied()
                .filter(|&id| self.is_interactive(PickTarget::Node(id)))
                .collect();
            let edges: Vec<u64> = self
                .selection
                .edge_ids
                .iter()
                .copied()
                .filter(|&id| {
                    self.is_interactive(PickTarget::Edge {
                        id,
                        part: EdgePart::Line,
                    })
                })
                .collect();
            let attached = nodes
                .iter()
                .flat_map(|&node_id| {
                    self.attached_ends(node_id)
                        .into_iter()
                        .map(move |(edge_id, end)| (edge_id, end, node_id))
                })
                .collect();
            log::debug!(
                "Gruppen-Geste: {} Nodes, {} Kanten",
                nodes.len(),
                edges.len()
            );
            DragMode::Group {
                nodes,
                edges,
                attached,
            }
        } else {
            match target {
                PickTarget::Node(id) => DragMode::Node {
                    id,
                    attached: self.attached_ends(id),
                },
                PickTarget::Edge { id, part } => DragMode::Edge { id, part },
            }
        };

        self.drag = Some(DragState {
            mode,
            origin: point,
            last: point,
            moved: false,
            scene: self.displayed_graph(),
            previews: Vec::new(),
        });
        true
    }

    /// Bewegt die laufende Geste zum Punkt (Delta zum letzten Schritt).
    pub fn drag_to(&mut self, point: Vec2) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        if !drag.moved && drag.origin.distance(point) < self.options.drag_threshold {
            self.drag = Some(drag);
            return;
        }

        let delta = point - drag.last;
        drag.last = point;
        drag.moved = true;
        self.clear_previews(&drag.previews);

        let previews = match &drag.mode {
            DragMode::Node { id, .. } => {
                self.step_node(*id, delta);
                self.node_attach_previews(*id, &drag.scene, &[])
            }
            DragMode::Edge { id, part } => {
                self.step_edge(*id, *part, delta);
                self.edge_previews(*id, *part, &drag.scene)
            }
            DragMode::Group { nodes, edges, .. } => {
                self.step_group(nodes, edges, delta);
                nodes
                    .iter()
                    .flat_map(|&id| self.node_attach_previews(id, &drag.scene, edges))
                    .collect()
            }
        };
        self.apply_previews(&previews);
        drag.previews = previews;
        self.drag = Some(drag);
    }

    /// Beendet die Geste und meldet das Ergebnis. Ohne Bewegung kein Event.
    pub fn end_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.clear_previews(&drag.previews);
        if !drag.moved {
            log::debug!("Geste ohne Bewegung beendet");
            return;
        }

        match &drag.mode {
            DragMode::Node { id, attached } => self.release_node(*id, attached, &drag.scene),
            DragMode::Edge { id, part } => self.release_edge(*id, *part, &drag.scene),
            DragMode::Group {
                nodes,
                edges,
                attached,
            } => self.release_group(nodes, edges, attached, &drag.scene),
        }
        self.refresh_highlights();
    }

    /// Verschiebt den Node und alle an ihm hängenden Kanten-Enden um `delta`.
    fn step_node(&mut self, id: u64, delta: Vec2) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.translate(delta);
        for (edge_id, end) in self.attached_ends(id) {
            if let Some(edge) = self.edges.get_mut(&edge_id) {
                edge.translate_end(end, delta);
            }
        }
    }

    fn step_edge(&mut self, id: u64, part: EdgePart, delta: Vec2) {
        let Some(edge) = self.edges.get_mut(&id) else {
            return;
        };
        match part {
            EdgePart::Line => edge.shift(delta),
            EdgePart::Center => edge.move_center(delta),
            EdgePart::Start => edge.translate_end(EdgeEnd::Source, delta),
            EdgePart::End => edge.translate_end(EdgeEnd::Destination, delta),
        }
    }

    pub(super) fn clear_previews(&mut self, previews: &[(DrawableId, Highlight)]) {
        for &(id, _) in previews {
            let highlight = self.base_highlight(id);
            self.set_highlight(id, highlight);
        }
    }

    fn apply_previews(&mut self, previews: &[(DrawableId, Highlight)]) {
        for &(id, highlight) in previews {
            self.set_highlight(id, highlight);
        }
    }

    /// Lose Kanten-Enden im Andock-Radius des Nodes.
    pub(super) fn dangling_ends_in_range(
        &self,
        node_id: u64,
        scene: &GraphData,
        exclude_edges: &[u64],
    ) -> Vec<(u64, EdgeEnd)> {
        let Some(center) = self.nodes.get(&node_id).map(|n| n.position()) else {
            return Vec::new();
        };
        let mut ends = Vec::new();
        for candidate in scene.edges_within_radius(center, self.rules.attach_radius()) {
            if exclude_edges.contains(&candidate.id) {
                continue;
            }
            let Some(edge) = self.edges.get(&candidate.id) else {
                continue;
            };
            for end in ENDS {
                let data = edge.data();
                if data.node_at(end).is_none() && self.rules.in_range(center, data.point_at(end)) {
                    ends.push((candidate.id, end));
                }
            }
        }
        ends
    }

    fn node_attach_previews(
        &self,
        node_id: u64,
        scene: &GraphData,
        exclude_edges: &[u64],
    ) -> Vec<(DrawableId, Highlight)> {
        let ends = self.dangling_ends_in_range(node_id, scene, exclude_edges);
        if ends.is_empty() {
            return Vec::new();
        }
        let mut previews = vec![(DrawableId::Node(node_id), Highlight::AttachPreview)];
        previews.extend(
            ends.into_iter()
                .map(|(edge_id, _)| (DrawableId::Edge(edge_id), Highlight::AttachPreview)),
        );
        previews
    }

    /// Zusammenführ-Ziel hat Vorrang vor Andock-Zielen
    fn edge_previews(
        &self,
        id: u64,
        part: EdgePart,
        scene: &GraphData,
    ) -> Vec<(DrawableId, Highlight)> {
        if let Some(kept) = self.combine_target(id, part, scene) {
            return vec![(DrawableId::Edge(kept), Highlight::CombinePreview)];
        }
        let Some(edge) = self.edges.get(&id) else {
            return Vec::new();
        };
        part.moved_ends()
            .iter()
            .filter_map(|&end| self.attach_target(scene, edge.data().point_at(end), |_| false))
            .map(|target| (DrawableId::Node(target.node_id), Highlight::AttachPreview))
            .collect()
    }

    /// Nächster Node in Andock-Reichweite des Punkts
    pub(super) fn attach_target(
        &self,
        scene: &GraphData,
        point: Vec2,
        skip: impl Fn(u64) -> bool,
    ) -> Option<Attachment> {
        let candidates = scene
            .nodes_within_radius(point, self.rules.attach_radius())
            .into_iter()
            .filter(|m| !skip(m.id))
            .filter_map(|m| self.nodes.get(&m.id).map(|n| (m.id, n.position())));
        self.rules.find_attach_target(point, candidates)
    }

    /// Erste andere Kante, die die gezogene Kante kreuzt.
    ///
    /// Liegt ein gezogener End-Griff in Andock-Reichweite eines Nodes,
    /// gewinnt das Andocken und es wird nicht zusammengeführt.
    fn combine_target(&self, id: u64, part: EdgePart, scene: &GraphData) -> Option<u64> {
        let dragged = self.edges.get(&id)?;
        if matches!(part, EdgePart::Start | EdgePart::End) {
            let docks = part.moved_ends().iter().any(|&end| {
                self.attach_target(scene, dragged.data().point_at(end), |_| false)
                    .is_some()
            });
            if docks {
                return None;
            }
        }
        self.edges
            .values()
            .filter(|other| other.id() != id && other.is_interactive())
            .find(|other| dragged.curve().intersects(other.curve()))
            .map(|other| other.id())
    }

    /// Dockt ein Ende an den nächsten Node an oder löst es.
    ///
    /// Liefert `true`, wenn sich Koordinate oder Verbindung geändert haben.
    pub(super) fn resolve_end(
        &mut self,
        edge_id: u64,
        end: EdgeEnd,
        scene: &GraphData,
        skip: impl Fn(u64) -> bool,
    ) -> bool {
        let Some(edge) = self.edges.get(&edge_id) else {
            return false;
        };
        let point = edge.data().point_at(end);
        let current = (edge.data().node_at(end), edge.data().side_at(end));
        let target = self.attach_target(scene, point, skip);

        let Some(edge) = self.edges.get_mut(&edge_id) else {
            return false;
        };
        match target {
            Some(att) => {
                if current == (Some(att.node_id), Some(att.side)) && point == att.anchor {
                    return false;
                }
                log::debug!(
                    "Kante {} ({:?}) dockt an Node {} ({}) an",
                    edge_id,
                    end,
                    att.node_id,
                    att.side.code()
                );
                edge.connect_end(end, att.anchor, Some(att.node_id), Some(att.side));
                true
            }
            None if current.0.is_some() => {
                log::debug!("Kante {} ({:?}) gelöst", edge_id, end);
                edge.connect_end(end, point, None, None);
                true
            }
            None => false,
        }
    }

    /// Dockt lose Enden im Radius an den Node an und meldet sie.
    pub(super) fn attach_dangling_ends(
        &mut self,
        node_id: u64,
        scene: &GraphData,
        exclude_edges: &[u64],
    ) {
        let Some(center) = self.nodes.get(&node_id).map(|n| n.position()) else {
            return;
        };
        for (edge_id, end) in self.dangling_ends_in_range(node_id, scene, exclude_edges) {
            let Some(edge) = self.edges.get_mut(&edge_id) else {
                continue;
            };
            let att = self
                .rules
                .attachment_for(node_id, center, edge.data().point_at(end));
            edge.connect_end(end, att.anchor, Some(node_id), Some(att.side));
            self.emit_connection(edge_id, end);
        }
    }

    /// Meldet geänderte Enden als Verbindungs-Events, sonst ein `edge:move`.
    pub(super) fn emit_edge_result(&mut self, id: u64, changed: &[EdgeEnd]) {
        if changed.is_empty() {
            if let Some(edge) = self.edges.get(&id) {
                let anchors = edge.data().anchors();
                self.bus.emit(ViewEvent::EdgeMove(EdgeMove { id, anchors }));
            }
            return;
        }
        for &end in changed {
            self.emit_connection(id, end);
        }
    }

    fn emit_combine(&mut self, removed: u64, kept: u64) {
        if removed == kept {
            log::error!(
                "Kante {} kann nicht mit sich selbst zusammengeführt werden",
                removed
            );
            return;
        }
        log::info!("Kante {} wird in Kante {} zusammengeführt", removed, kept);
        self.bus
            .emit(ViewEvent::EdgeCombine(EdgeCombine { removed, kept }));
    }

    fn release_node(&mut self, id: u64, attached: &[(u64, EdgeEnd)], scene: &GraphData) {
        let Some(position) = self.nodes.get(&id).map(|n| n.position()) else {
            return;
        };
        self.bus.emit(ViewEvent::NodeMove(NodeMove { id, position }));
        for &(edge_id, end) in attached {
            self.emit_connection(edge_id, end);
        }
        self.attach_dangling_ends(id, scene, &[]);
    }

    fn release_edge(&mut self, id: u64, part: EdgePart, scene: &GraphData) {
        if let Some(kept) = self.combine_target(id, part, scene) {
            self.emit_combine(id, kept);
            return;
        }

        let mut changed = Vec::new();
        for &end in part.moved_ends() {
            if self.resolve_end(id, end, scene, |_| false) {
                changed.push(end);
            }
        }
        self.emit_edge_result(id, &changed);
    }
}
