//! Renderer, der alle Aufrufe protokolliert (Headless-Betrieb und Tests).

use super::{Drawable, DrawableFactory, DrawableId, EdgeLabel, Highlight};
use crate::app::assets::Asset;
use crate::core::{EdgeData, NodeData, PathCommand};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// Ein protokollierter Renderer-Aufruf
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Drawable erzeugt
    Create(DrawableId),
    /// Position gesetzt
    Position(DrawableId, Vec2),
    /// Pfad gesetzt
    Path(DrawableId, [PathCommand; 3]),
    /// Beschriftung gesetzt oder entfernt
    Label(DrawableId, Option<EdgeLabel>),
    /// Sichtbarkeit geändert
    Visible(DrawableId, bool),
    /// Icons übergeben
    Icons(DrawableId, Vec<Asset>),
    /// Hervorhebung geändert
    Highlight(DrawableId, Highlight),
    /// Interaktivität geändert
    Interactive(DrawableId, bool),
    /// Drawable zerstört
    Destroy(DrawableId),
}

type OpLog = Rc<RefCell<Vec<RenderOp>>>;

/// Factory, deren Drawables in ein gemeinsames Protokoll schreiben
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    ops: OpLog,
}

impl RecordingRenderer {
    /// Erstellt einen Renderer mit leerem Protokoll
    pub fn new() -> Self {
        Self::default()
    }

    /// Zweiter Zugriff auf dasselbe Protokoll (z. B. für Tests, während
    /// die Factory in der Ansicht steckt)
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// Kopie aller bisherigen Aufrufe
    pub fn ops(&self) -> Vec<RenderOp> {
        self.ops.borrow().clone()
    }

    /// Leert das Protokoll
    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Zählt Aufrufe, die das Prädikat erfüllen
    pub fn count(&self, predicate: impl Fn(&RenderOp) -> bool) -> usize {
        self.ops.borrow().iter().filter(|op| predicate(op)).count()
    }

    fn create(&self, id: DrawableId) -> Box<dyn Drawable> {
        self.ops.borrow_mut().push(RenderOp::Create(id));
        Box::new(RecordedDrawable {
            id,
            ops: Rc::clone(&self.ops),
        })
    }
}

impl DrawableFactory for RecordingRenderer {
    fn create_node(&mut self, node: &NodeData) -> Box<dyn Drawable> {
        self.create(DrawableId::Node(node.id))
    }

    fn create_edge(&mut self, edge: &EdgeData) -> Box<dyn Drawable> {
        self.create(DrawableId::Edge(edge.id))
    }
}

struct RecordedDrawable {
    id: DrawableId,
    ops: OpLog,
}

impl RecordedDrawable {
    fn push(&self, op: RenderOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Drawable for RecordedDrawable {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn set_position(&mut self, position: Vec2) {
        self.push(RenderOp::Position(self.id, position));
    }

    fn set_path(&mut self, path: &[PathCommand; 3]) {
        self.push(RenderOp::Path(self.id, *path));
    }

    fn set_label(&mut self, label: Option<&EdgeLabel>) {
        self.push(RenderOp::Label(self.id, label.cloned()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.push(RenderOp::Visible(self.id, visible));
    }

    fn set_icons(&mut self, icons: &[Asset]) {
        self.push(RenderOp::Icons(self.id, icons.to_vec()));
    }

    fn set_highlight(&mut self, highlight: Highlight) {
        self.push(RenderOp::Highlight(self.id, highlight));
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.push(RenderOp::Interactive(self.id, interactive));
    }

    fn destroy(&mut self) {
        self.push(RenderOp::Destroy(self.id));
    }
}
