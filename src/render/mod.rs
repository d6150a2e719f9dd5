//! Renderer-Schnittstelle der Ansicht.
//!
//! Geometrie- und Verbindungslogik kennen keine konkrete Grafikbibliothek:
//! Jede Entity der Ansicht besitzt ein `Drawable`, das sie mit fertigen,
//! unveränderlichen Werten füttert (Position, komplette Pfad-Kommandos).

mod recording;
mod svg;

pub use recording::{RecordingRenderer, RenderOp};
pub use svg::{SvgRenderer, SvgScene};

use crate::app::assets::Asset;
use crate::core::{EdgeData, NodeData, PathCommand};
use glam::Vec2;

/// Identität eines Drawables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawableId {
    /// Node-Darstellung
    Node(u64),
    /// Kanten-Darstellung
    Edge(u64),
}

/// Visueller Hervorhebungszustand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    /// Normal
    #[default]
    None,
    /// Selektiert
    Selected,
    /// Vorschau: ein Kanten-Ende würde hier andocken
    AttachPreview,
    /// Vorschau: die Kante würde mit einer anderen zusammengeführt
    CombinePreview,
}

/// Beschriftung einer Kante am Gelenkpunkt
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Zeilen (ein Eintrag pro Trigger)
    pub lines: Vec<String>,
    /// Ankerpunkt der Beschriftung
    pub position: Vec2,
    /// Leserichtung (nie nach links)
    pub direction: Vec2,
    /// Normale zur Leserichtung
    pub normal: Vec2,
}

/// Minimaler Fähigkeitssatz einer gezeichneten Entity
pub trait Drawable {
    /// Identität
    fn id(&self) -> DrawableId;
    /// Setzt den Mittelpunkt (Nodes)
    fn set_position(&mut self, position: Vec2);
    /// Übernimmt den vollständigen Pfad (Kanten)
    fn set_path(&mut self, path: &[PathCommand; 3]);
    /// Setzt oder entfernt die Beschriftung
    fn set_label(&mut self, label: Option<&EdgeLabel>);
    /// Sichtbarkeit
    fn set_visible(&mut self, visible: bool);
    /// Übernimmt die Icons der Entity (Klone aus dem Cache)
    fn set_icons(&mut self, icons: &[Asset]);
    /// Hervorhebung
    fn set_highlight(&mut self, highlight: Highlight);
    /// Reagiert die Entity auf Gesten?
    fn set_interactive(&mut self, interactive: bool);
    /// Entfernt die Darstellung endgültig
    fn destroy(&mut self);
}

/// Erzeugt Drawables für neue Entities
pub trait DrawableFactory {
    /// Darstellung eines Nodes
    fn create_node(&mut self, node: &NodeData) -> Box<dyn Drawable>;
    /// Darstellung einer Kante
    fn create_edge(&mut self, edge: &EdgeData) -> Box<dyn Drawable>;
}
