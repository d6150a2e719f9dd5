//! Renderer, der die Szene als SVG-Dokument aufbaut.

use super::{Drawable, DrawableFactory, DrawableId, EdgeLabel, Highlight};
use crate::app::assets::Asset;
use crate::core::{EdgeData, NodeData, PathCommand};
use crate::shared::EditorOptions;
use glam::Vec2;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

/// Rand um die Szene im `viewBox`
const SCENE_PADDING: f32 = 20.0;
/// Darstellungshöhe eines Icons
const ICON_HEIGHT: f32 = 16.0;
const ICON_GAP: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
struct SvgShape {
    title: String,
    position: Vec2,
    path: Option<[PathCommand; 3]>,
    label: Option<EdgeLabel>,
    icons: Vec<Asset>,
    visible: bool,
    highlight: Highlight,
}

/// Aktueller Inhalt der SVG-Szene
#[derive(Debug, Clone, Default)]
pub struct SvgScene {
    shapes: IndexMap<DrawableId, SvgShape>,
    node_size: Vec2,
}

impl SvgScene {
    /// Anzahl lebender Drawables
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Gibt `true` zurück, wenn die Szene leer ist.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Existiert das Drawable noch?
    pub fn contains(&self, id: DrawableId) -> bool {
        self.shapes.contains_key(&id)
    }

    fn bounds(&self) -> (Vec2, Vec2) {
        let half = self.node_size * 0.5;
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for (id, shape) in &self.shapes {
            match (id, &shape.path) {
                (DrawableId::Edge(_), Some(path)) => {
                    for cmd in path {
                        let p = match cmd {
                            PathCommand::MoveTo(p) => *p,
                            PathCommand::CubicTo { to, .. } => *to,
                        };
                        min = min.min(p);
                        max = max.max(p);
                    }
                }
                (DrawableId::Node(_), _) => {
                    min = min.min(shape.position - half);
                    max = max.max(shape.position + half);
                }
                _ => {}
            }
        }
        if min.x > max.x {
            (Vec2::ZERO, Vec2::splat(100.0))
        } else {
            (min - SCENE_PADDING, max + SCENE_PADDING)
        }
    }

    /// Serialisiert die sichtbaren Drawables als SVG-Dokument.
    ///
    /// Kanten liegen unter den Nodes, jeweils in Erzeugungsreihenfolge.
    pub fn to_svg_document(&self) -> String {
        let (min, max) = self.bounds();
        let size = max - min;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            min.x, min.y, size.x, size.y, size.x, size.y
        );
        out.push_str(
            "<defs><marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" \
             markerWidth=\"8\" markerHeight=\"8\" orient=\"auto\">\
             <path d=\"M 0 0 L 10 5 L 0 10 z\"/></marker></defs>\n",
        );

        let visible = || self.shapes.iter().filter(|(_, s)| s.visible);
        for (_, shape) in visible().filter(|(id, _)| matches!(id, DrawableId::Edge(_))) {
            let Some(path) = &shape.path else {
                continue;
            };
            let _ = writeln!(
                out,
                r#"<path class="{}" d="{}" fill="none" stroke="black" marker-end="url(#arrow)"/>"#,
                highlight_class(shape.highlight),
                path.iter().map(PathCommand::to_svg).collect::<Vec<_>>().join(" ")
            );
            if let Some(label) = &shape.label {
                let angle = label.direction.y.atan2(label.direction.x).to_degrees();
                for (i, line) in label.lines.iter().enumerate() {
                    let p = label.position - label.normal * (i as f32 * 14.0);
                    let _ = writeln!(
                        out,
                        r#"<text x="{}" y="{}" font-size="12" text-anchor="middle" transform="rotate({} {} {})">{}</text>"#,
                        p.x,
                        p.y,
                        angle,
                        p.x,
                        p.y,
                        escape(line)
                    );
                }
            }
            // Icons mittig über dem Gelenk
            if let PathCommand::CubicTo { to: joint, .. } = path[1] {
                let width = icons_width(&shape.icons);
                let start = Vec2::new(joint.x - width * 0.5, joint.y - ICON_HEIGHT - ICON_GAP);
                write_icons(&mut out, &shape.icons, start);
            }
        }

        let half = self.node_size * 0.5;
        for (_, shape) in visible().filter(|(id, _)| matches!(id, DrawableId::Node(_))) {
            let corner = shape.position - half;
            let _ = writeln!(
                out,
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="6" fill="white" stroke="black"/>"#,
                highlight_class(shape.highlight),
                corner.x,
                corner.y,
                self.node_size.x,
                self.node_size.y
            );
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" font-size="12" text-anchor="middle">{}</text>"#,
                shape.position.x,
                shape.position.y + 4.0,
                escape(&shape.title)
            );
            let start = Vec2::new(corner.x + ICON_GAP, shape.position.y - ICON_HEIGHT * 0.5);
            write_icons(&mut out, &shape.icons, start);
        }
        out.push_str("</svg>\n");
        out
    }
}

fn icon_width(icon: &Asset) -> f32 {
    let (w, h) = icon.dimensions;
    if h == 0 {
        ICON_HEIGHT
    } else {
        ICON_HEIGHT * w as f32 / h as f32
    }
}

fn icons_width(icons: &[Asset]) -> f32 {
    let total: f32 = icons.iter().map(icon_width).sum();
    total + ICON_GAP * icons.len().saturating_sub(1) as f32
}

/// Schreibt die Icons als `<image>`-Reihe ab `start` (obere linke Ecke).
fn write_icons(out: &mut String, icons: &[Asset], start: Vec2) {
    let mut x = start.x;
    for icon in icons {
        let width = icon_width(icon);
        let _ = writeln!(
            out,
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            escape(&icon.path.to_string_lossy()),
            x,
            start.y,
            width,
            ICON_HEIGHT
        );
        x += width + ICON_GAP;
    }
}

fn highlight_class(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::None => "plain",
        Highlight::Selected => "selected",
        Highlight::AttachPreview => "attach-preview",
        Highlight::CombinePreview => "combine-preview",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Factory für Drawables einer gemeinsamen [`SvgScene`]
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    scene: Rc<RefCell<SvgScene>>,
}

impl SvgRenderer {
    /// Erstellt eine leere Szene mit der Node-Größe aus den Optionen
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            scene: Rc::new(RefCell::new(SvgScene {
                shapes: IndexMap::new(),
                node_size: Vec2::new(options.node_width, options.node_height),
            })),
        }
    }

    /// Gemeinsame Szene (lesend)
    pub fn scene(&self) -> Rc<RefCell<SvgScene>> {
        Rc::clone(&self.scene)
    }

    /// Aktuelles SVG-Dokument
    pub fn document(&self) -> String {
        self.scene.borrow().to_svg_document()
    }

    fn create(&self, id: DrawableId, title: String, position: Vec2) -> Box<dyn Drawable> {
        self.scene.borrow_mut().shapes.insert(
            id,
            SvgShape {
                title,
                position,
                path: None,
                label: None,
                icons: Vec::new(),
                visible: true,
                highlight: Highlight::None,
            },
        );
        Box::new(SvgDrawable {
            id,
            scene: Rc::clone(&self.scene),
        })
    }
}

impl DrawableFactory for SvgRenderer {
    fn create_node(&mut self, node: &NodeData) -> Box<dyn Drawable> {
        self.create(
            DrawableId::Node(node.id),
            node.action_type_id.clone(),
            node.position,
        )
    }

    fn create_edge(&mut self, edge: &EdgeData) -> Box<dyn Drawable> {
        self.create(DrawableId::Edge(edge.id), String::new(), edge.center)
    }
}

struct SvgDrawable {
    id: DrawableId,
    scene: Rc<RefCell<SvgScene>>,
}

impl SvgDrawable {
    fn update(&self, f: impl FnOnce(&mut SvgShape)) {
        if let Some(shape) = self.scene.borrow_mut().shapes.get_mut(&self.id) {
            f(shape);
        }
    }
}

impl Drawable for SvgDrawable {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn set_position(&mut self, position: Vec2) {
        self.update(|s| s.position = position);
    }

    fn set_path(&mut self, path: &[PathCommand; 3]) {
        let path = *path;
        self.update(|s| s.path = Some(path));
    }

    fn set_label(&mut self, label: Option<&EdgeLabel>) {
        let label = label.cloned();
        self.update(|s| s.label = label);
    }

    fn set_visible(&mut self, visible: bool) {
        self.update(|s| s.visible = visible);
    }

    fn set_icons(&mut self, icons: &[Asset]) {
        let icons = icons.to_vec();
        self.update(|s| s.icons = icons);
    }

    fn set_highlight(&mut self, highlight: Highlight) {
        self.update(|s| s.highlight = highlight);
    }

    // Die SVG-Ausgabe kennt keine Interaktivität
    fn set_interactive(&mut self, _interactive: bool) {}

    fn destroy(&mut self) {
        self.scene.borrow_mut().shapes.shift_remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConnectionSide, CurveGeometry};

    #[test]
    fn document_is_valid_svg_and_tracks_destroy() {
        let options = EditorOptions::default();
        let mut renderer = SvgRenderer::new(&options);

        let node = NodeData::new(1, "light.on & off", Vec2::new(100.0, 100.0));
        let mut node_drawable = renderer.create_node(&node);
        node_drawable.set_highlight(Highlight::Selected);

        let edge = EdgeData::dangling(5, Vec2::new(160.0, 100.0), Vec2::new(320.0, 180.0))
            .with_source(1, ConnectionSide::Right);
        let mut edge_drawable = renderer.create_edge(&edge);
        edge_drawable.set_path(&CurveGeometry::from_edge(&edge).path_commands());

        let doc = renderer.document();
        assert!(doc.contains("&amp;"));
        assert!(doc.contains("class=\"selected\""));
        resvg::usvg::Tree::from_str(&doc, &resvg::usvg::Options::default())
            .expect("gültiges SVG");

        node_drawable.set_icons(&[Asset {
            path: "icons/light.svg".into(),
            bytes: std::sync::Arc::from(&b"<svg/>"[..]),
            dimensions: (32, 16),
        }]);
        let doc = renderer.document();
        assert!(doc.contains(r#"<image href="icons/light.svg""#));
        assert!(doc.contains(r#"width="32" height="16""#));

        edge_drawable.destroy();
        assert!(!renderer.scene().borrow().contains(DrawableId::Edge(5)));
        assert_eq!(renderer.scene().borrow().len(), 1);
    }
}
