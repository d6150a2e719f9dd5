//! Darstellung einer Trigger-Kante: Kurve, Beschriftung und Icons.

use crate::app::assets::{AssetCache, AssetKey, LoadBarrier};
use crate::core::curve::{DEFAULT_END_SIDE, DEFAULT_START_SIDE};
use crate::core::{ConnectionSide, CurveGeometry, EdgeAnchors, EdgeData, EdgeEnd};
use crate::render::{Drawable, EdgeLabel, Highlight};
use glam::Vec2;

/// Darstellung einer Trigger-Kante.
///
/// Die Kurve ist die Wahrheit der Ansicht; nach jeder Änderung werden die
/// drei Anker in die Arbeitskopie `data` zurückgeschrieben.
pub struct EdgeView {
    data: EdgeData,
    curve: CurveGeometry,
    drawable: Box<dyn Drawable>,
    icon_keys: Vec<AssetKey>,
    barrier: LoadBarrier,
    highlight: Highlight,
    label_lines: Vec<String>,
    label_offset: f32,
}

impl EdgeView {
    /// `icon_keys` enthält einen Schlüssel pro Trigger mit Icon.
    pub(super) fn new(
        data: EdgeData,
        drawable: Box<dyn Drawable>,
        icon_keys: Vec<AssetKey>,
        assets: &AssetCache,
        label_lines: Vec<String>,
        label_offset: f32,
    ) -> Self {
        let curve = CurveGeometry::from_edge(&data);
        let barrier = LoadBarrier::new(icon_keys.iter().filter(|k| !assets.contains(k)).cloned());
        let mut view = Self {
            data,
            curve,
            drawable,
            icon_keys,
            barrier,
            highlight: Highlight::None,
            label_lines,
            label_offset,
        };
        view.redraw();
        let icons = assets.get_all(&view.icon_keys);
        if !icons.is_empty() {
            view.drawable.set_icons(&icons);
        }
        let interactive = view.barrier.is_ready();
        view.drawable.set_interactive(interactive);
        view
    }

    /// Aktueller (ggf. noch nicht übernommener) Stand der Kante
    pub fn data(&self) -> &EdgeData {
        &self.data
    }

    /// Kanten-ID
    pub fn id(&self) -> u64 {
        self.data.id
    }

    /// Angezeigte Kurve
    pub fn curve(&self) -> &CurveGeometry {
        &self.curve
    }

    /// Sind alle Trigger-Icons geladen?
    pub fn is_interactive(&self) -> bool {
        self.barrier.is_ready()
    }

    /// Aktuelle Hervorhebung
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Beschriftung am Gelenk, entlang der kompensierten Tangente
    pub fn label(&self) -> Option<EdgeLabel> {
        if self.label_lines.is_empty() {
            return None;
        }
        let normal = self.curve.compensated_normal();
        Some(EdgeLabel {
            lines: self.label_lines.clone(),
            position: self.curve.center_point() - normal * self.label_offset,
            direction: self.curve.compensated_tangent(),
            normal,
        })
    }

    /// Seite, mit der die Kurve an diesem Ende austritt
    pub fn curve_side(&self, end: EdgeEnd) -> ConnectionSide {
        self.data.side_at(end).unwrap_or(match end {
            EdgeEnd::Source => DEFAULT_START_SIDE,
            EdgeEnd::Destination => DEFAULT_END_SIDE,
        })
    }

    fn redraw(&mut self) {
        self.drawable.set_path(&self.curve.path_commands());
        let label = self.label();
        self.drawable.set_label(label.as_ref());
    }

    fn set_curve(&mut self, curve: CurveGeometry) {
        self.curve = curve;
        self.data.set_anchors(EdgeAnchors {
            start: curve.start(),
            center: curve.center_point(),
            end: curve.end(),
        });
        self.redraw();
    }

    /// Baut die Kurve aus den aktuellen Enden neu; das Gelenk wird neu berechnet.
    fn rebuild(&mut self) {
        let curve = CurveGeometry::from_endpoints(
            self.data.start,
            self.curve_side(EdgeEnd::Source),
            self.data.end,
            self.curve_side(EdgeEnd::Destination),
        );
        self.set_curve(curve);
    }

    pub(super) fn shift(&mut self, delta: Vec2) {
        self.set_curve(self.curve.shift_curve(delta));
    }

    pub(super) fn move_center(&mut self, delta: Vec2) {
        self.set_curve(self.curve.move_center_point(self.curve.center_point() + delta));
    }

    pub(super) fn translate_end(&mut self, end: EdgeEnd, delta: Vec2) {
        let point = self.data.point_at(end) + delta;
        self.data.set_point(end, point);
        self.rebuild();
    }

    /// Setzt Koordinate und Verbindung eines Endes und baut die Kurve neu.
    pub(super) fn connect_end(
        &mut self,
        end: EdgeEnd,
        point: Vec2,
        node_id: Option<u64>,
        side: Option<ConnectionSide>,
    ) {
        self.data.set_point(end, point);
        self.data.set_connection(end, node_id, side);
        self.rebuild();
    }

    pub(super) fn set_highlight(&mut self, highlight: Highlight) {
        if self.highlight != highlight {
            self.highlight = highlight;
            self.drawable.set_highlight(highlight);
        }
    }

    pub(super) fn pending_assets(&self) -> impl Iterator<Item = &AssetKey> {
        self.barrier.pending()
    }

    /// Übergibt die Icons neu, falls ein Trigger der Kante `key` nutzt.
    pub(super) fn refresh_icons(&mut self, key: &AssetKey, assets: &AssetCache) {
        if self.icon_keys.contains(key) {
            self.drawable.set_icons(&assets.get_all(&self.icon_keys));
        }
    }

    pub(super) fn release_asset(&mut self, key: &AssetKey) {
        if self.barrier.release(key) && self.barrier.is_ready() {
            log::debug!("Kante {} ist interaktiv", self.data.id);
            self.drawable.set_interactive(true);
        }
    }

    pub(super) fn destroy(&mut self) {
        self.drawable.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingRenderer, RenderOp};
    use crate::render::{DrawableFactory, DrawableId};
    use approx::assert_relative_eq;

    fn view(edge: EdgeData, lines: Vec<String>) -> (EdgeView, RecordingRenderer) {
        let mut renderer = RecordingRenderer::new();
        let drawable = renderer.create_edge(&edge);
        (
            EdgeView::new(edge, drawable, Vec::new(), &AssetCache::new(), lines, 12.0),
            renderer,
        )
    }

    #[test]
    fn shift_moves_all_anchors() {
        let edge = EdgeData::dangling(1, Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0));
        let (mut view, _) = view(edge, Vec::new());
        let before = view.data().anchors();

        view.shift(Vec2::new(10.0, -5.0));

        let after = view.data().anchors();
        assert_relative_eq!(after.start.x, before.start.x + 10.0);
        assert_relative_eq!(after.center.y, before.center.y - 5.0);
        assert_relative_eq!(after.end.x, before.end.x + 10.0);
    }

    #[test]
    fn label_sits_above_horizontal_line() {
        let edge = EdgeData::dangling(1, Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0));
        let (view, renderer) = view(edge, vec!["Um 07:30".into()]);

        let label = view.label().expect("Beschriftung erwartet");
        assert!(label.direction.x > 0.0);
        assert!(label.position.y < 100.0);
        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::Label(DrawableId::Edge(1), Some(_)))),
            1
        );
    }

    #[test]
    fn connect_end_snaps_and_rebuilds() {
        let edge = EdgeData::dangling(1, Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0));
        let (mut view, _) = view(edge, Vec::new());

        view.connect_end(
            EdgeEnd::Destination,
            Vec2::new(240.0, 0.0),
            Some(7),
            Some(ConnectionSide::Left),
        );

        assert_eq!(view.data().destination, Some(7));
        assert_relative_eq!(view.curve().end().x, 240.0);
        assert_eq!(view.curve_side(EdgeEnd::Destination), ConnectionSide::Left);
    }
}
