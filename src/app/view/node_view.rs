//! Darstellung eines einzelnen Aktions-Nodes.

use crate::app::assets::{AssetCache, AssetKey, LoadBarrier};
use crate::core::NodeData;
use crate::render::{Drawable, Highlight};
use glam::Vec2;

/// Darstellung eines Aktions-Nodes: Arbeitskopie der Daten plus Drawable.
pub struct NodeView {
    data: NodeData,
    drawable: Box<dyn Drawable>,
    icon_keys: Vec<AssetKey>,
    barrier: LoadBarrier,
    highlight: Highlight,
}

impl NodeView {
    /// Gecachte Icons werden sofort übernommen, fehlende halten die Barriere.
    pub(super) fn new(
        data: NodeData,
        mut drawable: Box<dyn Drawable>,
        icon_keys: Vec<AssetKey>,
        assets: &AssetCache,
    ) -> Self {
        let barrier = LoadBarrier::new(icon_keys.iter().filter(|k| !assets.contains(k)).cloned());
        drawable.set_position(data.position);
        let icons = assets.get_all(&icon_keys);
        if !icons.is_empty() {
            drawable.set_icons(&icons);
        }
        drawable.set_interactive(barrier.is_ready());
        Self {
            data,
            drawable,
            icon_keys,
            barrier,
            highlight: Highlight::None,
        }
    }

    /// Aktueller (ggf. noch nicht übernommener) Stand des Nodes
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Node-ID
    pub fn id(&self) -> u64 {
        self.data.id
    }

    /// Angezeigter Mittelpunkt
    pub fn position(&self) -> Vec2 {
        self.data.position
    }

    /// Sind alle Icons geladen?
    pub fn is_interactive(&self) -> bool {
        self.barrier.is_ready()
    }

    /// Aktuelle Hervorhebung
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Trifft `point` das Node-Rechteck?
    pub fn contains(&self, point: Vec2, half_size: Vec2) -> bool {
        let d = (point - self.data.position).abs();
        d.x <= half_size.x && d.y <= half_size.y
    }

    pub(super) fn translate(&mut self, delta: Vec2) {
        self.data.position += delta;
        self.drawable.set_position(self.data.position);
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

    /// Übergibt die Icons neu, falls `key` zu diesem Node gehört.
    pub(super) fn refresh_icons(&mut self, key: &AssetKey, assets: &AssetCache) {
        if self.icon_keys.contains(key) {
            self.drawable.set_icons(&assets.get_all(&self.icon_keys));
        }
    }

    /// Gibt einen Schlüssel frei; wird die Barriere leer, wird der Node interaktiv.
    pub(super) fn release_asset(&mut self, key: &AssetKey) {
        if self.barrier.release(key) && self.barrier.is_ready() {
            log::debug!("Node {} ist interaktiv", self.data.id);
            self.drawable.set_interactive(true);
        }
    }

    pub(super) fn destroy(&mut self) {
        self.drawable.destroy();
    }
}
