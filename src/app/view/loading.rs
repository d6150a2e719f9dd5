//! Icon-Ladevorgänge der Ansicht und die Freigabe der Lade-Barrieren.

use super::GraphView;
use crate::app::assets::{Asset, AssetKey, AssetLoader};
use indexmap::IndexSet;

/// Ein ausstehender Ladevorgang
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Cache-Schlüssel
    pub key: AssetKey,
    /// Icon-Pfad aus dem Katalog
    pub icon_path: String,
}

impl GraphView {
    /// Alle noch ausstehenden Icons (jeder Schlüssel einmal)
    pub fn pending_asset_requests(&self) -> Vec<AssetRequest> {
        let keys: IndexSet<&AssetKey> = self
            .nodes
            .values()
            .flat_map(|n| n.pending_assets())
            .chain(self.edges.values().flat_map(|e| e.pending_assets()))
            .collect();

        keys.into_iter()
            .filter_map(|key| {
                self.icon_path(key).map(|icon_path| AssetRequest {
                    key: key.clone(),
                    icon_path,
                })
            })
            .collect()
    }

    /// Schließt einen Ladevorgang ab.
    ///
    /// Erfolgreiche Ergebnisse landen im Cache und werden als Klon an alle
    /// Entities übergeben, die das Icon nutzen. Fehler werden protokolliert;
    /// die Barriere gibt den Schlüssel trotzdem frei, damit die Entity
    /// bedienbar wird.
    pub fn complete_asset_load(&mut self, key: &AssetKey, result: anyhow::Result<Asset>) {
        let loaded = match result {
            Ok(asset) => {
                self.assets.insert(key.clone(), asset);
                true
            }
            Err(err) => {
                log::warn!("Icon {:?} konnte nicht geladen werden: {:#}", key, err);
                false
            }
        };
        for node in self.nodes.values_mut() {
            if loaded {
                node.refresh_icons(key, &self.assets);
            }
            node.release_asset(key);
        }
        for edge in self.edges.values_mut() {
            if loaded {
                edge.refresh_icons(key, &self.assets);
            }
            edge.release_asset(key);
        }
    }

    /// Lädt alle ausstehenden Icons über den Loader; liefert die Anzahl Vorgänge.
    pub fn load_pending_assets(&mut self, loader: &dyn AssetLoader) -> usize {
        let requests = self.pending_asset_requests();
        for request in &requests {
            let result = match self.assets.get(&request.key) {
                Some(asset) => Ok(asset),
                None => loader.load(&request.key, &request.icon_path),
            };
            self.complete_asset_load(&request.key, result);
        }
        if !requests.is_empty() {
            log::info!("{} Icon-Ladevorgänge abgeschlossen", requests.len());
        }
        requests.len()
    }

    /// Sind alle Entities bedienbar?
    pub fn is_fully_interactive(&self) -> bool {
        self.nodes.values().all(|n| n.is_interactive())
            && self.edges.values().all(|e| e.is_interactive())
    }
}
