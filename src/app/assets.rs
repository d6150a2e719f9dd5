//! Icon-Assets: explizit erzeugter Cache, Loader und Lade-Barriere.
//!
//! Der Cache wird einmal beim Start erzeugt und per `Arc` an die Ansicht
//! gereicht. Lesen ist parallel möglich, Schreiben nur bei einem Cache-Miss.

use anyhow::{anyhow, Context};
use image::GenericImageView;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Herkunft eines Assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Icon eines Aktionstyps
    Action,
    /// Icon eines Triggertyps
    Trigger,
}

/// Cache-Schlüssel: Art + Katalog-ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    /// Art des Katalogeintrags
    pub kind: AssetKind,
    /// Katalog-ID des Typs
    pub type_id: String,
}

impl AssetKey {
    /// Schlüssel für ein Aktions-Icon
    pub fn action(type_id: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Action,
            type_id: type_id.into(),
        }
    }

    /// Schlüssel für ein Trigger-Icon
    pub fn trigger(type_id: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Trigger,
            type_id: type_id.into(),
        }
    }
}

/// Ein geladenes Icon
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Quelldatei
    pub path: PathBuf,
    /// Rohdaten (geteilt, Klonen kopiert nicht)
    pub bytes: Arc<[u8]>,
    /// Pixelgröße bzw. SVG-Größe (Breite, Höhe)
    pub dimensions: (u32, u32),
}

/// Geteilter Asset-Cache (ein Schreiber bei Miss, viele Leser bei Hit)
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: RwLock<HashMap<AssetKey, Asset>>,
}

impl AssetCache {
    /// Erstellt einen leeren Cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Liefert einen Klon des gecachten Assets
    pub fn get(&self, key: &AssetKey) -> Option<Asset> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Klone aller gecachten Assets zu den Schlüsseln, in Schlüsselreihenfolge
    pub fn get_all(&self, keys: &[AssetKey]) -> Vec<Asset> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter().filter_map(|key| entries.get(key).cloned()).collect()
    }

    /// Prüft ob ein Asset gecacht ist
    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Legt ein Asset ab; ein bereits vorhandenes bleibt erhalten.
    pub fn insert(&self, key: AssetKey, asset: Asset) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(asset);
    }

    /// Anzahl gecachter Assets
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Gibt `true` zurück, wenn nichts gecacht ist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Quelle für Icon-Daten
pub trait AssetLoader {
    /// Lädt das Icon unter dem (relativen) Katalogpfad
    fn load(&self, key: &AssetKey, icon_path: &str) -> anyhow::Result<Asset>;
}

/// Lädt Icons relativ zu einem Wurzelverzeichnis
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    /// Erstellt einen Loader für das Verzeichnis
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, key: &AssetKey, icon_path: &str) -> anyhow::Result<Asset> {
        let path = self.root.join(icon_path);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Icon für {:?} nicht lesbar: {}", key, path.display()))?;
        let dimensions = decode_dimensions(&path, &bytes)
            .with_context(|| format!("Icon nicht dekodierbar: {}", path.display()))?;

        log::debug!(
            "Icon geladen: {} ({}x{})",
            path.display(),
            dimensions.0,
            dimensions.1
        );
        Ok(Asset {
            path,
            bytes: bytes.into(),
            dimensions,
        })
    }
}

/// Ermittelt die Größe eines SVG- oder Raster-Icons.
pub fn decode_dimensions(path: &Path, bytes: &[u8]) -> anyhow::Result<(u32, u32)> {
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let tree = resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default())
            .map_err(|err| anyhow!("SVG ungültig: {err}"))?;
        let size = tree.size().to_int_size();
        Ok((size.width(), size.height()))
    } else {
        let image = image::load_from_memory(bytes)?;
        Ok(image.dimensions())
    }
}

/// Join-Barriere über alle ausstehenden Ladevorgänge einer Entity.
///
/// Die Entity wird erst interaktiv, wenn die Menge leer ist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadBarrier {
    pending: IndexSet<AssetKey>,
}

impl LoadBarrier {
    /// Barriere über die gegebenen Schlüssel (Duplikate zählen einmal)
    pub fn new(keys: impl IntoIterator<Item = AssetKey>) -> Self {
        Self {
            pending: keys.into_iter().collect(),
        }
    }

    /// Alle Ladevorgänge abgeschlossen?
    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }

    /// Markiert einen Schlüssel als erledigt; `true` wenn er ausstand.
    pub fn release(&mut self, key: &AssetKey) -> bool {
        self.pending.shift_remove(key)
    }

    /// Ausstehende Schlüssel
    pub fn pending(&self) -> impl Iterator<Item = &AssetKey> {
        self.pending.iter()
    }

    /// Anzahl ausstehender Schlüssel
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Gibt `true` zurück, wenn nichts aussteht.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "trigger_graph_editor_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("Temp-Verzeichnis");
        dir
    }

    #[test]
    fn barrier_waits_for_all_keys() {
        let mut barrier = LoadBarrier::new([
            AssetKey::trigger("time.at"),
            AssetKey::trigger("sun.set"),
            AssetKey::trigger("time.at"),
        ]);
        assert_eq!(barrier.len(), 2);

        assert!(barrier.release(&AssetKey::trigger("time.at")));
        assert!(!barrier.is_ready());
        assert!(!barrier.release(&AssetKey::trigger("time.at")));
        assert!(barrier.release(&AssetKey::trigger("sun.set")));
        assert!(barrier.is_ready());
    }

    #[test]
    fn cache_hits_are_clones_sharing_bytes() {
        let cache = AssetCache::new();
        let key = AssetKey::action("light.on");
        cache.insert(
            key.clone(),
            Asset {
                path: PathBuf::from("light.svg"),
                bytes: Arc::from(&b"<svg/>"[..]),
                dimensions: (24, 24),
            },
        );

        let a = cache.get(&key).expect("Treffer erwartet");
        let b = cache.get(&key).expect("Treffer erwartet");
        assert!(Arc::ptr_eq(&a.bytes, &b.bytes));
        assert!(cache.get(&AssetKey::trigger("light.on")).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn file_loader_reads_svg_and_png_sizes() {
        let dir = temp_dir("assets");
        std::fs::write(
            dir.join("icon.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="16"><rect width="24" height="16"/></svg>"#,
        )
        .expect("SVG schreiben");
        image::RgbaImage::new(3, 2)
            .save(dir.join("icon.png"))
            .expect("PNG schreiben");

        let loader = FileAssetLoader::new(&dir);
        let svg = loader
            .load(&AssetKey::action("a"), "icon.svg")
            .expect("SVG laden");
        let png = loader
            .load(&AssetKey::trigger("t"), "icon.png")
            .expect("PNG laden");
        let missing = loader.load(&AssetKey::trigger("x"), "fehlt.png");
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(svg.dimensions, (24, 16));
        assert_eq!(png.dimensions, (3, 2));
        assert!(missing.is_err());
    }
}
