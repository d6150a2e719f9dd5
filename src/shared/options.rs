//! Zentrale Konfiguration der Diagramm-Engine.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Nodes ───────────────────────────────────────────────────────────

/// Breite eines Aktions-Nodes. Die Hälfte ist der horizontale Anker-Offset.
pub const NODE_WIDTH: f32 = 120.0;
/// Höhe eines Aktions-Nodes. Die Hälfte ist der vertikale Anker-Offset.
pub const NODE_HEIGHT: f32 = 50.0;

// ── Verbindungen ────────────────────────────────────────────────────

/// Fester Rand, der zur halben Node-Breite addiert den Andock-Radius ergibt.
pub const ATTACH_MARGIN: f32 = 20.0;

// ── Selektion ───────────────────────────────────────────────────────

/// Pick-Radius für Endpunkt- und Gelenk-Griffe.
pub const HANDLE_PICK_RADIUS: f32 = 10.0;
/// Maximaler Abstand zur Kurve, der noch als Klick auf die Linie zählt.
pub const LINE_PICK_TOLERANCE: f32 = 6.0;
/// Mindestbewegung, ab der ein Drag als Bewegung gilt.
pub const DRAG_THRESHOLD: f32 = 0.5;

// ── Beschriftung ────────────────────────────────────────────────────

/// Abstand der Kantenbeschriftung entlang der Normalen.
pub const LABEL_OFFSET: f32 = 12.0;

// ── Historie ────────────────────────────────────────────────────────

/// Maximale Anzahl Snapshots im Undo-Stack.
pub const HISTORY_DEPTH: usize = 100;
/// Maximale Anzahl Einträge im Event-Log.
pub const EVENT_LOG_LIMIT: usize = 1000;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `trigger_graph_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorOptions {
    // ── Nodes ───────────────────────────────────────────────────
    /// Node-Breite
    pub node_width: f32,
    /// Node-Höhe
    pub node_height: f32,

    // ── Verbindungen ────────────────────────────────────────────
    /// Rand zusätzlich zur halben Node-Breite für den Andock-Radius
    pub attach_margin: f32,

    // ── Selektion ───────────────────────────────────────────────
    /// Pick-Radius für Endpunkt- und Gelenk-Griffe
    pub handle_pick_radius: f32,
    /// Pick-Toleranz für Kantenlinien
    pub line_pick_tolerance: f32,
    /// Mindestbewegung eines Drags
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,

    // ── Beschriftung ────────────────────────────────────────────
    /// Abstand der Beschriftung von der Kurve
    #[serde(default = "default_label_offset")]
    pub label_offset: f32,

    // ── Historie ────────────────────────────────────────────────
    /// Maximale Undo-Tiefe
    pub history_depth: usize,
    /// Maximale Länge des Event-Logs
    #[serde(default = "default_event_log_limit")]
    pub event_log_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,

            attach_margin: ATTACH_MARGIN,

            handle_pick_radius: HANDLE_PICK_RADIUS,
            line_pick_tolerance: LINE_PICK_TOLERANCE,
            drag_threshold: DRAG_THRESHOLD,

            label_offset: LABEL_OFFSET,

            history_depth: HISTORY_DEPTH,
            event_log_limit: EVENT_LOG_LIMIT,
        }
    }
}

/// Serde-Default für `drag_threshold` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_drag_threshold() -> f32 {
    DRAG_THRESHOLD
}

/// Serde-Default für `label_offset`.
fn default_label_offset() -> f32 {
    LABEL_OFFSET
}

/// Serde-Default für `event_log_limit`.
fn default_event_log_limit() -> usize {
    EVENT_LOG_LIMIT
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("trigger_graph_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("trigger_graph_editor.toml")
    }

    /// Halbe Node-Größe (Anker-Offsets für links/rechts bzw. oben/unten)
    pub fn half_node_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.node_width * 0.5, self.node_height * 0.5)
    }

    /// Andock-Radius: halbe Node-Breite plus Rand
    pub fn attach_radius(&self) -> f32 {
        self.node_width * 0.5 + self.attach_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_documented_anchor_offsets() {
        let opts = EditorOptions::default();
        assert_eq!(opts.half_node_size(), glam::Vec2::new(60.0, 25.0));
        assert_eq!(opts.attach_radius(), 80.0);
    }

    #[test]
    fn toml_roundtrip_via_file() {
        let path = std::env::temp_dir().join(format!(
            "trigger_graph_editor_options_{}.toml",
            std::process::id()
        ));
        let opts = EditorOptions {
            attach_margin: 35.0,
            history_depth: 7,
            ..EditorOptions::default()
        };
        opts.save_to_file(&path).expect("Speichern muss gelingen");

        let loaded = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let content = r#"
node_width = 100.0
node_height = 40.0
attach_margin = 10.0
handle_pick_radius = 8.0
line_pick_tolerance = 4.0
history_depth = 50
"#;
        let opts: EditorOptions = toml::from_str(content).expect("gültiges TOML");
        assert_eq!(opts.label_offset, LABEL_OFFSET);
        assert_eq!(opts.event_log_limit, EVENT_LOG_LIMIT);
        assert_eq!(opts.drag_threshold, DRAG_THRESHOLD);
    }

    #[test]
    fn broken_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!(
            "trigger_graph_editor_broken_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "node_width = \"breit\"").expect("Schreiben muss gelingen");
        let loaded = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, EditorOptions::default());
    }
}
