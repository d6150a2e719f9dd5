//! Read-only Katalog der verfügbaren Aktions- und Triggertypen.
//!
//! Der Katalog wird nur gelesen; die Engine verändert ihn nie.

use super::ParamMap;
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Beschreibung eines Parameters im Schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parametername (Schlüssel in `ParamMap`)
    pub name: String,
    /// Freier Typbezeichner (z. B. "time", "number", "device")
    #[serde(default)]
    pub kind: String,
    /// Vorgabewerte
    #[serde(default)]
    pub default: Vec<serde_json::Value>,
}

/// Statische Metadaten eines Aktions- oder Triggertyps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Katalog-Schlüssel
    pub id: String,
    /// Anzeigename
    pub name: String,
    /// Relativer Pfad zum Icon
    #[serde(default)]
    pub icon: Option<String>,
    /// Parameter-Schema in Positionsreihenfolge
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    /// Anzeigetext mit Platzhaltern `{0}`, `{1}`, … (Position im Schema)
    #[serde(default)]
    pub template: Option<String>,
}

fn placeholder_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").ok()).as_ref()
}

impl CatalogEntry {
    /// Füllt die Vorlage mit den Parameterwerten.
    ///
    /// Platzhalter ohne passenden Parameter bleiben leer; ohne Vorlage wird
    /// der Anzeigename verwendet.
    pub fn display_text(&self, params: &ParamMap) -> String {
        let Some(template) = &self.template else {
            return self.name.clone();
        };

        let Some(re) = placeholder_regex() else {
            return template.clone();
        };

        re.replace_all(template, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|pos| self.params.get(pos))
                .map(|spec| {
                    let values = params.get(&spec.name).unwrap_or(&spec.default);
                    values
                        .iter()
                        .map(value_text)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default()
        })
        .into_owned()
    }
}

/// Strings ohne Anführungszeichen, alles andere als JSON-Text
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Zugriff auf Katalog-Einträge
pub trait Catalog {
    /// Aktionstyp nach ID
    fn action(&self, id: &str) -> Option<&CatalogEntry>;
    /// Triggertyp nach ID
    fn trigger(&self, id: &str) -> Option<&CatalogEntry>;
}

/// In-Memory-Katalog, typischerweise aus JSON geladen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    actions: HashMap<String, CatalogEntry>,
    #[serde(default)]
    triggers: HashMap<String, CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    actions: Vec<CatalogEntry>,
    #[serde(default)]
    triggers: Vec<CatalogEntry>,
}

impl StaticCatalog {
    /// Erstellt einen Katalog aus Einträgen
    pub fn new(
        actions: impl IntoIterator<Item = CatalogEntry>,
        triggers: impl IntoIterator<Item = CatalogEntry>,
    ) -> Self {
        Self {
            actions: actions.into_iter().map(|e| (e.id.clone(), e)).collect(),
            triggers: triggers.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    /// Parst `{"actions": [...], "triggers": [...]}`
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Katalog-JSON konnte nicht gelesen werden")?;
        Ok(Self::new(file.actions, file.triggers))
    }

    /// Lädt den Katalog aus einer JSON-Datei
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Katalog nicht lesbar: {}", path.display()))?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "Katalog geladen: {} Aktionen, {} Trigger",
            catalog.actions.len(),
            catalog.triggers.len()
        );
        Ok(catalog)
    }
}

impl Catalog for StaticCatalog {
    fn action(&self, id: &str) -> Option<&CatalogEntry> {
        self.actions.get(id)
    }

    fn trigger(&self, id: &str) -> Option<&CatalogEntry> {
        self.triggers.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "actions": [
            { "id": "light.on", "name": "Licht an", "icon": "icons/light.svg",
              "params": [ { "name": "device", "kind": "device" } ],
              "template": "Schalte {0} ein" }
        ],
        "triggers": [
            { "id": "time.at", "name": "Uhrzeit",
              "params": [ { "name": "time", "kind": "time", "default": ["12:00"] },
                          { "name": "days", "kind": "weekday" } ],
              "template": "Um {0} an {1}" }
        ]
    }"#;

    #[test]
    fn json_catalog_resolves_by_id() {
        let catalog = StaticCatalog::from_json(SAMPLE).expect("gültiger Katalog");

        let action = catalog.action("light.on").expect("Aktion erwartet");
        assert_eq!(action.icon.as_deref(), Some("icons/light.svg"));
        assert!(catalog.trigger("light.on").is_none());
        assert!(catalog.action("unbekannt").is_none());
    }

    #[test]
    fn template_uses_positional_params_and_defaults() {
        let catalog = StaticCatalog::from_json(SAMPLE).expect("gültiger Katalog");
        let trigger = catalog.trigger("time.at").expect("Trigger erwartet");

        let mut params = ParamMap::new();
        params.insert("days".into(), vec![json!("Mo"), json!("Di")]);
        assert_eq!(trigger.display_text(&params), "Um 12:00 an Mo, Di");
    }

    #[test]
    fn unknown_placeholder_stays_empty() {
        let entry = CatalogEntry {
            id: "x".into(),
            name: "X".into(),
            icon: None,
            params: Vec::new(),
            template: Some("Wert: {3}".into()),
        };
        assert_eq!(entry.display_text(&ParamMap::new()), "Wert: ");
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(StaticCatalog::from_json("{ nope").is_err());
    }
}
