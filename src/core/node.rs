//! Repräsentiert einen platzierten Aktions-Node.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter-Mapping: Name → Werteliste.
///
/// BTreeMap statt HashMap, damit Wertgleichheit und Serialisierung
/// unabhängig von der Einfügereihenfolge sind.
pub type ParamMap = BTreeMap<String, Vec<serde_json::Value>>;

/// Ein Aktions-Node im Automations-Graphen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Eindeutige Node-ID
    pub id: u64,
    /// Katalog-Schlüssel des Aktionstyps
    pub action_type_id: String,
    /// Parameter der Aktion
    #[serde(default)]
    pub params: ParamMap,
    /// Mittelpunkt des Nodes
    pub position: Vec2,
}

impl NodeData {
    /// Erstellt einen neuen Node ohne Parameter
    pub fn new(id: u64, action_type_id: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            action_type_id: action_type_id.into(),
            params: ParamMap::new(),
            position,
        }
    }

    /// Builder: setzt die Parameter
    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.params = params;
        self
    }
}
