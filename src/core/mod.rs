//! Core-Domänentypen: Nodes, Trigger-Kanten, Kurvengeometrie, Graph,
//! Andock-Regeln, Spatial-Index und Katalog.

pub mod catalog;
pub mod connection;
pub mod curve;
pub mod edge;
pub mod graph;
/// Core-Datenmodelle des Automations-Graphen
///
/// - GraphData: Container für alle Nodes und Kanten
/// - NodeData: platzierte Aktion mit Position und Parametern
/// - EdgeData: gerichtete Trigger-Kante, optional an beiden Enden angedockt
pub mod node;
pub mod spatial;

pub use catalog::{Catalog, CatalogEntry, ParamSpec, StaticCatalog};
pub use connection::{classify_angle, classify_side, Attachment, ConnectionRules};
pub use curve::{CubicBezier, CurveEndpoints, CurveGeometry, PathCommand};
pub use edge::{ConnectionSide, EdgeAnchors, EdgeData, EdgeEnd, TriggerEntry};
pub use graph::{DiffEntity, DiffEntry, DiffKind, GraphData, GraphDiff, MAX_PROXIMITY_CANDIDATES};
pub use node::{NodeData, ParamMap};
pub use spatial::{SpatialIndex, SpatialMatch};
