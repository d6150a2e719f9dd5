//! Trigger Graph Editor Library.
//! Diagramm-Engine für Automations-Graphen: Aktionen als Nodes, Trigger als
//! gekrümmte Kanten. Als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod render;
pub mod shared;

pub use app::{
    AssetCache, AssetKey, EdgePart, GraphController, GraphView, PickTarget, SelectionState,
    UndoStack, ViewEvent,
};
pub use core::{
    Catalog, CatalogEntry, ConnectionRules, ConnectionSide, CurveGeometry, EdgeAnchors, EdgeData,
    EdgeEnd, GraphData, GraphDiff, NodeData, StaticCatalog, TriggerEntry,
};
pub use core::{SpatialIndex, SpatialMatch};
pub use render::{RecordingRenderer, RenderOp, SvgRenderer};
pub use shared::EditorOptions;
