//! Application-Layer: interaktive Ansicht, Events, Verlauf und Controller.

pub mod assets;
pub mod controller;
pub mod event_log;
pub mod events;
pub mod history;
/// Zustand der Ansicht außerhalb des Graphen (Selektion)
pub mod state;
pub mod view;

pub use assets::{Asset, AssetCache, AssetKey, AssetKind, AssetLoader, FileAssetLoader, LoadBarrier};
pub use controller::GraphController;
pub use event_log::EventLog;
pub use events::{EventBus, EventKind, ViewEvent};
pub use history::UndoStack;
pub use state::SelectionState;
pub use view::{AssetRequest, EdgePart, EdgeView, GraphView, NodeView, PickTarget};
