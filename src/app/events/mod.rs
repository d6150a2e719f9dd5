//! Typisiertes Event-Vokabular der Ansicht und der Event-Bus.

mod bus;
mod event;

pub use bus::{Channel, EventBus};
pub use event::{
    ActionUpdate, EdgeCombine, EdgeConnection, EdgeMove, EdgeRemove, EventKind, NodeMove,
    NodeRemove, NodeSelected, ObjectDeselected, TriggerRemove, TriggerUpdate, ViewEvent,
};
