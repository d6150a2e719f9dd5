//! Zustand der Ansicht, der nicht Teil des Graphen ist.

mod selection;

pub use selection::SelectionState;
