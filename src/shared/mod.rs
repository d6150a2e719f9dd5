//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Optionen, die `core`, `app` und `render` gemeinsam lesen.

pub mod options;

pub use options::EditorOptions;
pub use options::{ATTACH_MARGIN, NODE_HEIGHT, NODE_WIDTH};
