#![no_main]

use libfuzzer_sys::fuzz_target;
use trigger_graph_editor::{Catalog, StaticCatalog};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(catalog) = StaticCatalog::from_json(json) {
        if let Some(entry) = catalog.trigger("time.at") {
            let _ = entry.display_text(&Default::default());
        }
    }
});
