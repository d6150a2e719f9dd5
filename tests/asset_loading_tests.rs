use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use trigger_graph_editor::app::FileAssetLoader;
use trigger_graph_editor::{
    AssetCache, AssetKey, Catalog, CatalogEntry, EdgeData, EditorOptions, GraphData, GraphView,
    NodeData, PickTarget, RecordingRenderer, RenderOp, StaticCatalog,
};
use trigger_graph_editor::render::DrawableId;

const ICON_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="16"><rect width="24" height="16"/></svg>"#;

fn icon_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "trigger_graph_editor_it_{}_{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("Temp-Verzeichnis anlegen");
    std::fs::write(dir.join("light.svg"), ICON_SVG).expect("Icon schreiben");
    std::fs::write(dir.join("time.svg"), ICON_SVG).expect("Icon schreiben");
    dir
}

fn catalog() -> Arc<dyn Catalog> {
    let entry = |id: &str, icon: Option<&str>| CatalogEntry {
        id: id.into(),
        name: id.into(),
        icon: icon.map(Into::into),
        params: Vec::new(),
        template: None,
    };
    Arc::new(StaticCatalog::new(
        [entry("light.on", Some("light.svg"))],
        [
            entry("time.at", Some("time.svg")),
            entry("sun.set", Some("missing.svg")),
        ],
    ))
}

fn make_graph() -> GraphData {
    GraphData::from_parts(
        [NodeData::new(1, "light.on", Vec2::new(100.0, 100.0))],
        [EdgeData::dangling(1, Vec2::new(160.0, 100.0), Vec2::new(300.0, 100.0))
            .with_trigger("time.at")
            .with_trigger("sun.set")],
    )
}

fn make_view(assets: Arc<AssetCache>) -> GraphView {
    make_recorded_view(assets, &RecordingRenderer::new())
}

fn make_recorded_view(assets: Arc<AssetCache>, renderer: &RecordingRenderer) -> GraphView {
    GraphView::new(
        EditorOptions::default(),
        catalog(),
        assets,
        Box::new(renderer.handle()),
    )
}

#[test]
fn test_entities_become_interactive_after_loading() {
    let dir = icon_dir("interactive");
    let assets = Arc::new(AssetCache::new());
    let mut view = make_view(Arc::clone(&assets));
    view.reconcile(&make_graph());

    assert!(!view.is_fully_interactive());
    assert!(!view.is_interactive(PickTarget::Node(1)));
    assert!(!view.begin_drag(PickTarget::Node(1), Vec2::new(100.0, 100.0)));

    let loaded = view.load_pending_assets(&FileAssetLoader::new(&dir));

    assert_eq!(loaded, 3);
    assert!(view.is_fully_interactive());
    // Fehlgeschlagenes Icon wird nicht gecacht
    assert!(assets.contains(&AssetKey::action("light.on")));
    assert!(assets.contains(&AssetKey::trigger("time.at")));
    assert!(!assets.contains(&AssetKey::trigger("sun.set")));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_cached_assets_skip_the_barrier() {
    let dir = icon_dir("cached");
    let assets = Arc::new(AssetCache::new());

    let mut first = make_view(Arc::clone(&assets));
    first.reconcile(&make_graph());
    first.load_pending_assets(&FileAssetLoader::new(&dir));

    let renderer = RecordingRenderer::new();
    let mut second = make_recorded_view(Arc::clone(&assets), &renderer);
    second.reconcile(&make_graph());

    assert!(second.is_interactive(PickTarget::Node(1)));
    // Gecachte Icons werden ohne erneutes Laden an die Drawables geklont
    let light = assets.get(&AssetKey::action("light.on")).expect("Icon im Cache");
    let time = assets.get(&AssetKey::trigger("time.at")).expect("Icon im Cache");
    let ops = renderer.ops();
    assert!(ops.contains(&RenderOp::Icons(DrawableId::Node(1), vec![light])));
    assert!(ops.contains(&RenderOp::Icons(DrawableId::Edge(1), vec![time])));
    let pending: Vec<AssetKey> = second
        .pending_asset_requests()
        .into_iter()
        .map(|r| r.key)
        .collect();
    assert_eq!(pending, vec![AssetKey::trigger("sun.set")]);

    let _ = std::fs::remove_dir_all(dir);
}
