//! Trigger Graph Editor (Demo).
//!
//! Headless-Durchlauf der Diagramm-Engine: baut einen kleinen Graphen,
//! simuliert Gesten über die Ansicht, übergibt die Events an den Controller
//! und gibt das Ergebnis als SVG aus.

use glam::Vec2;
use std::sync::Arc;
use trigger_graph_editor::core::ParamMap;
use trigger_graph_editor::{
    AssetCache, Catalog, ConnectionSide, EdgeData, EditorOptions, GraphController, GraphData,
    GraphView, NodeData, StaticCatalog, SvgRenderer,
};

const DEMO_CATALOG: &str = r#"{
    "actions": [
        { "id": "light.on", "name": "Licht an" },
        { "id": "notify.send", "name": "Benachrichtigung" }
    ],
    "triggers": [
        {
            "id": "time.at",
            "name": "Uhrzeit",
            "params": [{ "name": "time", "kind": "time", "default": ["00:00"] }],
            "template": "Um {0}"
        },
        { "id": "sun.set", "name": "Sonnenuntergang" }
    ]
}"#;

fn main() -> anyhow::Result<()> {
    DemoRunner::run()
}

struct DemoRunner;

impl DemoRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Trigger Graph Editor v{} startet (Demo)...",
            env!("CARGO_PKG_VERSION")
        );

        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = EditorOptions::config_path();
        let options = EditorOptions::load_from_file(&config_path);

        let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::from_json(DEMO_CATALOG)?);
        let assets = Arc::new(AssetCache::new());
        let renderer = SvgRenderer::new(&options);

        let mut controller = GraphController::from_options(demo_graph(), &options);
        let mut view = GraphView::new(options, catalog, assets, Box::new(renderer.clone()));
        view.reconcile(controller.graph());

        // Node "Licht an" um (0, 50) nach unten ziehen
        Self::drag(&mut view, &mut controller, Vec2::new(100.0, 100.0), Vec2::new(100.0, 150.0));
        // Loses Ende der zweiten Kante unter den Node "Benachrichtigung" ziehen
        Self::drag(&mut view, &mut controller, Vec2::new(300.0, 300.0), Vec2::new(400.0, 160.0));

        for edge in view.edges() {
            println!("Kante {}: {}", edge.id(), edge.curve().svg_path_data());
        }
        println!("{}", renderer.document());

        log::info!(
            "Demo beendet: {} Nodes, {} Kanten, {} Verlaufseinträge",
            controller.graph().node_count(),
            controller.graph().edge_count(),
            controller.history().len()
        );
        Ok(())
    }

    /// Eine vollständige Ziehgeste inklusive Übernahme und Abgleich
    fn drag(view: &mut GraphView, controller: &mut GraphController, from: Vec2, to: Vec2) {
        let Some(target) = view.pick(from) else {
            log::warn!("Kein Treffer bei {:?}", from);
            return;
        };
        if view.begin_drag(target, from) {
            view.drag_to(to);
            view.end_drag();
        }

        let events = view.take_emitted();
        for event in &events {
            log::info!("Event: {}", event.name());
        }
        controller.apply_batch(&events);
        view.reconcile(controller.graph());
    }
}

fn demo_graph() -> GraphData {
    let mut time_params = ParamMap::new();
    time_params.insert("time".into(), vec![serde_json::json!("07:30")]);

    let mut morning = EdgeData::dangling(1, Vec2::new(160.0, 100.0), Vec2::new(340.0, 100.0))
        .with_trigger("time.at")
        .with_source(1, ConnectionSide::Right)
        .with_destination(2, ConnectionSide::Left);
    morning.triggers[0].params = time_params;

    let evening = EdgeData::dangling(2, Vec2::new(100.0, 125.0), Vec2::new(300.0, 300.0))
        .with_trigger("sun.set")
        .with_source(1, ConnectionSide::Bottom);

    GraphData::from_parts(
        [
            NodeData::new(1, "light.on", Vec2::new(100.0, 100.0)),
            NodeData::new(2, "notify.send", Vec2::new(400.0, 100.0)),
        ],
        [morning, evening],
    )
}
