use glam::Vec2;
use std::sync::Arc;
use trigger_graph_editor::app::events::EventKind;
use trigger_graph_editor::{
    AssetCache, Catalog, CatalogEntry, ConnectionSide, EdgeData, EdgePart, EditorOptions,
    GraphController, GraphData, GraphView, NodeData, PickTarget, RecordingRenderer, StaticCatalog,
    ViewEvent,
};

fn catalog() -> Arc<dyn Catalog> {
    let entry = |id: &str| CatalogEntry {
        id: id.into(),
        name: id.into(),
        icon: None,
        params: Vec::new(),
        template: None,
    };
    Arc::new(StaticCatalog::new(
        [entry("light.on"), entry("notify.send")],
        [entry("time.at"), entry("sun.set")],
    ))
}

fn make_graph() -> GraphData {
    GraphData::from_parts(
        [
            NodeData::new(1, "light.on", Vec2::new(100.0, 100.0)),
            NodeData::new(2, "notify.send", Vec2::new(400.0, 100.0)),
        ],
        [
            EdgeData::dangling(1, Vec2::new(160.0, 100.0), Vec2::new(300.0, 100.0))
                .with_trigger("time.at")
                .with_source(1, ConnectionSide::Right),
            EdgeData::dangling(2, Vec2::new(250.0, 0.0), Vec2::new(250.0, 60.0))
                .with_trigger("sun.set"),
        ],
    )
}

struct Session {
    view: GraphView,
    controller: GraphController,
    renderer: RecordingRenderer,
}

impl Session {
    fn new() -> Self {
        let options = EditorOptions::default();
        let renderer = RecordingRenderer::new();
        let controller = GraphController::from_options(make_graph(), &options);
        let mut view = GraphView::new(
            options,
            catalog(),
            Arc::new(AssetCache::new()),
            Box::new(renderer.handle()),
        );
        view.reconcile(controller.graph());
        Self {
            view,
            controller,
            renderer,
        }
    }

    /// Pick + Drag + Übernahme + Abgleich; liefert die Events der Geste
    fn drag(&mut self, from: Vec2, to: Vec2) -> Vec<ViewEvent> {
        let target = self.view.pick(from).expect("Treffer erwartet");
        assert!(self.view.begin_drag(target, from));
        self.view.drag_to(to);
        self.view.end_drag();
        self.commit()
    }

    fn commit(&mut self) -> Vec<ViewEvent> {
        let events = self.view.take_emitted();
        self.controller.apply_batch(&events);
        self.view.reconcile(self.controller.graph());
        events
    }
}

#[test]
fn test_node_move_round_trip_updates_canonical_edge() {
    let mut session = Session::new();

    let events = session.drag(Vec2::new(100.0, 100.0), Vec2::new(100.0, 150.0));

    assert_eq!(events.len(), 2);
    let graph = session.controller.graph();
    assert_eq!(graph.node(1).expect("Node A").position, Vec2::new(100.0, 150.0));
    let edge = graph.edge(1).expect("Kante 1");
    assert_eq!(edge.start, Vec2::new(160.0, 150.0));
    assert_eq!(edge.end, Vec2::new(300.0, 100.0));
    assert_eq!(edge.source, Some(1));

    // Ansicht und kanonischer Stand stimmen überein
    assert_eq!(session.view.displayed_graph(), *graph);
}

#[test]
fn test_committed_gesture_does_not_recreate_drawables() {
    let mut session = Session::new();
    session.renderer.clear();

    session.drag(Vec2::new(400.0, 100.0), Vec2::new(420.0, 140.0));

    let lifecycle = session.renderer.count(|op| {
        matches!(
            op,
            trigger_graph_editor::RenderOp::Create(_) | trigger_graph_editor::RenderOp::Destroy(_)
        )
    });
    assert_eq!(lifecycle, 0, "übernommener Stand ist bereits angezeigt");
}

#[test]
fn test_attach_then_undo_restores_loose_end() {
    let mut session = Session::new();

    let events = session.drag(Vec2::new(300.0, 100.0), Vec2::new(330.0, 100.0));
    assert_eq!(events[0].kind(), EventKind::EdgeConnectionDst);
    assert_eq!(
        session.controller.graph().edge(1).and_then(|e| e.destination),
        Some(2)
    );

    assert!(session.controller.undo());
    session.view.reconcile(session.controller.graph());

    let edge = session.view.edge(1).expect("Kante 1");
    assert_eq!(edge.data().destination, None);
    assert_eq!(edge.data().end, Vec2::new(300.0, 100.0));

    assert!(session.controller.redo());
    session.view.reconcile(session.controller.graph());
    assert_eq!(
        session.view.edge(1).and_then(|e| e.data().destination),
        Some(2)
    );
}

#[test]
fn test_combine_merges_triggers_and_removes_view() {
    let mut session = Session::new();

    let events = session.drag(Vec2::new(250.0, 60.0), Vec2::new(250.0, 200.0));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::EdgeCombine);
    assert!(session.view.edge(2).is_none());
    let kept = session.view.edge(1).expect("Kante 1 bleibt");
    let triggers: Vec<&str> = kept
        .data()
        .triggers
        .iter()
        .map(|t| t.trigger_type_id.as_str())
        .collect();
    assert_eq!(triggers, ["time.at", "sun.set"]);
}

#[test]
fn test_delete_selected_node_keeps_edge_dangling() {
    let mut session = Session::new();
    session.view.click(PickTarget::Node(1), false);
    session.view.delete_selected();
    session.commit();

    let graph = session.controller.graph();
    assert!(graph.node(1).is_none());
    let edge = graph.edge(1).expect("Kante bleibt bestehen");
    assert_eq!(edge.source, None);
    assert_eq!(edge.source_side, None);
    assert_eq!(session.view.nodes().count(), 1);
}

#[test]
fn test_group_move_keeps_connections() {
    let mut session = Session::new();
    session.view.click(PickTarget::Node(1), false);
    session.view.click(
        PickTarget::Edge {
            id: 1,
            part: EdgePart::Line,
        },
        true,
    );
    session.view.take_emitted();

    let events = session.drag(Vec2::new(100.0, 100.0), Vec2::new(130.0, 100.0));
    assert_eq!(events.len(), 4);

    let graph = session.controller.graph();
    let edge = graph.edge(1).expect("Kante 1");
    assert_eq!(edge.source, Some(1));
    assert_eq!(edge.source_side, Some(ConnectionSide::Right));
    assert_eq!(edge.start, Vec2::new(190.0, 100.0));
    assert_eq!(edge.end, Vec2::new(330.0, 100.0));
    assert_eq!(session.controller.history().len(), 2);
}

#[test]
fn test_trigger_and_action_editors_forward_values() {
    let mut session = Session::new();
    let mut value = trigger_graph_editor::core::ParamMap::new();
    value.insert("time".into(), vec![serde_json::json!("21:00")]);

    assert!(session.view.update_trigger(1, 0, value.clone()));
    assert!(!session.view.update_trigger(1, 3, value.clone()));
    assert!(session.view.update_action(2, value.clone()));
    assert!(session.view.remove_trigger(2, 0));
    session.commit();

    let graph = session.controller.graph();
    assert_eq!(graph.edge(1).expect("Kante 1").triggers[0].params, value);
    assert_eq!(graph.node(2).expect("Node 2").params, value);
    assert!(graph.edge(2).expect("Kante 2").triggers.is_empty());
    assert_eq!(session.view.event_log().count(EventKind::TriggerUpdate), 1);
}
