use super::*;
use crate::core::{ConnectionSide, EdgeData, NodeData};
use glam::Vec2;

fn sample_graph() -> GraphData {
    let mut graph = GraphData::new();
    graph.insert_node(NodeData::new(1, "light.on", Vec2::new(100.0, 100.0)));
    graph.insert_node(NodeData::new(2, "light.off", Vec2::new(400.0, 100.0)));
    graph.insert_edge(
        EdgeData::dangling(10, Vec2::new(160.0, 100.0), Vec2::new(340.0, 100.0))
            .with_trigger("time.at")
            .with_source(1, ConnectionSide::Right)
            .with_destination(2, ConnectionSide::Left),
    );
    graph
}

#[test]
fn test_lookup_misses_return_none() {
    let graph = sample_graph();

    assert!(graph.node(1).is_some());
    assert!(graph.node(99).is_none());
    assert!(graph.edge(10).is_some());
    // Getrennte Namensräume: Node-ID 10 existiert nicht
    assert!(graph.node(10).is_none());
    assert!(graph.edge(1).is_none());
}

#[test]
fn test_edge_lookup_by_node() {
    let graph = sample_graph();

    let ids = |edges: Vec<&EdgeData>| edges.into_iter().map(|e| e.id).collect::<Vec<_>>();
    assert_eq!(ids(graph.edges_with_source(1)), vec![10]);
    assert!(graph.edges_with_source(2).is_empty());
    assert_eq!(ids(graph.edges_with_destination(2)), vec![10]);
    assert_eq!(ids(graph.edges_connected_to(2)), vec![10]);
}

#[test]
fn test_remove_node_keeps_connected_edges() {
    let mut graph = sample_graph();
    let removed = graph.remove_node(1).expect("Node 1 erwartet");

    assert_eq!(removed.id, 1);
    assert_eq!(graph.node_count(), 1);
    let edge = graph.edge(10).expect("Kante bleibt bestehen");
    assert_eq!(edge.source, Some(1));
}

#[test]
fn test_proximity_queries() {
    let graph = sample_graph();

    let nodes = graph.nodes_within_radius(Vec2::new(110.0, 90.0), 30.0);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, 1);

    // Start- und Gelenk-Anker liegen im Radius, die Kante erscheint nur einmal
    let edges = graph.edges_within_radius(Vec2::new(200.0, 100.0), 60.0);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].id, 10);

    assert!(graph.nodes_within_radius(Vec2::new(-500.0, -500.0), 10.0).is_empty());
}

#[test]
fn test_proximity_candidates_are_bounded() {
    let mut graph = GraphData::new();
    for id in 1..=20 {
        graph.insert_node(NodeData::new(id, "a", Vec2::new(id as f32, 0.0)));
    }

    let matches = graph.nodes_within_radius(Vec2::ZERO, 1000.0);
    assert_eq!(matches.len(), MAX_PROXIMITY_CANDIDATES);
    assert_eq!(matches[0].id, 1);
}

#[test]
fn test_spatial_index_follows_position_updates() {
    let mut graph = sample_graph();
    assert!(graph.update_node_position(1, Vec2::new(-300.0, 0.0)));
    assert!(!graph.update_node_position(42, Vec2::ZERO));

    let nearest = graph
        .nearest_node(Vec2::new(-290.0, 5.0))
        .expect("Treffer erwartet");
    assert_eq!(nearest.id, 1);
}

#[test]
fn test_next_ids() {
    let graph = sample_graph();
    assert_eq!(graph.next_node_id(), 3);
    assert_eq!(graph.next_edge_id(), 11);
    assert_eq!(GraphData::new().next_node_id(), 1);
}

#[test]
fn test_diff_single_added_node() {
    let g1 = sample_graph();
    let mut g2 = g1.clone();
    g2.insert_node(NodeData::new(3, "scene.run", Vec2::new(250.0, 300.0)));

    let diff = g2.diff(&g1);
    let nodes: Vec<_> = diff.node_entries().collect();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].0, DiffKind::Addition);
    assert_eq!(nodes[0].1.id, 3);
    assert_eq!(diff.count(DiffKind::Update), 0);
    assert_eq!(diff.count(DiffKind::Deletion), 0);
}

#[test]
fn test_diff_is_empty_for_equal_snapshots() {
    let g1 = sample_graph();
    let g2 = g1.clone();

    assert!(g2.diff(&g1).is_empty());
    assert_eq!(g1, g2);
}

#[test]
fn test_diff_detects_value_changes() {
    let g1 = sample_graph();
    let mut g2 = g1.clone();
    g2.update_edge(10, |edge| {
        edge.triggers[0]
            .params
            .insert("time".into(), vec![serde_json::json!("07:30")]);
    });

    let diff = g2.diff(&g1);
    assert_eq!(diff.len(), 1);
    let (kind, edge) = diff.edge_entries().next().expect("Kanten-Update erwartet");
    assert_eq!(kind, DiffKind::Update);
    assert_eq!(edge.triggers[0].params["time"], vec![serde_json::json!("07:30")]);
}

#[test]
fn test_diff_order_deletions_updates_additions() {
    let g1 = sample_graph();
    let mut g2 = g1.clone();
    g2.remove_edge(10);
    g2.remove_node(2);
    g2.update_node_position(1, Vec2::new(0.0, 0.0));
    g2.insert_node(NodeData::new(5, "x", Vec2::ZERO));
    g2.insert_edge(EdgeData::dangling(11, Vec2::ZERO, Vec2::new(50.0, 0.0)));

    let kinds: Vec<(DiffKind, u64)> = g2
        .diff(&g1)
        .iter()
        .map(|e| (e.kind, e.entity.id()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (DiffKind::Deletion, 10),
            (DiffKind::Deletion, 2),
            (DiffKind::Update, 1),
            (DiffKind::Addition, 5),
            (DiffKind::Addition, 11),
        ]
    );
    // Diff verändert keinen der Snapshots
    assert_eq!(g1, sample_graph());
}

#[test]
fn test_json_roundtrip_rebuilds_indexes() {
    let graph = sample_graph();
    let json = serde_json::to_string(&graph).expect("Serialisierung");
    let restored: GraphData = serde_json::from_str(&json).expect("Deserialisierung");

    assert_eq!(restored, graph);
    assert_eq!(
        restored
            .nearest_node(Vec2::new(395.0, 100.0))
            .map(|m| m.id),
        Some(2)
    );
}
