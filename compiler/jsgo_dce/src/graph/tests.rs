use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn prune_keeps_transitive_closure() {
    let mut graph = DepGraph::new();
    graph.declare_dependency(&"main", &"a");
    graph.declare_dependency(&"a", &"b");
    graph.declare_dependency(&"c", &"b");
    graph.declare(&"d");

    let pruned = graph.prune(&["main"]);
    assert_eq!(pruned.live, vec!["main", "a", "b"]);
    assert_eq!(pruned.dead, vec!["c", "d"]);
}

#[test]
fn cycles_terminate() {
    let mut graph = DepGraph::new();
    graph.declare_dependency(&1, &2);
    graph.declare_dependency(&2, &3);
    graph.declare_dependency(&3, &1);
    graph.declare(&4);
    let pruned = graph.prune(&[2]);
    assert_eq!(pruned.live, vec![1, 2, 3]);
    assert_eq!(pruned.dead, vec![4]);
}

#[test]
fn duplicate_edges_are_recorded_once() {
    let mut graph = DepGraph::new();
    graph.declare_dependency(&"f", &"g");
    graph.declare_dependency(&"f", &"g");
    assert_eq!(graph.dependencies(&"f").count(), 1);
    assert_eq!(graph.dependencies(&"missing").count(), 0);
}

#[test]
fn close_follows_edges_discovered_during_expansion() {
    let mut graph: DepGraph<&str> = DepGraph::new();
    graph.declare(&"unused");
    let mut order = Vec::new();

    let pruned = graph
        .close(&["main"], |g, key| {
            order.push(*key);
            match *key {
                "main" => g.declare_dependency(&"main", &"helper"),
                "helper" => {
                    g.declare_dependency(&"helper", &"List[int]");
                    g.declare_dependency(&"orphan", &"never");
                }
                _ => {}
            }
            Ok::<_, ()>(())
        })
        .unwrap();

    assert_eq!(order, vec!["main", "helper", "List[int]"]);
    assert_eq!(pruned.live, vec!["main", "helper", "List[int]"]);
    assert_eq!(pruned.dead, vec!["unused", "orphan", "never"]);
}

#[test]
fn close_sees_late_edges_from_already_expanded_nodes() {
    let mut graph: DepGraph<u32> = DepGraph::new();
    let pruned = graph
        .close(&[0], |g, key| {
            // Expanding node 1 adds an edge from the entry point.
            if *key == 0 {
                g.declare_dependency(&0, &1);
            }
            if *key == 1 {
                g.declare_dependency(&0, &2);
            }
            Ok::<_, ()>(())
        })
        .unwrap();
    assert_eq!(pruned.live, vec![0, 1, 2]);
}

#[test]
fn close_propagates_expansion_errors() {
    let mut graph: DepGraph<u8> = DepGraph::new();
    let result = graph.close(&[7], |_, key| Err(*key));
    assert_eq!(result, Err(7));
}

#[test]
fn merge_adds_nodes_and_edges_once() {
    let mut graph = DepGraph::new();
    graph.declare_dependency(&"main", &"a");

    let mut other = DepGraph::new();
    other.declare_dependency(&"a", &"b");
    other.declare_dependency(&"main", &"a");
    other.declare(&"c");

    graph.merge(&other);
    assert_eq!(graph.nodes(), &["main", "a", "b", "c"]);
    assert_eq!(graph.dependencies(&"main").count(), 1);
    assert_eq!(graph.dependencies(&"a").collect::<Vec<_>>(), vec![&"b"]);
}

fn reference_closure(edges: &[(u8, u8)], entries: &[u8]) -> FxHashSet<u8> {
    let mut live: FxHashSet<u8> = entries.iter().copied().collect();
    loop {
        let before = live.len();
        for (from, to) in edges {
            if live.contains(from) {
                live.insert(*to);
            }
        }
        if live.len() == before {
            return live;
        }
    }
}

proptest! {
    #[test]
    fn prune_matches_reachability(
        edges in prop::collection::vec((0u8..24, 0u8..24), 0..60),
        entries in prop::collection::vec(0u8..24, 1..4),
    ) {
        let mut graph = DepGraph::new();
        for (from, to) in &edges {
            graph.declare_dependency(from, to);
        }
        let pruned = graph.prune(&entries);
        let expected = reference_closure(&edges, &entries);

        for key in &pruned.live {
            prop_assert!(expected.contains(key));
        }
        for key in &pruned.dead {
            prop_assert!(!expected.contains(key));
        }
        prop_assert_eq!(pruned.live.len(), expected.len());
    }
}
