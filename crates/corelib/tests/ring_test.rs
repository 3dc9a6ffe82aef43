//! Integration tests for the hash ring across node joins and departures.

use corelib::node::NodeId;
use corelib::ring::Ring;

fn nodes(urls: &[&str]) -> Vec<NodeId> {
    urls.iter().map(|u| NodeId::new(*u)).collect()
}

#[test]
fn empty_ring_has_no_owner() {
    let ring = Ring::new(16);
    assert!(ring.owner("key1").is_err());
    assert_eq!(ring.active_nodes().len(), 0);
}

#[test]
fn adding_a_node_makes_the_ring_own_every_key() {
    let ring = Ring::new(8);
    ring.set_nodes(&nodes(&["http://n1:8001"]));

    for key in ["key1", "key2", "a much longer key"] {
        assert_eq!(ring.owner(key).unwrap(), NodeId::new("http://n1:8001"));
    }
}

#[test]
fn removing_a_node_reroutes_its_keys_away_from_it() {
    let ring = Ring::new(32);
    let three = nodes(&["http://n1", "http://n2", "http://n3"]);
    ring.set_nodes(&three);

    let keys: Vec<String> = (0..200).map(|i| format!("k{i}")).collect();

    ring.set_nodes(&nodes(&["http://n1", "http://n2"]));
    for key in &keys {
        assert_ne!(ring.owner(key).unwrap(), NodeId::new("http://n3"));
    }
}

#[test]
fn rejoining_with_the_same_node_set_restores_identical_routing() {
    let ring = Ring::new(24);
    let three = nodes(&["http://n1", "http://n2", "http://n3"]);
    ring.set_nodes(&three);

    let keys: Vec<String> = (0..50).map(|i| format!("key-{i}")).collect();
    let before: Vec<NodeId> = keys.iter().map(|k| ring.owner(k).unwrap()).collect();

    ring.set_nodes(&nodes(&["http://n1", "http://n2"]));
    ring.set_nodes(&three);

    let after: Vec<NodeId> = keys.iter().map(|k| ring.owner(k).unwrap()).collect();
    assert_eq!(before, after);
}

#[test]
fn replica_lists_never_repeat_a_node() {
    let ring = Ring::new(16);
    ring.set_nodes(&nodes(&["http://n1", "http://n2", "http://n3", "http://n4"]));

    for key in ["x", "y", "z", "distinctness-check"] {
        let replicas = ring.replicas(key, 3).unwrap();
        assert_eq!(replicas.len(), 3);
        let mut sorted = replicas.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), replicas.len());
    }
}

#[test]
fn duplicate_node_entries_in_set_nodes_are_deduplicated() {
    let ring = Ring::new(16);
    let dup = nodes(&["http://n1", "http://n1", "http://n2"]);
    ring.set_nodes(&dup);
    assert_eq!(ring.active_nodes().len(), 2);
}
