use crate::biolink::is_biolink_predicate;
use crate::model::{KnowledgeGraph, TrapiResult, CURIE};
use itertools::Itertools;
use log::debug;
use std::collections::{HashMap, HashSet};

/// A single result reduced to its bound nodes and the bound edges whose
/// predicate is biolink-recognized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rgraph {
    pub nodes: Vec<CURIE>,
    pub edges: Vec<String>,
}

/// Flattens a result's bindings into a reduced graph. Returns `None` when a
/// bound node is absent from the knowledge graph; edges with unrecognized
/// predicates are dropped, the rest of the graph is kept.
pub fn trapi_result_to_rgraph(result: &TrapiResult, kgraph: &KnowledgeGraph) -> Option<Rgraph> {
    let mut nodes: Vec<CURIE> = Vec::new();
    for key in result.node_bindings.keys().sorted() {
        for binding in &result.node_bindings[key] {
            if !kgraph.nodes.contains_key(&binding.id) {
                debug!("bound node {} is missing from the knowledge graph", binding.id);
                return None;
            }
            if !nodes.contains(&binding.id) {
                nodes.push(binding.id.clone());
            }
        }
    }

    let mut edges: Vec<String> = Vec::new();
    for key in result.edge_bindings.keys().sorted() {
        for binding in &result.edge_bindings[key] {
            let Some(kedge) = kgraph.edges.get(&binding.id) else {
                debug!("bound edge {} is missing from the knowledge graph", binding.id);
                continue;
            };
            let recognized = kedge
                .predicate
                .as_deref()
                .map(is_biolink_predicate)
                .unwrap_or(false);
            if !recognized {
                debug!(
                    "dropping edge {} with unrecognized predicate {:?}",
                    binding.id, kedge.predicate
                );
                continue;
            }
            if !edges.contains(&binding.id) {
                edges.push(binding.id.clone());
            }
        }
    }

    Some(Rgraph { nodes, edges })
}

/// One traversable edge out of a node. `inverted` records that following it
/// runs against the kedge's subject-to-object direction.
#[derive(Clone, Debug, PartialEq)]
pub struct OutEdge {
    pub eid: String,
    pub target: CURIE,
    pub inverted: bool,
}

/// Undirected adjacency over the reduced graph: every edge whose endpoints
/// are both bound contributes to both of them.
pub fn make_rnode_to_out_edges(rgraph: &Rgraph, kgraph: &KnowledgeGraph) -> HashMap<CURIE, Vec<OutEdge>> {
    let bound: HashSet<&str> = rgraph.nodes.iter().map(String::as_str).collect();
    let mut adjacency: HashMap<CURIE, Vec<OutEdge>> = HashMap::new();
    for eid in &rgraph.edges {
        let Some(kedge) = kgraph.edges.get(eid) else { continue };
        if !bound.contains(kedge.subject.as_str()) || !bound.contains(kedge.object.as_str()) {
            debug!("edge {} leaves the bound node set, skipping", eid);
            continue;
        }
        adjacency.entry(kedge.subject.clone()).or_default().push(OutEdge {
            eid: eid.clone(),
            target: kedge.object.clone(),
            inverted: false,
        });
        adjacency.entry(kedge.object.clone()).or_default().push(OutEdge {
            eid: eid.clone(),
            target: kedge.subject.clone(),
            inverted: true,
        });
    }
    adjacency
}

#[cfg(test)]
mod test {
    use super::*;

    fn kgraph() -> KnowledgeGraph {
        serde_json::from_str(
            r#"{
                "nodes": {"CHEBI:1": {}, "MONDO:1": {}, "NCBIGene:5": {}},
                "edges": {
                    "e0": {"predicate": "biolink:treats", "subject": "CHEBI:1", "object": "MONDO:1"},
                    "e1": {"predicate": "biolink:not_a_predicate", "subject": "CHEBI:1", "object": "MONDO:1"},
                    "e2": {"predicate": "biolink:gene_associated_with_condition", "subject": "NCBIGene:5", "object": "MONDO:1"}
                }
            }"#,
        )
        .expect("could not parse KnowledgeGraph")
    }

    fn result(data: &str) -> TrapiResult {
        serde_json::from_str(data).expect("could not parse TrapiResult")
    }

    #[test]
    fn builds_rgraph_and_drops_unrecognized_predicates() {
        let result = result(
            r#"{
                "node_bindings": {"sn": [{"id": "CHEBI:1"}], "on": [{"id": "MONDO:1"}]},
                "edge_bindings": {"t_edge": [{"id": "e0"}, {"id": "e1"}]}
            }"#,
        );
        let rgraph = trapi_result_to_rgraph(&result, &kgraph()).unwrap();
        assert_eq!(rgraph.nodes, vec!["MONDO:1", "CHEBI:1"]);
        assert_eq!(rgraph.edges, vec!["e0"]);
    }

    #[test]
    fn missing_bound_node_rejects_result() {
        let result = result(
            r#"{
                "node_bindings": {"sn": [{"id": "CHEBI:404"}], "on": [{"id": "MONDO:1"}]},
                "edge_bindings": {"t_edge": [{"id": "e0"}]}
            }"#,
        );
        assert_eq!(trapi_result_to_rgraph(&result, &kgraph()), None);
    }

    #[test]
    fn adjacency_contributes_edges_to_both_endpoints() {
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "MONDO:1".into()],
            edges: vec!["e0".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph());
        assert_eq!(
            adjacency["CHEBI:1"],
            vec![OutEdge { eid: "e0".into(), target: "MONDO:1".into(), inverted: false }]
        );
        assert_eq!(
            adjacency["MONDO:1"],
            vec![OutEdge { eid: "e0".into(), target: "CHEBI:1".into(), inverted: true }]
        );
    }

    #[test]
    fn adjacency_skips_edges_leaving_bound_set() {
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "MONDO:1".into()],
            edges: vec!["e0".into(), "e2".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph());
        assert!(adjacency["MONDO:1"].iter().all(|out| out.eid != "e2"));
    }
}
