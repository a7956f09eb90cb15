use crate::canonical::NodeCanonicalizer;
use crate::rgraph::{OutEdge, Rgraph};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Stable content key over a sequence of path elements. Used for edge keys
/// (`[subject, predicate, object]`) and whole-path keys alike; two sequences
/// produce the same key iff they are elementwise identical.
pub fn gen_content_key<S: AsRef<str>>(elements: &[S]) -> String {
    let mut hasher = Sha256::new();
    for element in elements {
        hasher.update(element.as_ref().as_bytes());
        hasher.update([0x1f]);
    }
    hex::encode(&hasher.finalize()[..8])
}

/// A drug-to-disease walk before normalization: bound curies plus the edges
/// taken, with the direction each edge was traversed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPath {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, bool)>,
}

/// Enumerates every simple path from `drug` to `disease` over the reduced
/// graph, holding total path length (nodes plus edges) to `2 * max_hops + 1`.
/// Every node stepped onto must canonicalize; paths through unresolvable
/// nodes are not yielded.
pub fn find_paths(
    rgraph: &Rgraph,
    adjacency: &HashMap<String, Vec<OutEdge>>,
    drug: &str,
    disease: &str,
    canonicalizer: &NodeCanonicalizer,
    max_hops: usize,
) -> Vec<RawPath> {
    let mut found = Vec::new();
    if rgraph.nodes.iter().all(|n| n != drug) || rgraph.nodes.iter().all(|n| n != disease) {
        return found;
    }
    if canonicalizer.canonical(drug).is_none() {
        return found;
    }

    let max_nodes = max_hops + 1;
    let mut stack = vec![RawPath { nodes: vec![drug.to_string()], edges: vec![] }];
    while let Some(path) = stack.pop() {
        let last = path.nodes.last().expect("paths always hold at least the drug");
        if last == disease && !path.edges.is_empty() {
            found.push(path);
            continue;
        }
        if path.nodes.len() == max_nodes {
            continue;
        }
        let Some(out_edges) = adjacency.get(last) else { continue };
        for out in out_edges {
            if path.nodes.contains(&out.target) {
                continue;
            }
            if canonicalizer.canonical(&out.target).is_none() {
                continue;
            }
            let mut extended = path.clone();
            extended.nodes.push(out.target.clone());
            extended.edges.push((out.eid.clone(), out.inverted));
            stack.push(extended);
        }
    }
    found
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::KnowledgeGraph;
    use crate::rgraph::{make_rnode_to_out_edges, Rgraph};

    fn fixture(kg: &str) -> (KnowledgeGraph, NodeCanonicalizer) {
        let kgraph: KnowledgeGraph = serde_json::from_str(kg).expect("could not parse KnowledgeGraph");
        let canonicalizer = NodeCanonicalizer::from_graphs([&kgraph].into_iter());
        (kgraph, canonicalizer)
    }

    #[test]
    fn content_key_is_stable_and_injective_enough() {
        let a = gen_content_key(&["CHEBI:1", "treats", "MONDO:1"]);
        let b = gen_content_key(&["CHEBI:1", "treats", "MONDO:1"]);
        let c = gen_content_key(&["MONDO:1", "treated by", "CHEBI:1"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        // separator prevents concatenation collisions
        assert_ne!(gen_content_key(&["ab", "c"]), gen_content_key(&["a", "bc"]));
    }

    #[test]
    fn direct_and_two_hop_paths() {
        let (kgraph, canonicalizer) = fixture(
            r#"{
                "nodes": {"CHEBI:1": {}, "NCBIGene:5": {}, "MONDO:1": {}},
                "edges": {
                    "e0": {"predicate": "biolink:treats", "subject": "CHEBI:1", "object": "MONDO:1"},
                    "e1": {"predicate": "biolink:affects", "subject": "CHEBI:1", "object": "NCBIGene:5"},
                    "e2": {"predicate": "biolink:gene_associated_with_condition", "subject": "NCBIGene:5", "object": "MONDO:1"}
                }
            }"#,
        );
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "NCBIGene:5".into(), "MONDO:1".into()],
            edges: vec!["e0".into(), "e1".into(), "e2".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph);
        let mut paths = find_paths(&rgraph, &adjacency, "CHEBI:1", "MONDO:1", &canonicalizer, 3);
        paths.sort_by_key(|p| p.nodes.len());

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec!["CHEBI:1", "MONDO:1"]);
        assert_eq!(paths[0].edges, vec![("e0".to_string(), false)]);
        assert_eq!(paths[1].nodes, vec!["CHEBI:1", "NCBIGene:5", "MONDO:1"]);
        assert_eq!(paths[1].edges, vec![("e1".to_string(), false), ("e2".to_string(), false)]);
    }

    #[test]
    fn max_hops_prunes_long_walks() {
        let (kgraph, canonicalizer) = fixture(
            r#"{
                "nodes": {"CHEBI:1": {}, "NCBIGene:5": {}, "MONDO:1": {}},
                "edges": {
                    "e1": {"predicate": "biolink:affects", "subject": "CHEBI:1", "object": "NCBIGene:5"},
                    "e2": {"predicate": "biolink:gene_associated_with_condition", "subject": "NCBIGene:5", "object": "MONDO:1"}
                }
            }"#,
        );
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "NCBIGene:5".into(), "MONDO:1".into()],
            edges: vec!["e1".into(), "e2".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph);
        let paths = find_paths(&rgraph, &adjacency, "CHEBI:1", "MONDO:1", &canonicalizer, 1);
        assert!(paths.is_empty());
    }

    #[test]
    fn traversal_against_edge_direction_is_marked_inverted() {
        let (kgraph, canonicalizer) = fixture(
            r#"{
                "nodes": {"CHEBI:1": {}, "MONDO:1": {}},
                "edges": {
                    "e0": {"predicate": "biolink:treated_by", "subject": "MONDO:1", "object": "CHEBI:1"}
                }
            }"#,
        );
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "MONDO:1".into()],
            edges: vec!["e0".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph);
        let paths = find_paths(&rgraph, &adjacency, "CHEBI:1", "MONDO:1", &canonicalizer, 2);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].edges, vec![("e0".to_string(), true)]);
    }

    #[test]
    fn nodes_never_repeat() {
        let (kgraph, canonicalizer) = fixture(
            r#"{
                "nodes": {"CHEBI:1": {}, "NCBIGene:5": {}, "NCBIGene:6": {}, "MONDO:1": {}},
                "edges": {
                    "e1": {"predicate": "biolink:affects", "subject": "CHEBI:1", "object": "NCBIGene:5"},
                    "e2": {"predicate": "biolink:interacts_with", "subject": "NCBIGene:5", "object": "NCBIGene:6"},
                    "e3": {"predicate": "biolink:interacts_with", "subject": "NCBIGene:6", "object": "NCBIGene:5"},
                    "e4": {"predicate": "biolink:gene_associated_with_condition", "subject": "NCBIGene:6", "object": "MONDO:1"}
                }
            }"#,
        );
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "NCBIGene:5".into(), "NCBIGene:6".into(), "MONDO:1".into()],
            edges: vec!["e1".into(), "e2".into(), "e3".into(), "e4".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph);
        let paths = find_paths(&rgraph, &adjacency, "CHEBI:1", "MONDO:1", &canonicalizer, 4);
        for path in &paths {
            let mut nodes = path.nodes.clone();
            nodes.sort();
            nodes.dedup();
            assert_eq!(nodes.len(), path.nodes.len(), "path repeats a node: {:?}", path.nodes);
        }
        // e2 and e3 are parallel edges, so two three-node walks exist
        assert_eq!(paths.iter().filter(|p| p.nodes.len() == 4).count(), 2);
    }

    #[test]
    fn unresolvable_intermediate_blocks_path() {
        let kgraph: KnowledgeGraph = serde_json::from_str(
            r#"{
                "nodes": {"CHEBI:1": {}, "NCBIGene:5": {}, "MONDO:1": {}},
                "edges": {
                    "e1": {"predicate": "biolink:affects", "subject": "CHEBI:1", "object": "NCBIGene:5"},
                    "e2": {"predicate": "biolink:gene_associated_with_condition", "subject": "NCBIGene:5", "object": "MONDO:1"}
                }
            }"#,
        )
        .expect("could not parse KnowledgeGraph");
        // canonicalizer built from a graph that never saw NCBIGene:5
        let other: KnowledgeGraph =
            serde_json::from_str(r#"{"nodes": {"CHEBI:1": {}, "MONDO:1": {}}, "edges": {}}"#).unwrap();
        let canonicalizer = NodeCanonicalizer::from_graphs([&other].into_iter());
        let rgraph = Rgraph {
            nodes: vec!["CHEBI:1".into(), "NCBIGene:5".into(), "MONDO:1".into()],
            edges: vec!["e1".into(), "e2".into()],
        };
        let adjacency = make_rnode_to_out_edges(&rgraph, &kgraph);
        let paths = find_paths(&rgraph, &adjacency, "CHEBI:1", "MONDO:1", &canonicalizer, 3);
        assert!(paths.is_empty());
    }
}
