use crate::canonical::NodeCanonicalizer;
use crate::model::{KnowledgeEdge, KnowledgeGraph, Message, TrapiResult, OBJECT_NODE_KEY, SUBJECT_NODE_KEY};
use crate::paths::{find_paths, gen_content_key, RawPath};
use crate::qualifiers::qualified_predicate;
use crate::rgraph::{make_rnode_to_out_edges, trapi_result_to_rgraph};
use crate::rules::{evaluate_rules, Transform, EDGE_RULES, NODE_RULES};
use log::warn;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Pending transforms against one summary node or edge, addressed by key.
#[derive(Clone, Debug, Default)]
pub struct KeyedTransforms {
    pub key: String,
    pub transforms: Vec<Transform>,
}

/// One agent's contribution to the summary, awaiting the merge.
#[derive(Clone, Debug, Default)]
pub struct SummaryFragment {
    /// Normalized `[node key, edge key, node key, ...]` sequences.
    pub paths: Vec<Vec<String>>,
    pub nodes: Vec<KeyedTransforms>,
    pub edges: Vec<KeyedTransforms>,
    pub scores: BTreeMap<String, Vec<f64>>,
}

#[derive(Clone, Debug, Default)]
pub struct CondensedSummary {
    pub agent: String,
    pub fragment: SummaryFragment,
}

/// Folds every result in a message into a single fragment. Unbindable
/// results are skipped; the rest of the message still contributes.
pub fn make_fragment(message: &Message, canonicalizer: &NodeCanonicalizer, max_hops: usize) -> SummaryFragment {
    let mut fragment = SummaryFragment::default();
    let Some(kgraph) = &message.knowledge_graph else { return fragment };
    let Some(results) = &message.results else { return fragment };

    let mut seen_nodes: HashSet<String> = HashSet::new();
    let mut seen_edges: HashSet<String> = HashSet::new();

    for (index, result) in results.iter().enumerate() {
        let Some(rgraph) = trapi_result_to_rgraph(result, kgraph) else {
            warn!("skipping result {}: bound curie missing from knowledge graph", index);
            continue;
        };
        let (Some(drug), Some(disease)) = (
            first_binding(result, SUBJECT_NODE_KEY),
            first_binding(result, OBJECT_NODE_KEY),
        ) else {
            warn!("skipping result {}: missing sn/on binding", index);
            continue;
        };
        let Some(drug_key) = canonicalizer.canonical(drug) else {
            warn!("skipping result {}: drug {} is not canonicalizable", index, drug);
            continue;
        };

        fragment
            .scores
            .entry(drug_key.to_string())
            .or_default()
            .push(result.normalized_score.unwrap_or(0.0));

        let adjacency = make_rnode_to_out_edges(&rgraph, kgraph);
        let raw_paths = find_paths(&rgraph, &adjacency, drug, disease, canonicalizer, max_hops);

        for raw in &raw_paths {
            if let Some(sequence) = normalize_path(raw, kgraph, canonicalizer, &mut fragment, &mut seen_edges) {
                fragment.paths.push(sequence);
                for curie in &raw.nodes {
                    if seen_nodes.insert(curie.clone()) {
                        collect_node_transforms(curie, kgraph, canonicalizer, &mut fragment);
                    }
                }
            }
        }
    }
    fragment
}

fn first_binding<'a>(result: &'a TrapiResult, key: &str) -> Option<&'a str> {
    result
        .node_bindings
        .get(key)
        .and_then(|bindings| bindings.first())
        .map(|binding| binding.id.as_str())
}

// Rewrites a raw path to canonical node keys and oriented qualified-predicate
// edge keys, emitting edge transforms for keys not seen before.
fn normalize_path(
    raw: &RawPath,
    kgraph: &KnowledgeGraph,
    canonicalizer: &NodeCanonicalizer,
    fragment: &mut SummaryFragment,
    seen_edges: &mut HashSet<String>,
) -> Option<Vec<String>> {
    let mut sequence = Vec::with_capacity(raw.nodes.len() + raw.edges.len());
    for (index, curie) in raw.nodes.iter().enumerate() {
        sequence.push(canonicalizer.canonical(curie)?.to_string());
        if let Some((eid, inverted)) = raw.edges.get(index) {
            let kedge = kgraph.edges.get(eid)?;
            let predicate = kedge.predicate.as_deref()?;
            let subject_key = canonicalizer.canonical(&kedge.subject)?;
            let object_key = canonicalizer.canonical(&kedge.object)?;
            let (subject_key, object_key) = if *inverted {
                (object_key, subject_key)
            } else {
                (subject_key, object_key)
            };

            let forward = qualified_predicate(predicate, kedge.qualifiers.as_deref(), *inverted);
            let inverse = qualified_predicate(predicate, kedge.qualifiers.as_deref(), !*inverted);
            let edge_key = gen_content_key(&[subject_key, forward.as_str(), object_key]);
            if seen_edges.insert(edge_key.clone()) {
                fragment.edges.push(KeyedTransforms {
                    key: edge_key.clone(),
                    transforms: edge_transforms(kedge, subject_key, object_key, &forward, &inverse),
                });
            }
            sequence.push(edge_key);
        }
    }
    Some(sequence)
}

fn edge_transforms(
    kedge: &KnowledgeEdge,
    subject_key: &str,
    object_key: &str,
    predicate: &str,
    inverse_predicate: &str,
) -> Vec<Transform> {
    let obj = serde_json::to_value(kedge).unwrap_or(Value::Null);
    let mut transforms = vec![
        Transform::set("subject", Value::String(subject_key.to_string())),
        Transform::set("object", Value::String(object_key.to_string())),
        Transform::set("predicate", Value::String(predicate.to_string())),
        Transform::set("inverse_predicate", Value::String(inverse_predicate.to_string())),
    ];
    transforms.extend(evaluate_rules(EDGE_RULES, &obj));
    transforms
}

fn collect_node_transforms(
    curie: &str,
    kgraph: &KnowledgeGraph,
    canonicalizer: &NodeCanonicalizer,
    fragment: &mut SummaryFragment,
) {
    let (Some(knode), Some(key)) = (kgraph.nodes.get(curie), canonicalizer.canonical(curie)) else {
        return;
    };
    let obj = serde_json::to_value(knode).unwrap_or(Value::Null);
    fragment.nodes.push(KeyedTransforms {
        key: key.to_string(),
        transforms: evaluate_rules(NODE_RULES, &obj),
    });
}
