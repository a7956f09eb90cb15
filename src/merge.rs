use crate::canonical::NodeCanonicalizer;
use crate::error::{Result, SummarizerError};
use crate::fragment::{make_fragment, CondensedSummary, KeyedTransforms};
use crate::model::{AgentAnswer, Summary, SummaryMeta, SummaryObject, SummaryPath, SummaryResult};
use crate::paths::gen_content_key;
use crate::publications::{is_valid_pub_id, splice_publications};
use crate::rules::{apply_transform, dedupe_list_fields};
use itertools::Itertools;
use log::debug;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Consolidates all agents' responses to one inferred query into a single
/// deduplicated summary. Pure and synchronous; one bad result or agent never
/// poisons the rest.
pub fn summarize(qid: &str, answers: &[AgentAnswer], max_hops: usize) -> Result<Summary> {
    if max_hops == 0 {
        return Err(SummarizerError::InvalidInput("max_hops must be >= 1".to_string()));
    }
    let canonicalizer = NodeCanonicalizer::from_answers(answers);
    let condensed: Vec<CondensedSummary> = answers
        .iter()
        .map(|answer| CondensedSummary {
            agent: answer.agent.clone(),
            fragment: make_fragment(&answer.message, &canonicalizer, max_hops),
        })
        .collect();
    Ok(merge_condensed(qid, &condensed))
}

/// Reduces per-agent fragments into the final summary.
pub fn merge_condensed(qid: &str, condensed: &[CondensedSummary]) -> Summary {
    let mut result_buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut paths: BTreeMap<String, SummaryPath> = BTreeMap::new();
    let mut nodes: BTreeMap<String, SummaryObject> = BTreeMap::new();
    let mut edges: BTreeMap<String, SummaryObject> = BTreeMap::new();
    let mut scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for summary in condensed {
        for sequence in &summary.fragment.paths {
            let key = gen_content_key(sequence);
            let drug = sequence.first().cloned().unwrap_or_default();
            result_buckets.entry(drug).or_default().push(key.clone());
            let entry = paths.entry(key).or_insert_with(|| SummaryPath {
                subgraph: sequence.clone(),
                aras: vec![],
            });
            if !entry.aras.contains(&summary.agent) {
                entry.aras.push(summary.agent.clone());
            }
        }
        extend_objects(&mut nodes, &summary.fragment.nodes, &summary.agent);
        extend_objects(&mut edges, &summary.fragment.edges, &summary.agent);
        for (drug, drug_scores) in &summary.fragment.scores {
            scores.entry(drug.clone()).or_default().extend(drug_scores.iter().copied());
        }
    }

    for obj in edges.values_mut() {
        dedupe_list_fields(obj);
        if let Some(Value::Array(ids)) = obj.get_mut("publications") {
            ids.retain(|id| id.as_str().map(is_valid_pub_id).unwrap_or(false));
        }
    }

    synthesize_inverse_edges(&mut edges);
    let publications = splice_publications(&mut edges);

    for (key, obj) in nodes.iter_mut() {
        dedupe_list_fields(obj);
        ensure_fallback_list(obj, "names", key);
        ensure_fallback_list(obj, "curies", key);
    }

    let results = expand_results(result_buckets, &paths, &nodes, &scores);

    Summary {
        meta: SummaryMeta {
            qid: qid.to_string(),
            aras: condensed.iter().map(|summary| summary.agent.clone()).unique().collect(),
        },
        results,
        paths,
        nodes,
        edges,
        publications,
    }
}

fn extend_objects(objects: &mut BTreeMap<String, SummaryObject>, keyed: &[KeyedTransforms], agent: &str) {
    for entry in keyed {
        let obj = objects.entry(entry.key.clone()).or_insert_with(|| {
            let mut obj = SummaryObject::new();
            obj.insert("aras".to_string(), Value::Array(vec![]));
            obj
        });
        for transform in &entry.transforms {
            apply_transform(obj, transform);
        }
        if let Some(Value::Array(aras)) = obj.get_mut("aras") {
            aras.push(Value::String(agent.to_string()));
        }
    }
}

// Every edge gets a mirror at the inverse key: subject and object swapped,
// predicate replaced with the inverse qualified predicate, qualifier bag
// dropped. Keys that already exist from a real traversal are left alone.
fn synthesize_inverse_edges(edges: &mut BTreeMap<String, SummaryObject>) {
    let keys: Vec<String> = edges.keys().cloned().collect();
    for key in keys {
        let obj = edges[&key].clone();
        let (Some(subject), Some(object), Some(predicate), Some(inverse_predicate)) = (
            obj.get("subject").and_then(Value::as_str).map(str::to_string),
            obj.get("object").and_then(Value::as_str).map(str::to_string),
            obj.get("predicate").and_then(Value::as_str).map(str::to_string),
            obj.get("inverse_predicate").and_then(Value::as_str).map(str::to_string),
        ) else {
            debug!("edge {} is missing orientation fields, not mirroring", key);
            continue;
        };
        let inverse_key = gen_content_key(&[object.as_str(), inverse_predicate.as_str(), subject.as_str()]);
        if edges.contains_key(&inverse_key) {
            continue;
        }
        let mut inverse = obj.clone();
        inverse.insert("subject".to_string(), Value::String(object));
        inverse.insert("object".to_string(), Value::String(subject));
        inverse.insert("predicate".to_string(), Value::String(inverse_predicate));
        inverse.insert("inverse_predicate".to_string(), Value::String(predicate));
        inverse.remove("qualifiers");
        edges.insert(inverse_key, inverse);
    }
}

fn ensure_fallback_list(obj: &mut SummaryObject, field: &str, key: &str) {
    let slot = obj.entry(field.to_string()).or_insert_with(|| Value::Array(vec![]));
    match slot.as_array_mut() {
        Some(list) if list.is_empty() => list.push(Value::String(key.to_string())),
        Some(_) => {}
        None => *slot = Value::Array(vec![Value::String(key.to_string())]),
    }
}

fn expand_results(
    result_buckets: BTreeMap<String, Vec<String>>,
    paths: &BTreeMap<String, SummaryPath>,
    nodes: &BTreeMap<String, SummaryObject>,
    scores: &BTreeMap<String, Vec<f64>>,
) -> Vec<SummaryResult> {
    let mut results = Vec::with_capacity(result_buckets.len());
    for (drug, mut path_keys) in result_buckets {
        // lexical pre-sort makes the comparator's ties deterministic
        path_keys.sort();
        path_keys.dedup();
        path_keys.sort_by(|a, b| compare_paths(&paths[a].subgraph, &paths[b].subgraph));
        let Some(first) = path_keys.first().and_then(|key| paths.get(key)) else { continue };
        let object = first.subgraph.last().cloned().unwrap_or_default();
        let drug_name = nodes
            .get(&drug)
            .and_then(|obj| obj.get("names"))
            .and_then(Value::as_array)
            .and_then(|names| names.first())
            .and_then(Value::as_str)
            .unwrap_or(&drug)
            .to_string();
        let score = scores
            .get(&drug)
            .filter(|drug_scores| !drug_scores.is_empty())
            .map(|drug_scores| drug_scores.iter().sum::<f64>() / drug_scores.len() as f64)
            .unwrap_or(0.0);
        results.push(SummaryResult {
            subject: drug.clone(),
            drug_name,
            object,
            paths: path_keys,
            score,
        });
    }
    results
}

// Shortest first; equal lengths compare node keys (even indices) lexically.
fn compare_paths(a: &[String], b: &[String]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        for index in (0..a.len().min(b.len())).step_by(2) {
            match a[index].cmp(&b[index]) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    })
}
