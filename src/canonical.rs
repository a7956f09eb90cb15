use crate::model::{AgentAnswer, KnowledgeGraph};
use itertools::Itertools;
use serde_json::Value;
use std::collections::HashMap;

/// Attribute type ids whose values are treated as aliases of the node curie.
pub const ALIAS_ATTRIBUTE_IDS: &[&str] = &["biolink:same_as", "biolink:xref"];

/// Maps every curie seen across all agents' knowledge graphs to one
/// deterministic representative of its alias equivalence class.
///
/// Agents are folded in input-list order and each graph's nodes in sorted
/// curie order, so the representative is the first-inserted member of the
/// merged class regardless of hash-map iteration order.
pub struct NodeCanonicalizer {
    resolved: HashMap<String, String>,
}

impl NodeCanonicalizer {
    pub fn from_answers(answers: &[AgentAnswer]) -> NodeCanonicalizer {
        Self::from_graphs(answers.iter().filter_map(|answer| answer.message.knowledge_graph.as_ref()))
    }

    pub fn from_graphs<'a>(graphs: impl Iterator<Item = &'a KnowledgeGraph>) -> NodeCanonicalizer {
        let mut builder = Builder::default();
        for kgraph in graphs {
            for curie in kgraph.nodes.keys().sorted() {
                let node = &kgraph.nodes[curie];
                let slot = builder.intern(curie);
                if let Some(attributes) = &node.attributes {
                    for attribute in attributes {
                        if !ALIAS_ATTRIBUTE_IDS.contains(&attribute.attribute_type_id.as_str()) {
                            continue;
                        }
                        for alias in alias_values(&attribute.value) {
                            let alias_slot = builder.intern(alias);
                            builder.union(slot, alias_slot);
                        }
                    }
                }
            }
        }
        NodeCanonicalizer { resolved: builder.resolve() }
    }

    /// The canonical curie for `curie`, or `None` when it was never seen in
    /// any alias bag (callers treat such nodes as untraversable).
    pub fn canonical(&self, curie: &str) -> Option<&str> {
        self.resolved.get(curie).map(String::as_str)
    }
}

fn alias_values(value: &Value) -> Vec<&str> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(alias) => vec![alias.as_str()],
        _ => vec![],
    }
}

#[derive(Default)]
struct Builder {
    slots: HashMap<String, usize>,
    curies: Vec<String>,
    parent: Vec<usize>,
    // earliest insertion index in each root's class
    min_slot: Vec<usize>,
}

impl Builder {
    fn intern(&mut self, curie: &str) -> usize {
        if let Some(&slot) = self.slots.get(curie) {
            return slot;
        }
        let slot = self.curies.len();
        self.slots.insert(curie.to_string(), slot);
        self.curies.push(curie.to_string());
        self.parent.push(slot);
        self.min_slot.push(slot);
        slot
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        self.parent[root_b] = root_a;
        self.min_slot[root_a] = self.min_slot[root_a].min(self.min_slot[root_b]);
    }

    fn resolve(mut self) -> HashMap<String, String> {
        let mut resolved = HashMap::with_capacity(self.curies.len());
        for slot in 0..self.curies.len() {
            let root = self.find(slot);
            let representative = self.curies[self.min_slot[root]].clone();
            resolved.insert(self.curies[slot].clone(), representative);
        }
        resolved
    }
}
