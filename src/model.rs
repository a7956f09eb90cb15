use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::{BTreeMap, HashMap};

pub type BiolinkEntity = String;
pub type BiolinkPredicate = String;
pub type CURIE = String;

/// Result binding key for the chemical end of an inferred query.
pub const SUBJECT_NODE_KEY: &str = "sn";
/// Result binding key for the disease/gene end of an inferred query.
pub const OBJECT_NODE_KEY: &str = "on";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeType {
    LOOKUP,
    INFERRED,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute_type_id: CURIE,

    pub original_attribute_name: Option<String>,

    pub value: Value,

    pub value_type_id: Option<CURIE>,

    pub attribute_source: Option<String>,

    pub value_url: Option<String>,

    pub description: Option<String>,

    pub attributes: Option<Vec<Value>>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Qualifier {
    pub qualifier_type_id: String,

    pub qualifier_value: String,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QualifierConstraint {
    pub qualifier_set: Vec<Qualifier>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeBinding {
    pub id: CURIE,

    pub query_id: Option<String>,

    pub attributes: Option<Vec<Attribute>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeBinding {
    pub id: String,

    pub attributes: Option<Vec<Attribute>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TrapiResult {
    pub node_bindings: HashMap<String, Vec<NodeBinding>>,

    pub edge_bindings: HashMap<String, Vec<EdgeBinding>>,

    pub normalized_score: Option<f64>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QNode {
    pub ids: Option<Vec<CURIE>>,

    pub categories: Option<Vec<BiolinkEntity>>,

    pub is_set: Option<bool>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QEdge {
    pub knowledge_type: Option<KnowledgeType>,

    pub predicates: Option<Vec<BiolinkPredicate>>,

    pub subject: String,

    pub object: String,

    pub qualifier_constraints: Option<Vec<QualifierConstraint>>,
}

/// Request echo carried by agent responses; the summarizer does not consume it.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryGraph {
    pub nodes: HashMap<String, QNode>,

    pub edges: HashMap<String, QEdge>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub name: Option<String>,

    pub categories: Option<Vec<BiolinkEntity>>,

    pub attributes: Option<Vec<Attribute>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct KnowledgeEdge {
    pub predicate: Option<BiolinkPredicate>,

    pub subject: CURIE,

    pub object: CURIE,

    pub attributes: Option<Vec<Attribute>>,

    pub qualifiers: Option<Vec<Qualifier>>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: HashMap<CURIE, KnowledgeNode>,

    pub edges: HashMap<String, KnowledgeEdge>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    pub results: Option<Vec<TrapiResult>>,

    pub query_graph: Option<QueryGraph>,

    pub knowledge_graph: Option<KnowledgeGraph>,
}

/// One upstream reasoner's response, tagged with its agent identifier.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub agent: String,

    pub message: Message,
}

// ---- summary output model ----

/// Accumulator for a summary node or edge. Transforms from the rule DSL
/// write into this map; `aras` is maintained by the merger.
pub type SummaryObject = serde_json::Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMeta {
    pub qid: String,

    pub aras: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryResult {
    pub subject: String,

    pub drug_name: String,

    pub object: String,

    pub paths: Vec<String>,

    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryPath {
    pub subgraph: Vec<String>,

    pub aras: Vec<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "type")]
    pub pub_type: String,

    pub url: String,

    pub snippet: Option<String>,

    pub pubdate: Option<String>,
}

/// The consolidated, deduplicated answer across all agents. Maps are ordered
/// so that two identical invocations serialize byte-identically.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub meta: SummaryMeta,

    pub results: Vec<SummaryResult>,

    pub paths: BTreeMap<String, SummaryPath>,

    pub nodes: BTreeMap<String, SummaryObject>,

    pub edges: BTreeMap<String, SummaryObject>,

    pub publications: BTreeMap<String, Publication>,
}
