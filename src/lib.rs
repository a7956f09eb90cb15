//! Consolidates TRAPI responses from multiple reasoning agents into a single
//! deduplicated, front-end-ready summary: equivalent node identifiers are
//! canonicalized across agents, bounded drug-to-disease paths are extracted
//! from each knowledge graph, and nodes, edges, paths, publications, and
//! scores are merged under a rule-based attribute-aggregation framework.

pub mod annotation;
pub mod annotator;
pub mod biolink;
pub mod canonical;
pub mod config;
pub mod error;
pub mod fragment;
pub mod merge;
pub mod model;
pub mod paths;
pub mod publications;
pub mod qualifiers;
pub mod rgraph;
pub mod rules;

pub use config::Config;
pub use error::{Result, SummarizerError};
pub use merge::summarize;
pub use model::{AgentAnswer, Message, Summary};
