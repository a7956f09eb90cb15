use crate::error::{Result, SummarizerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::{env, fs};

fn default_max_hops() -> usize {
    3
}

fn default_id_patterns() -> Vec<String> {
    vec![
        "^PMID:".to_string(),
        "^PMC:?".to_string(),
        "^(?i:doi):".to_string(),
        "^(?:clinicaltrials:)?NCT".to_string(),
    ]
}

/// Runtime configuration. `id_patterns` is the ordered evidence-id
/// classification list consumed by the evidence expander; the summarizer core
/// only reads `max_hops`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default = "default_id_patterns")]
    pub id_patterns: Vec<String>,

    /// Translates agent identifiers to infores curies for the HTTP layer.
    #[serde(default)]
    pub ara_to_infores_map: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_hops: default_max_hops(),
            id_patterns: default_id_patterns(),
            ara_to_infores_map: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Environment-only configuration, `.env` honored when present.
    pub fn from_env() -> Result<Config> {
        dotenvy::dotenv().ok();
        let max_hops = match env::var("MAX_HOPS") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| SummarizerError::Config(format!("MAX_HOPS is not an integer: {}", raw)))?,
            Err(_) => default_max_hops(),
        };
        let config = Config { max_hops, ..Config::default() };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(SummarizerError::Config("max_hops must be >= 1".to_string()));
        }
        for pattern in &self.id_patterns {
            Regex::new(pattern).map_err(|e| SummarizerError::Config(format!("bad id pattern {}: {}", pattern, e)))?;
        }
        Ok(())
    }

    pub fn compiled_id_patterns(&self) -> Result<Vec<Regex>> {
        self.id_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| SummarizerError::Config(format!("bad id pattern {}: {}", pattern, e)))
            })
            .collect()
    }
}
