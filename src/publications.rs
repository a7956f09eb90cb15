use crate::model::{Publication, SummaryObject};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

lazy_static! {
    static ref PMID_PATTERN: Regex = Regex::new(r"^PMID:(\d+)$").expect("PMID pattern compiles");
    static ref PMC_PATTERN: Regex = Regex::new(r"^PMC:?(\d+)$").expect("PMC pattern compiles");
    static ref DOI_PATTERN: Regex = Regex::new(r"^(?i:doi):(.+)$").expect("DOI pattern compiles");
    static ref NCT_PATTERN: Regex = Regex::new(r"^(?:clinicaltrials:)?(NCT\d+)$").expect("NCT pattern compiles");
}

/// Classifies an evidence identifier and produces the URL to view it at.
pub fn id_to_type_and_url(id: &str) -> Option<(&'static str, String)> {
    if let Some(captures) = PMID_PATTERN.captures(id) {
        return Some(("PMID", format!("https://pubmed.ncbi.nlm.nih.gov/{}/", &captures[1])));
    }
    if let Some(captures) = PMC_PATTERN.captures(id) {
        return Some(("PMC", format!("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC{}/", &captures[1])));
    }
    if let Some(captures) = DOI_PATTERN.captures(id) {
        return Some(("DOI", format!("https://www.doi.org/{}", &captures[1])));
    }
    if let Some(captures) = NCT_PATTERN.captures(id) {
        return Some(("NCT", format!("https://clinicaltrials.gov/study/{}", &captures[1])));
    }
    None
}

pub fn is_valid_pub_id(id: &str) -> bool {
    id_to_type_and_url(id).is_some()
}

// Dates arrive in whatever form the upstream source used.
fn normalize_pubdate(raw: &str) -> String {
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y %b %d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

/// Builds the publication table from every edge's `publications` list,
/// pulling sentences and dates out of the matching `snippets` entries. The
/// snippet payloads, qualifier bags, and inverse-predicate scratch field are
/// stripped from the edges afterwards.
pub fn splice_publications(edges: &mut BTreeMap<String, SummaryObject>) -> BTreeMap<String, Publication> {
    let mut publications = BTreeMap::new();
    for obj in edges.values_mut() {
        let ids: Vec<String> = obj
            .get("publications")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        for id in ids {
            let Some((pub_type, url)) = id_to_type_and_url(&id) else { continue };
            let (snippet, pubdate) = snippet_for(obj.get("snippets"), &id);
            publications.insert(
                id,
                Publication { pub_type: pub_type.to_string(), url, snippet, pubdate },
            );
        }

        obj.remove("snippets");
        obj.remove("qualifiers");
        obj.remove("inverse_predicate");
    }
    publications
}

fn snippet_for(snippets: Option<&Value>, id: &str) -> (Option<String>, Option<String>) {
    let Some(Value::Array(entries)) = snippets else { return (None, None) };
    for entry in entries {
        if let Some(details) = entry.get(id) {
            let sentence = details.get("sentence").and_then(Value::as_str).map(str::to_string);
            let pubdate = details
                .get("publication date")
                .and_then(Value::as_str)
                .map(normalize_pubdate);
            return (sentence, pubdate);
        }
    }
    (None, None)
}
