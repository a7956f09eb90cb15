use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

pub const BIOLINK_PREFIX: &str = "biolink:";

// Directional predicate pairs, sanitized form. Registered in both directions
// at startup.
const INVERSE_PAIRS: &[(&str, &str)] = &[
    ("treats", "treated by"),
    ("affects", "affected by"),
    ("causes", "caused by"),
    ("prevents", "prevented by"),
    ("regulates", "regulated by"),
    ("disrupts", "disrupted by"),
    ("produces", "produced by"),
    ("ameliorates", "ameliorated by"),
    ("exacerbates", "exacerbated by"),
    ("contributes to", "has contribution from"),
    ("has phenotype", "phenotype of"),
    ("subclass of", "superclass of"),
    ("has part", "part of"),
    ("expressed in", "expresses"),
    ("located in", "location of"),
    ("has side effect", "is side effect of"),
    ("contraindicated in", "has contraindication"),
    ("applied to treat", "treatment applications from"),
    ("gene associated with condition", "condition associated with gene"),
];

const SYMMETRIC_PREDICATES: &[&str] = &[
    "interacts with",
    "physically interacts with",
    "directly physically interacts with",
    "genetically interacts with",
    "associated with",
    "correlated with",
    "positively correlated with",
    "negatively correlated with",
    "related to",
    "coexists with",
    "colocalizes with",
    "homologous to",
    "similar to",
    "close match",
    "same as",
];

lazy_static! {
    static ref PREDICATE_INVERSES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        for (forward, reverse) in INVERSE_PAIRS {
            map.insert(*forward, *reverse);
            map.insert(*reverse, *forward);
        }
        map
    };
    static ref PREDICATES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for (forward, reverse) in INVERSE_PAIRS {
            set.insert(*forward);
            set.insert(*reverse);
        }
        set.extend(SYMMETRIC_PREDICATES.iter().copied());
        set
    };
}

pub fn tag_biolink(name: &str) -> String {
    format!("{}{}", BIOLINK_PREFIX, name)
}

/// Strips the `biolink:` prefix and normalizes an element name to
/// lowercase, space-separated words (`biolink:ChemicalEntity` becomes
/// `chemical entity`, `biolink:object_aspect_qualifier` becomes
/// `object aspect qualifier`).
pub fn sanitize_biolink_element(element: &str) -> String {
    let stripped = element.strip_prefix(BIOLINK_PREFIX).unwrap_or(element);
    let mut out = String::with_capacity(stripped.len());
    for (i, c) in stripped.chars().enumerate() {
        if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() {
            if i > 0 && !out.ends_with(' ') {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn is_biolink_predicate(predicate: &str) -> bool {
    PREDICATES.contains(sanitize_biolink_element(predicate).as_str())
}

/// Returns the registered inverse of a predicate, the predicate itself when
/// it is symmetric, or the sanitized input unchanged when unknown.
pub fn invert_biolink_predicate(predicate: &str) -> String {
    let sanitized = sanitize_biolink_element(predicate);
    match PREDICATE_INVERSES.get(sanitized.as_str()) {
        Some(inverse) => inverse.to_string(),
        None => sanitized,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_and_sanitize_round() {
        assert_eq!(tag_biolink("treats"), "biolink:treats");
        assert_eq!(sanitize_biolink_element("biolink:treats"), "treats");
        assert_eq!(sanitize_biolink_element("biolink:ChemicalEntity"), "chemical entity");
        assert_eq!(
            sanitize_biolink_element("biolink:object_aspect_qualifier"),
            "object aspect qualifier"
        );
        assert_eq!(sanitize_biolink_element("treated by"), "treated by");
    }

    #[test]
    fn predicate_membership() {
        assert!(is_biolink_predicate("biolink:treats"));
        assert!(is_biolink_predicate("biolink:interacts_with"));
        assert!(is_biolink_predicate("treated by"));
        assert!(!is_biolink_predicate("biolink:frizzle_chickens"));
    }

    #[test]
    fn inversion() {
        assert_eq!(invert_biolink_predicate("biolink:treats"), "treated by");
        assert_eq!(invert_biolink_predicate("treated by"), "treats");
        assert_eq!(invert_biolink_predicate("biolink:affects"), "affected by");
        // symmetric predicates invert to themselves
        assert_eq!(invert_biolink_predicate("biolink:interacts_with"), "interacts with");
        // unknown predicates pass through sanitized but otherwise unchanged
        assert_eq!(invert_biolink_predicate("biolink:frizzle_chickens"), "frizzle chickens");
    }
}
