use crate::biolink::{invert_biolink_predicate, sanitize_biolink_element};
use crate::model::Qualifier;
use std::collections::HashMap;

// Qualifier keys participating in composition, with the prefix each one
// contributes. Order matters.
const QUALIFIER_KEYS: &[(&str, &str)] = &[
    ("direction", ""),
    ("aspect", ""),
    ("form or variant", "of a "),
    ("part", "of the "),
    ("derivative", ""),
];

const QUALIFIED_PREDICATE: &str = "qualified predicate";

#[derive(Debug, Default, PartialEq)]
pub struct QualifierBag {
    pub subject: HashMap<String, String>,
    pub object: HashMap<String, String>,
    pub qualified_predicate: Option<String>,
}

/// Normalizes a qualifier list into per-side key/value maps. Keys that are
/// neither subject- nor object-scoped and not the qualified predicate are
/// omitted.
pub fn parse_qualifiers(qualifiers: &[Qualifier]) -> QualifierBag {
    let mut bag = QualifierBag::default();
    for qualifier in qualifiers {
        let key = sanitize_biolink_element(&qualifier.qualifier_type_id);
        let value = sanitize_biolink_element(&qualifier.qualifier_value);
        if key == QUALIFIED_PREDICATE {
            bag.qualified_predicate = Some(value);
        } else if let Some(rest) = key.strip_prefix("subject ") {
            let rest = rest.strip_suffix(" qualifier").unwrap_or(rest);
            bag.subject.insert(rest.to_string(), value);
        } else if let Some(rest) = key.strip_prefix("object ") {
            let rest = rest.strip_suffix(" qualifier").unwrap_or(rest);
            bag.object.insert(rest.to_string(), value);
        }
    }
    bag
}

fn side_string(side: &HashMap<String, String>) -> String {
    let mut pieces: Vec<String> = Vec::new();
    for (key, prefix) in QUALIFIER_KEYS {
        if let Some(value) = side.get(*key) {
            pieces.push(format!("{}{}", prefix, value));
        }
    }
    pieces.join(" ")
}

/// Composes the human-readable qualified form of an edge predicate. With no
/// qualifiers this is just the sanitized (and optionally inverted) predicate.
pub fn qualified_predicate(predicate: &str, qualifiers: Option<&[Qualifier]>, inverted: bool) -> String {
    let bag = match qualifiers {
        Some(qualifiers) if !qualifiers.is_empty() => parse_qualifiers(qualifiers),
        _ => {
            return if inverted {
                invert_biolink_predicate(predicate)
            } else {
                sanitize_biolink_element(predicate)
            };
        }
    };

    let base = bag.qualified_predicate.clone().unwrap_or_else(|| sanitize_biolink_element(predicate));
    let base = if inverted { invert_biolink_predicate(&base) } else { base };

    let (subject_str, object_str) = if inverted {
        (side_string(&bag.object), side_string(&bag.subject))
    } else {
        (side_string(&bag.subject), side_string(&bag.object))
    };

    let mut composed = String::new();
    if !subject_str.is_empty() {
        composed.push_str(&subject_str);
        composed.push(' ');
    }
    composed.push_str(&base);
    if !object_str.is_empty() {
        composed.push(' ');
        composed.push_str(&object_str);
        composed.push_str(" of");
    }
    composed
}
