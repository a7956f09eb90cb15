use crate::biolink::sanitize_biolink_element;
use crate::model::SummaryObject;
use serde_json::Value;

type ValueFn = fn(&Value) -> Value;
type ValuePred = fn(&Value) -> bool;

/// One mapping rule over a TRAPI node or edge (viewed as a JSON object).
/// Evaluating a rule set against an object yields the concrete transforms to
/// run against the summary accumulator during merging.
#[derive(Clone, Copy, Debug)]
pub enum Rule {
    /// Reads `obj[key]`, sets it at `path` (null when absent).
    Get { key: &'static str, path: &'static str },
    /// As `Get`, with the value mapped through `transform`.
    GetTransformed { key: &'static str, path: &'static str, transform: ValueFn },
    /// Appends `obj[key]` (scalar becomes singleton) to the list at `path`.
    Aggregate { key: &'static str, path: &'static str },
    /// Aggregates only when `when` holds; otherwise ensures the list exists.
    AggregateWhen { key: &'static str, path: &'static str, when: ValuePred },
    /// As `Aggregate`, mapping each element through `transform`.
    AggregateTransformed { key: &'static str, path: &'static str, transform: ValueFn },
    /// Sets `transform(value)` of the first attribute whose type id matches.
    AttrLookup { attribute_ids: &'static [&'static str], path: &'static str, transform: ValueFn },
    /// Concatenates the values of every matching attribute into the list at `path`.
    AggregateAttrs { attribute_ids: &'static [&'static str], path: &'static str },
    /// As `AggregateAttrs`, mapping each attribute value through `transform`.
    AggregateTransformAttrs { attribute_ids: &'static [&'static str], path: &'static str, transform: ValueFn },
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransformOp {
    Set(Value),
    Extend(Vec<Value>),
    EnsureList,
}

/// A single pending write against a summary node or edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub path: String,
    pub op: TransformOp,
}

impl Transform {
    pub fn set(path: impl Into<String>, value: Value) -> Transform {
        Transform { path: path.into(), op: TransformOp::Set(value) }
    }

    pub fn extend(path: impl Into<String>, values: Vec<Value>) -> Transform {
        Transform { path: path.into(), op: TransformOp::Extend(values) }
    }

    pub fn ensure_list(path: impl Into<String>) -> Transform {
        Transform { path: path.into(), op: TransformOp::EnsureList }
    }
}

fn flatten(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => vec![],
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn matching_attributes<'a>(obj: &'a Value, attribute_ids: &[&str]) -> Vec<&'a Value> {
    obj.get("attributes")
        .and_then(Value::as_array)
        .map(|attributes| {
            attributes
                .iter()
                .filter(|attribute| {
                    attribute
                        .get("attribute_type_id")
                        .and_then(Value::as_str)
                        .map(|type_id| attribute_ids.contains(&type_id))
                        .unwrap_or(false)
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn evaluate_rules(rules: &[Rule], obj: &Value) -> Vec<Transform> {
    let mut transforms = Vec::with_capacity(rules.len());
    for rule in rules {
        match rule {
            Rule::Get { key, path } => {
                let value = obj.get(key).cloned().unwrap_or(Value::Null);
                transforms.push(Transform::set(*path, value));
            }
            Rule::GetTransformed { key, path, transform } => {
                let value = obj.get(key).map(transform).unwrap_or(Value::Null);
                transforms.push(Transform::set(*path, value));
            }
            Rule::Aggregate { key, path } => match obj.get(key) {
                Some(value) if !value.is_null() => transforms.push(Transform::extend(*path, flatten(value))),
                _ => transforms.push(Transform::ensure_list(*path)),
            },
            Rule::AggregateWhen { key, path, when } => match obj.get(key) {
                Some(value) if when(value) => transforms.push(Transform::extend(*path, flatten(value))),
                _ => transforms.push(Transform::ensure_list(*path)),
            },
            Rule::AggregateTransformed { key, path, transform } => match obj.get(key) {
                Some(value) if !value.is_null() => {
                    let mapped = flatten(value).iter().map(transform).collect();
                    transforms.push(Transform::extend(*path, mapped));
                }
                _ => transforms.push(Transform::ensure_list(*path)),
            },
            Rule::AttrLookup { attribute_ids, path, transform } => {
                if let Some(attribute) = matching_attributes(obj, attribute_ids).first() {
                    if let Some(value) = attribute.get("value") {
                        transforms.push(Transform::set(*path, transform(value)));
                    }
                }
            }
            Rule::AggregateAttrs { attribute_ids, path } => {
                let values: Vec<Value> = matching_attributes(obj, attribute_ids)
                    .iter()
                    .filter_map(|attribute| attribute.get("value"))
                    .flat_map(flatten)
                    .collect();
                if values.is_empty() {
                    transforms.push(Transform::ensure_list(*path));
                } else {
                    transforms.push(Transform::extend(*path, values));
                }
            }
            Rule::AggregateTransformAttrs { attribute_ids, path, transform } => {
                let values: Vec<Value> = matching_attributes(obj, attribute_ids)
                    .iter()
                    .filter_map(|attribute| attribute.get("value"))
                    .map(|value| transform(value))
                    .flat_map(|mapped| flatten(&mapped))
                    .collect();
                if values.is_empty() {
                    transforms.push(Transform::ensure_list(*path));
                } else {
                    transforms.push(Transform::extend(*path, values));
                }
            }
        }
    }
    transforms
}

/// Writes a transform into the accumulator, creating intermediate objects
/// along a dotted path.
pub fn apply_transform(obj: &mut SummaryObject, transform: &Transform) {
    let segments: Vec<&str> = transform.path.split('.').collect();
    let (leaf, parents) = segments.split_last().expect("transform path is never empty");

    let mut current = obj;
    for parent in parents {
        let slot = current
            .entry(parent.to_string())
            .or_insert_with(|| Value::Object(SummaryObject::new()));
        if !slot.is_object() {
            *slot = Value::Object(SummaryObject::new());
        }
        current = slot.as_object_mut().expect("slot was just made an object");
    }

    match &transform.op {
        TransformOp::Set(value) => {
            current.insert(leaf.to_string(), value.clone());
        }
        TransformOp::Extend(values) => {
            let slot = current.entry(leaf.to_string()).or_insert_with(|| Value::Array(vec![]));
            if !slot.is_array() {
                *slot = Value::Array(vec![]);
            }
            slot.as_array_mut()
                .expect("slot was just made an array")
                .extend(values.iter().cloned());
        }
        TransformOp::EnsureList => {
            current.entry(leaf.to_string()).or_insert_with(|| Value::Array(vec![]));
        }
    }
}

/// Removes duplicate entries from every list-valued field, recursively,
/// preserving first-seen order.
pub fn dedupe_list_fields(obj: &mut SummaryObject) {
    for value in obj.values_mut() {
        dedupe_value(value);
    }
}

fn dedupe_value(value: &mut Value) {
    match value {
        Value::Array(items) => {
            let mut seen: Vec<String> = Vec::with_capacity(items.len());
            items.retain(|item| {
                let fingerprint = item.to_string();
                if seen.contains(&fingerprint) {
                    false
                } else {
                    seen.push(fingerprint);
                    true
                }
            });
        }
        Value::Object(map) => {
            for nested in map.values_mut() {
                dedupe_value(nested);
            }
        }
        _ => {}
    }
}

fn non_null(value: &Value) -> bool {
    !value.is_null()
}

fn sanitize_element_value(value: &Value) -> Value {
    match value.as_str() {
        Some(element) => Value::String(sanitize_biolink_element(element)),
        None => value.clone(),
    }
}

/// Rules run against every knowledge-graph node that appears on a path.
pub static NODE_RULES: &[Rule] = &[
    Rule::AggregateWhen { key: "name", path: "names", when: non_null },
    Rule::AggregateTransformed { key: "categories", path: "types", transform: sanitize_element_value },
    Rule::AggregateAttrs {
        attribute_ids: &["biolink:same_as", "biolink:xref"],
        path: "curies",
    },
    Rule::AggregateAttrs {
        attribute_ids: &["biolink:description"],
        path: "descriptions",
    },
];

/// Rules run against every knowledge-graph edge that appears on a path.
/// Orientation-dependent fields (subject, object, predicate) are injected by
/// the fragment producer.
pub static EDGE_RULES: &[Rule] = &[
    Rule::Get { key: "qualifiers", path: "qualifiers" },
    Rule::AggregateAttrs {
        attribute_ids: &["biolink:publications"],
        path: "publications",
    },
    Rule::AggregateAttrs {
        attribute_ids: &["bts:sentence"],
        path: "snippets",
    },
    Rule::AggregateAttrs {
        attribute_ids: &["biolink:primary_knowledge_source", "biolink:aggregator_knowledge_source"],
        path: "provenance",
    },
];

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_sets_null_when_absent() {
        let rules = [Rule::Get { key: "qualifiers", path: "qualifiers" }];
        let transforms = evaluate_rules(&rules, &json!({"predicate": "biolink:treats"}));
        assert_eq!(transforms, vec![Transform::set("qualifiers", Value::Null)]);
    }

    #[test]
    fn aggregate_wraps_scalars() {
        let rules = [Rule::Aggregate { key: "name", path: "names" }];
        let transforms = evaluate_rules(&rules, &json!({"name": "aspirin"}));
        assert_eq!(transforms, vec![Transform::extend("names", vec![json!("aspirin")])]);

        let transforms = evaluate_rules(&rules, &json!({}));
        assert_eq!(transforms, vec![Transform::ensure_list("names")]);
    }

    #[test]
    fn aggregate_when_guards() {
        let rules = [Rule::AggregateWhen { key: "name", path: "names", when: non_null }];
        let transforms = evaluate_rules(&rules, &json!({"name": null}));
        assert_eq!(transforms, vec![Transform::ensure_list("names")]);
    }

    #[test]
    fn attr_aggregation_flattens_and_skips_nonmatching() {
        let rules = [Rule::AggregateAttrs {
            attribute_ids: &["biolink:publications"],
            path: "publications",
        }];
        let obj = json!({
            "attributes": [
                {"attribute_type_id": "biolink:publications", "value": ["PMID:1", "PMID:2"]},
                {"attribute_type_id": "biolink:knowledge_level", "value": "assertion"},
                {"attribute_type_id": "biolink:publications", "value": "PMID:3"}
            ]
        });
        let transforms = evaluate_rules(&rules, &obj);
        assert_eq!(
            transforms,
            vec![Transform::extend("publications", vec![json!("PMID:1"), json!("PMID:2"), json!("PMID:3")])]
        );
    }

    #[test]
    fn attr_lookup_takes_first_match() {
        let rules = [Rule::AttrLookup {
            attribute_ids: &["biolink:description"],
            path: "description",
            transform: |v| v.clone(),
        }];
        let obj = json!({
            "attributes": [
                {"attribute_type_id": "biolink:description", "value": "first"},
                {"attribute_type_id": "biolink:description", "value": "second"}
            ]
        });
        let transforms = evaluate_rules(&rules, &obj);
        assert_eq!(transforms, vec![Transform::set("description", json!("first"))]);

        assert!(evaluate_rules(&rules, &json!({"attributes": []})).is_empty());
    }

    #[test]
    fn apply_transform_handles_dotted_paths() {
        let mut obj = SummaryObject::new();
        apply_transform(&mut obj, &Transform::set("fda_info.max_phase", json!(4)));
        apply_transform(&mut obj, &Transform::extend("names", vec![json!("aspirin")]));
        apply_transform(&mut obj, &Transform::extend("names", vec![json!("aspirin"), json!("acetylsalicylic acid")]));
        apply_transform(&mut obj, &Transform::ensure_list("curies"));

        assert_eq!(obj["fda_info"]["max_phase"], json!(4));
        assert_eq!(obj["names"], json!(["aspirin", "aspirin", "acetylsalicylic acid"]));
        assert_eq!(obj["curies"], json!([]));

        dedupe_list_fields(&mut obj);
        assert_eq!(obj["names"], json!(["aspirin", "acetylsalicylic acid"]));
    }

    #[test]
    fn node_rules_cover_names_types_and_curies() {
        let knode = json!({
            "name": "celecoxib",
            "categories": ["biolink:SmallMolecule"],
            "attributes": [
                {"attribute_type_id": "biolink:same_as", "value": ["PUBCHEM.COMPOUND:2662"]}
            ]
        });
        let mut obj = SummaryObject::new();
        for transform in evaluate_rules(NODE_RULES, &knode) {
            apply_transform(&mut obj, &transform);
        }
        assert_eq!(obj["names"], json!(["celecoxib"]));
        assert_eq!(obj["types"], json!(["small molecule"]));
        assert_eq!(obj["curies"], json!(["PUBCHEM.COMPOUND:2662"]));
        assert_eq!(obj["descriptions"], json!([]));
    }
}
