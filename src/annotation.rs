use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationClass {
    Disease,
    Chemical,
    Gene,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ChemicalNames {
    pub commercial: Vec<String>,
    pub generic: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChebiRole {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtcStatus {
    pub code: &'static str,
    pub label: &'static str,
}

/// Classifies an annotation record by the presence of its key fields.
pub fn classify(annotation: &Value) -> Option<AnnotationClass> {
    let obj = annotation.as_object()?;
    if obj.contains_key("disease_ontology") {
        Some(AnnotationClass::Disease)
    } else if obj.contains_key("chebi") || obj.contains_key("chembl") || obj.contains_key("ndc") {
        Some(AnnotationClass::Chemical)
    } else if obj.contains_key("symbol") {
        Some(AnnotationClass::Gene)
    } else {
        None
    }
}

fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

// Fields like xrefs and NDC names show up as either a scalar or a list.
fn scalar_or_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => vec![],
        other => vec![other],
    }
}

pub fn get_description(annotation: &Value) -> Option<String> {
    match classify(annotation)? {
        AnnotationClass::Disease => {
            let def = get_path(annotation, &["disease_ontology", "def"])?.as_str()?;
            let truncated = def.split('[').next().unwrap_or(def).trim();
            Some(truncated.to_string())
        }
        AnnotationClass::Chemical => get_path(annotation, &["unii", "ncit_description"])
            .and_then(Value::as_str)
            .or_else(|| get_path(annotation, &["chebi", "definition"]).and_then(Value::as_str))
            .map(str::to_string),
        AnnotationClass::Gene => annotation.get("summary").and_then(Value::as_str).map(str::to_string),
    }
}

/// Commercial and generic names for a chemical, merged across its NDC
/// entries, lowercased and deduplicated.
pub fn get_names(annotation: &Value) -> Option<ChemicalNames> {
    if classify(annotation)? != AnnotationClass::Chemical {
        return None;
    }
    let mut names = ChemicalNames::default();
    for entry in scalar_or_list(annotation.get("ndc")?) {
        if let Some(proprietary) = entry.get("proprietaryname") {
            push_names(&mut names.commercial, proprietary);
        }
        if let Some(nonproprietary) = entry.get("nonproprietaryname") {
            push_names(&mut names.generic, nonproprietary);
        }
    }
    Some(names)
}

fn push_names(target: &mut Vec<String>, value: &Value) {
    for item in scalar_or_list(value) {
        if let Some(name) = item.as_str() {
            let lowered = name.to_lowercase();
            if !target.contains(&lowered) {
                target.push(lowered);
            }
        }
    }
}

/// Highest trial phase reached according to ChEMBL, 0 when unknown.
pub fn get_fda_approval(annotation: &Value) -> Option<i64> {
    if classify(annotation)? != AnnotationClass::Chemical {
        return None;
    }
    Some(
        get_path(annotation, &["chembl", "max_phase"])
            .and_then(Value::as_i64)
            .unwrap_or(0),
    )
}

/// Lifts `chebi.relationship.has_role` entries through the supplied
/// role lookup, dropping unrecognized roles.
pub fn get_chebi_roles(annotation: &Value, lookup: &dyn Fn(&str) -> Option<ChebiRole>) -> Option<Vec<ChebiRole>> {
    if classify(annotation)? != AnnotationClass::Chemical {
        return None;
    }
    let has_role = get_path(annotation, &["chebi", "relationship", "has_role"])?;
    let roles = scalar_or_list(has_role)
        .into_iter()
        .filter_map(Value::as_str)
        .filter_map(lookup)
        .collect();
    Some(roles)
}

pub fn get_drug_indications(annotation: &Value) -> Option<Vec<String>> {
    if classify(annotation)? != AnnotationClass::Chemical {
        return None;
    }
    let indications = get_path(annotation, &["chembl", "drug_indications"])?;
    let mesh_ids = scalar_or_list(indications)
        .into_iter()
        .filter_map(|entry| entry.get("mesh_id"))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    Some(mesh_ids)
}

pub fn get_otc(annotation: &Value) -> Option<OtcStatus> {
    if classify(annotation)? != AnnotationClass::Chemical {
        return None;
    }
    let availability = get_path(annotation, &["chembl", "availability_type"]).and_then(Value::as_i64);
    let status = match availability {
        Some(2) => OtcStatus { code: "t", label: "Over the counter" },
        Some(1) => OtcStatus { code: "f", label: "Prescription only" },
        Some(0) => OtcStatus { code: "d", label: "Discontinued" },
        Some(-2) => OtcStatus { code: "w", label: "Withdrawn" },
        _ => OtcStatus { code: "o", label: "Other" },
    };
    Some(status)
}

/// MESH curies for a disease, collected from MONDO and Disease Ontology
/// xrefs in path order.
pub fn get_curies(annotation: &Value) -> Option<Vec<String>> {
    if classify(annotation)? != AnnotationClass::Disease {
        return None;
    }
    let mut curies = Vec::new();
    for path in [&["mondo", "xrefs", "mesh"][..], &["disease_ontology", "xrefs", "mesh"][..]] {
        if let Some(mesh) = get_path(annotation, path) {
            for id in scalar_or_list(mesh).into_iter().filter_map(Value::as_str) {
                curies.push(format!("MESH:{}", id));
            }
        }
    }
    Some(curies)
}

pub fn get_species(annotation: &Value) -> Option<&'static str> {
    if classify(annotation)? != AnnotationClass::Gene {
        return None;
    }
    match annotation.get("taxid").and_then(Value::as_i64) {
        Some(9606) => Some("Human"),
        _ => None,
    }
}
