use std::collections::BTreeMap;

use super::context::ConversionContext;
use super::helpers::{
    ConditionBucket, classify_condition, display_text, elapsed_since, join_notes, severity_label,
};
use crate::types::{
    Bundle, Condition, DiagnosisItem, Properties, PropertyGroup, PropertySelection, Resource, Track,
};

/// Condition records classified as encounter diagnoses.
pub fn extract_diagnosis(bundle: &Bundle, context: &mut ConversionContext) -> Vec<DiagnosisItem> {
    let mut items = Vec::new();

    for condition in bundle.resources().filter_map(|r| match r {
        Resource::Condition(condition) => Some(condition),
        _ => None,
    }) {
        if classify_condition(condition) != Some(ConditionBucket::Diagnosis) {
            continue;
        }

        let name = condition
            .code
            .as_ref()
            .and_then(display_text)
            .unwrap_or("Unknown Diagnosis")
            .to_string();

        let (icd10_code, icd10_name) = icd10_coding(condition, &name);
        let properties = diagnosis_properties(condition, context);
        let index = items.len();

        items.push(DiagnosisItem {
            id: context.next_id("d"),
            name,
            icd10_code,
            icd10_name,
            track: Track::new(index),
            properties,
            notes: join_notes(&condition.note),
        });
    }

    items
}

/// First ICD-10 coding on the condition, if any. Anything beyond verbatim
/// field mapping (formulary lookups and the like) is out of scope.
fn icd10_coding(condition: &Condition, fallback_name: &str) -> (String, String) {
    let coding = condition.code.as_ref().and_then(|code| {
        code.coding.iter().find(|c| {
            c.system
                .as_deref()
                .map(|s| s.contains("icd-10") || s.contains("icd10"))
                .unwrap_or(false)
        })
    });

    match coding {
        Some(coding) => (
            coding.code.clone().unwrap_or_default(),
            coding
                .display
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
        ),
        None => (String::new(), String::new()),
    }
}

fn diagnosis_properties(condition: &Condition, context: &mut ConversionContext) -> Properties {
    let mut properties = BTreeMap::new();

    if let Some(duration) = elapsed_since(condition.onset_date_time.as_deref(), context.now()) {
        properties.insert(
            "pg-1541659976".to_string(),
            PropertyGroup {
                name: "Since".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: duration.value,
                    unit: Some(duration.unit),
                }],
            },
        );
    }

    if let Some(status) = condition.clinical_status.as_ref().and_then(display_text) {
        properties.insert(
            "pg-002".to_string(),
            PropertyGroup {
                name: "Current status".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: status.to_string(),
                    unit: None,
                }],
            },
        );
    }

    if condition.severity.is_some() {
        properties.insert(
            "pg-severity".to_string(),
            PropertyGroup {
                name: "Severity".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: severity_label(condition.severity.as_ref()).to_string(),
                    unit: None,
                }],
            },
        );
    }

    if let Some(body_site) = condition.body_site.first().and_then(display_text) {
        properties.insert(
            "pg-bodysite".to_string(),
            PropertyGroup {
                name: "Body Site".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: body_site.to_string(),
                    unit: None,
                }],
            },
        );
    }

    properties
}
