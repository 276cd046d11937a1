use std::collections::BTreeMap;

use super::context::ConversionContext;
use super::helpers::{
    ObservationBucket, classify_observation, display_text, elapsed_since, join_notes,
    severity_label,
};
use crate::types::{
    Bundle, Observation, Properties, PropertyGroup, PropertySelection, Resource, SymptomItem, Track,
};

/// Observation records classified as symptoms, one item per record in
/// bundle order.
pub fn extract_symptoms(bundle: &Bundle, context: &mut ConversionContext) -> Vec<SymptomItem> {
    let mut items = Vec::new();

    for obs in bundle.resources().filter_map(|r| match r {
        Resource::Observation(obs) => Some(obs),
        _ => None,
    }) {
        if classify_observation(obs) != Some(ObservationBucket::Symptom) {
            continue;
        }

        let name = obs
            .code
            .as_ref()
            .and_then(display_text)
            .unwrap_or("Unknown Symptom")
            .to_string();

        let properties = symptom_properties(obs, context);
        let index = items.len();

        items.push(SymptomItem {
            id: context.next_id("s"),
            name,
            icd10_code: String::new(),
            icd10_name: String::new(),
            track: Track::new(index),
            properties,
            notes: join_notes(&obs.note),
        });
    }

    items
}

fn symptom_properties(obs: &Observation, context: &mut ConversionContext) -> Properties {
    let mut properties = BTreeMap::new();

    let component = |needle: &str| {
        obs.component.iter().find(|comp| {
            comp.code
                .as_ref()
                .and_then(display_text)
                .map(|text| text.to_lowercase().contains(needle))
                .unwrap_or(false)
        })
    };

    if let Some(severity) = component("severity").and_then(|c| c.value_codeable_concept.as_ref()) {
        properties.insert(
            "pg-2869689919".to_string(),
            PropertyGroup {
                name: "Severity".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: severity_label(Some(severity)).to_string(),
                    unit: None,
                }],
            },
        );
    }

    if let Some(laterality) = component("laterality")
        .and_then(|c| c.value_codeable_concept.as_ref())
        .and_then(display_text)
    {
        properties.insert(
            "pg-laterality".to_string(),
            PropertyGroup {
                name: "Laterality".to_string(),
                selection: vec![PropertySelection {
                    id: context.next_id("pr"),
                    value: laterality.to_string(),
                    unit: None,
                }],
            },
        );
    }

    if let Some(duration) = elapsed_since(obs.effective_date_time.as_deref(), context.now()) {
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

    properties
}
