use serde_json::Map;

use super::context::ConversionContext;
use super::helpers::{ObservationBucket, classify_observation, display_text, normalized_date};
use crate::types::{Bundle, Interpretation, LabUnit, LabVitalItem, Resource};

/// Observation records classified as laboratory results.
pub fn extract_lab_vitals(bundle: &Bundle, context: &mut ConversionContext) -> Vec<LabVitalItem> {
    let mut items = Vec::new();

    for obs in bundle.resources().filter_map(|r| match r {
        Resource::Observation(obs) => Some(obs),
        _ => None,
    }) {
        if classify_observation(obs) != Some(ObservationBucket::LabResult) {
            continue;
        }

        let name = obs
            .code
            .as_ref()
            .and_then(display_text)
            .unwrap_or("Unknown Test")
            .to_string();

        let mut value = String::new();
        let mut unit = LabUnit {
            name: String::new(),
            id: context.next_id("lu"),
            ref_range: Map::new(),
        };

        if let Some(quantity) = &obs.value_quantity {
            value = quantity
                .value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default();
            unit.name = quantity.unit.clone().unwrap_or_default();
        } else if let Some(text) = &obs.value_string {
            value = text.clone();
        }

        let interpretation = obs
            .interpretation
            .first()
            .and_then(display_text)
            .map(|label| Interpretation {
                id: context.next_id("sm"),
                value: label.to_string(),
                eka_id: context.next_id("sm"),
                name_list: vec![label.to_string()],
            });

        items.push(LabVitalItem {
            id: context.next_id("lb"),
            unit_display_name: name.clone(),
            name,
            value,
            interpretation,
            date: normalized_date(
                obs.effective_date_time.as_deref().or(obs.issued.as_deref()),
                context.now(),
            ),
            remark: String::new(),
            unit: unit.clone(),
            all_units: vec![unit],
            is_panel: false,
            entity_id: obs
                .id
                .clone()
                .unwrap_or_else(|| context.next_id("entity")),
        });
    }

    items
}
