use serde_json::Map;

use super::context::ConversionContext;
use super::helpers::{ObservationBucket, classify_observation, display_text, normalized_date};
use crate::types::{Bundle, Resource, VitalItem, VitalValue};

/// Observation records classified as vitals. Well-known vital kinds map to
/// the EMR's fixed vital-type identifiers; anything else gets a generated
/// id.
pub fn extract_vitals(bundle: &Bundle, context: &mut ConversionContext) -> Vec<VitalItem> {
    let mut items = Vec::new();

    for obs in bundle.resources().filter_map(|r| match r {
        Resource::Observation(obs) => Some(obs),
        _ => None,
    }) {
        if classify_observation(obs) != Some(ObservationBucket::Vital) {
            continue;
        }

        let name = obs
            .code
            .as_ref()
            .and_then(display_text)
            .unwrap_or("Unknown Vital")
            .to_string();

        let value = if let Some(quantity) = &obs.value_quantity {
            VitalValue {
                qt: quantity
                    .value
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                unit: quantity.unit.clone().unwrap_or_default(),
                code_id: Some(context.next_id("vu")),
                safe: Map::new(),
            }
        } else if let Some(text) = &obs.value_string {
            VitalValue {
                qt: text.clone(),
                unit: String::new(),
                code_id: None,
                safe: Map::new(),
            }
        } else {
            VitalValue {
                qt: String::new(),
                unit: String::new(),
                code_id: None,
                safe: Map::new(),
            }
        };

        items.push(VitalItem {
            id: vital_type_id(&name, context),
            dis_name: name.clone(),
            name,
            value,
            date: normalized_date(
                obs.effective_date_time.as_deref().or(obs.issued.as_deref()),
                context.now(),
            ),
        });
    }

    items
}

/// Fixed EMR identifiers for the vital kinds the intake screen renders
/// natively.
fn vital_type_id(name: &str, context: &mut ConversionContext) -> String {
    let name = name.to_lowercase();

    if name.contains("blood pressure") || name.contains("bp") {
        "v-1365277675".to_string()
    } else if name.contains("pulse") || name.contains("heart rate") {
        "lb-1201285132".to_string()
    } else if name.contains("temperature") {
        "v-temperature".to_string()
    } else if name.contains("respiratory") || name.contains("respiration") {
        "v-respiratory".to_string()
    } else if name.contains("oxygen") || name.contains("spo2") {
        "v-oxygen".to_string()
    } else {
        context.next_id("v")
    }
}
