use chrono::{TimeZone, Utc};
use fhir_emr_intake::*;
use serde_json::{Value, json};

/// Bundle from raw resource bodies, one entry per resource.
#[allow(dead_code)]
pub fn bundle(resources: Vec<Value>) -> Bundle {
    let entries: Vec<Value> = resources
        .into_iter()
        .map(|resource| json!({ "resource": resource }))
        .collect();
    serde_json::from_value(json!({ "resourceType": "Bundle", "entry": entries })).unwrap()
}

/// Context pinned to 2024-06-01T10:00:00Z with sequential ids, so converted
/// records are exactly reproducible.
#[allow(dead_code)]
pub fn fixed_context() -> ConversionContext {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    ConversionContext::with_parts(now, Box::new(SequentialIds::default()))
}

#[allow(dead_code)]
pub fn convert_fixed(resources: Vec<Value>) -> IntakeRecord {
    IntakeConverter::new()
        .convert_with_context(&bundle(resources), &mut fixed_context())
        .unwrap()
}

/// Observation with one category display and a coded name.
#[allow(dead_code)]
pub fn observation(category: &str, code: &str) -> Value {
    json!({
        "resourceType": "Observation",
        "category": [{ "coding": [{ "display": category }] }],
        "code": { "text": code }
    })
}

/// Condition with one category carrying both a code and a display.
#[allow(dead_code)]
pub fn condition(category_code: &str, category_display: &str, name: &str) -> Value {
    json!({
        "resourceType": "Condition",
        "category": [{
            "coding": [{ "code": category_code, "display": category_display }]
        }],
        "code": { "text": name }
    })
}
