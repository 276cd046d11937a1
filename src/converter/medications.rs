use super::context::ConversionContext;
use super::helpers::{capitalize, join_notes, medication_display};
use crate::types::{
    Bundle, DosageSummary, DoseSpec, DurationSpec, FrequencySpec, MedicationItem,
    MedicationRequest, Resource, Track,
};

/// All MedicationRequest records become active medication orders. Every
/// dosage field degrades to a documented default when the source does not
/// carry it: dose "1 tablet", frequency "As directed", duration "7 Days".
pub fn extract_medications(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> Vec<MedicationItem> {
    let mut items = Vec::new();

    for request in bundle.resources().filter_map(|r| match r {
        Resource::MedicationRequest(request) => Some(request),
        _ => None,
    }) {
        let index = items.len();
        items.push(medication_item(request, index, context));
    }

    items
}

fn medication_item(
    request: &MedicationRequest,
    index: usize,
    context: &mut ConversionContext,
) -> MedicationItem {
    let name = medication_display(request.medication.as_ref())
        .unwrap_or_else(|| "Unknown Medication".to_string());
    let notes = join_notes(&request.note);

    let mut dose = DoseSpec {
        custom: "1 tablet".to_string(),
        id: None,
        value: "1".to_string(),
        unit: "tablet".to_string(),
    };
    let mut frequency = FrequencySpec {
        kind: Some("custom".to_string()),
        custom: "As directed".to_string(),
    };
    let mut timing = String::new();
    let mut dosage_text: Option<String> = None;

    if let Some(instruction) = request.dosage_instruction.first() {
        dosage_text = instruction.text.clone();

        if let Some(quantity) = instruction
            .dose_and_rate
            .first()
            .and_then(|dr| dr.dose_quantity.as_ref())
        {
            if let Some(value) = &quantity.value {
                let unit = quantity.unit.as_deref().unwrap_or("tablet");
                dose = DoseSpec {
                    custom: format!("{value} {unit}"),
                    id: Some(context.next_id("du")),
                    value: value.to_string(),
                    unit: unit.to_string(),
                };
            }
        }

        if let Some(repeat) = instruction.timing.as_ref().and_then(|t| t.repeat.as_ref()) {
            if let (Some(freq), Some(_), Some(period_unit)) =
                (repeat.frequency, &repeat.period, &repeat.period_unit)
            {
                let plural = if freq > 1 { "s" } else { "" };
                frequency.custom = format!("{freq} time{plural} per {period_unit}");
            }

            if let Some(when) = repeat.when.first() {
                timing = meal_timing(when).to_string();
            }
        }
    }

    let duration = supply_duration(request);

    // Prescription-pad summary block mirrors the structured fields.
    let dosage = DosageSummary {
        unit: dose.unit.clone(),
        unit_name: dose.unit.clone(),
        unit_id: dose.id.clone(),
        dosage: frequency.custom.clone(),
        dosage_form: dose.unit.clone(),
        df_id: context.next_id("df"),
        days: duration.value.clone(),
        food: if timing.is_empty() { "SF" } else { "AF" }.to_string(),
    };

    MedicationItem {
        id: context.next_id("b"),
        name: name.clone(),
        dosage_form: dose.unit.clone(),
        df_id: context.next_id("df"),
        generic_id: context.next_id("g"),
        generic_name: name.clone(),
        product_type: capitalize(&dose.unit),
        instruction: dosage_text.or(notes),
        kind: "Medicines".to_string(),
        track: Track::new(index),
        common_name: name,
        dose,
        frequency,
        timing,
        duration,
        dosage,
    }
}

fn supply_duration(request: &MedicationRequest) -> DurationSpec {
    let quantity = request
        .dispense_request
        .as_ref()
        .and_then(|dr| dr.expected_supply_duration.as_ref());

    match quantity.and_then(|q| q.value.as_ref().map(|v| (v, q))) {
        Some((value, quantity)) => {
            let unit = duration_unit(
                quantity
                    .code
                    .as_deref()
                    .or(quantity.unit.as_deref())
                    .unwrap_or_default(),
            );
            DurationSpec {
                value: value.to_string(),
                unit: unit.to_string(),
                custom: format!("{value} {unit}"),
            }
        }
        None => DurationSpec {
            value: "7".to_string(),
            unit: "Days".to_string(),
            custom: "7 Days".to_string(),
        },
    }
}

/// Meal-relative timing tag for a FHIR event-timing code; unmapped codes
/// yield no tag.
fn meal_timing(when: &str) -> &'static str {
    match when {
        "PC" => "After Meal",
        "AC" => "Before Meal",
        "C" => "With Meal",
        "CM" => "In the Morning",
        "CV" => "In the Evening",
        "HS" => "At Bedtime",
        _ => "",
    }
}

fn duration_unit(unit: &str) -> &'static str {
    match unit {
        "d" | "day" => "Days",
        "wk" | "week" => "Weeks",
        "mo" | "month" => "Months",
        "h" | "hour" => "Hours",
        _ => "Days",
    }
}
