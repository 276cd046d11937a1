mod common;

use common::*;
use serde_json::json;

#[test]
fn medication_without_dosage_gets_documented_defaults() {
    let record = convert_fixed(vec![json!({
        "resourceType": "MedicationRequest",
        "medication": { "concept": { "text": "Paracetamol" } }
    })]);

    let med = &record.medications[0];
    assert_eq!(med.name, "Paracetamol");
    assert_eq!(med.dose.custom, "1 tablet");
    assert_eq!(med.dose.value, "1");
    assert_eq!(med.dose.unit, "tablet");
    assert_eq!(med.frequency.custom, "As directed");
    assert_eq!(med.frequency.kind.as_deref(), Some("custom"));
    assert_eq!(med.duration.custom, "7 Days");
    assert_eq!(med.timing, "");
    assert_eq!(med.product_type, "Tablet");
    assert_eq!(med.kind, "Medicines");
    assert_eq!(med.dosage.food, "SF");
    assert_eq!(med.dosage.days, "7");
}

#[test]
fn medication_dosage_fields_are_extracted() {
    let record = convert_fixed(vec![json!({
        "resourceType": "MedicationRequest",
        "medication": { "concept": { "text": "Amoxicillin" } },
        "dosageInstruction": [{
            "text": "Take with water",
            "doseAndRate": [{ "doseQuantity": { "value": 2, "unit": "capsule" } }],
            "timing": { "repeat": {
                "frequency": 3,
                "period": 1,
                "periodUnit": "day",
                "when": ["AC"]
            }}
        }],
        "dispenseRequest": {
            "expectedSupplyDuration": { "value": 2, "code": "wk" }
        }
    })]);

    let med = &record.medications[0];
    assert_eq!(med.dose.custom, "2 capsule");
    assert_eq!(med.dose.value, "2");
    assert_eq!(med.dose.unit, "capsule");
    assert!(med.dose.id.is_some());
    assert_eq!(med.frequency.custom, "3 times per day");
    assert_eq!(med.timing, "Before Meal");
    assert_eq!(med.duration.custom, "2 Weeks");
    assert_eq!(med.instruction.as_deref(), Some("Take with water"));
    assert_eq!(med.dosage_form, "capsule");
    assert_eq!(med.dosage.dosage, "3 times per day");
    assert_eq!(med.dosage.food, "AF");
    assert_eq!(med.dosage.days, "2");
}

#[test]
fn single_frequency_is_not_pluralized() {
    let record = convert_fixed(vec![json!({
        "resourceType": "MedicationRequest",
        "medication": { "text": "Levothyroxine" },
        "dosageInstruction": [{
            "timing": { "repeat": { "frequency": 1, "period": 1, "periodUnit": "day" } }
        }]
    })]);

    assert_eq!(record.medications[0].frequency.custom, "1 time per day");
}

#[test]
fn symptom_properties_cover_severity_laterality_and_since() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Observation",
        "category": [{ "coding": [{ "display": "Symptom" }] }],
        "code": { "text": "Ear pain" },
        "effectiveDateTime": "2024-05-22T10:00:00Z",
        "component": [
            {
                "code": { "text": "Severity" },
                "valueCodeableConcept": { "text": "Mild" }
            },
            {
                "code": { "text": "Laterality" },
                "valueCodeableConcept": { "text": "Left" }
            }
        ],
        "note": [{ "text": "worse at night" }]
    })]);

    let symptom = &record.symptoms[0];
    assert_eq!(symptom.name, "Ear pain");
    assert_eq!(symptom.notes.as_deref(), Some("worse at night"));

    let severity = &symptom.properties["pg-2869689919"];
    assert_eq!(severity.name, "Severity");
    assert_eq!(severity.selection[0].value, "Mild");

    let laterality = &symptom.properties["pg-laterality"];
    assert_eq!(laterality.selection[0].value, "Left");

    // 2024-05-22 is ten days before the pinned clock.
    let since = &symptom.properties["pg-1541659976"];
    assert_eq!(since.name, "Since");
    assert_eq!(since.selection[0].value, "10");
    assert_eq!(since.selection[0].unit.as_deref(), Some("Days"));
}

#[test]
fn diagnosis_extracts_icd10_and_status_properties() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Condition",
        "category": [{ "coding": [{ "code": "encounter-diagnosis", "display": "Encounter Diagnosis" }] }],
        "code": {
            "text": "Essential hypertension",
            "coding": [
                { "system": "http://snomed.info/sct", "code": "59621000" },
                { "system": "http://hl7.org/fhir/sid/icd-10", "code": "I10", "display": "Essential (primary) hypertension" }
            ]
        },
        "clinicalStatus": { "text": "Active" },
        "severity": { "text": "Severe" },
        "bodySite": [{ "text": "Left arm" }],
        "onsetDateTime": "2023-06-01T10:00:00Z"
    })]);

    let diagnosis = &record.diagnosis[0];
    assert_eq!(diagnosis.icd10_code, "I10");
    assert_eq!(diagnosis.icd10_name, "Essential (primary) hypertension");
    assert_eq!(diagnosis.properties["pg-002"].selection[0].value, "Active");
    assert_eq!(diagnosis.properties["pg-severity"].selection[0].value, "Severe");
    assert_eq!(diagnosis.properties["pg-bodysite"].selection[0].value, "Left arm");
    // 366 days before the pinned clock.
    assert_eq!(diagnosis.properties["pg-1541659976"].selection[0].value, "1");
    assert_eq!(
        diagnosis.properties["pg-1541659976"].selection[0].unit.as_deref(),
        Some("Years")
    );
}

#[test]
fn vitals_extract_quantity_and_fixed_blood_pressure_id() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Observation",
        "category": [{ "coding": [{ "display": "vital-signs" }] }],
        "code": { "text": "Blood Pressure" },
        "valueQuantity": { "value": 120, "unit": "mmHg" },
        "effectiveDateTime": "2024-06-01T09:00:00Z"
    })]);

    let vitals = &record.medical_history.vitals;
    assert_eq!(vitals.len(), 1);
    assert_eq!(vitals[0].id, "v-1365277675");
    assert_eq!(vitals[0].value.qt, "120");
    assert_eq!(vitals[0].value.unit, "mmHg");
    assert!(vitals[0].value.code_id.is_some());
    assert_eq!(vitals[0].date, "2024-06-01T09:00:00.000Z");
}

#[test]
fn lab_results_carry_interpretation_and_entity_id() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Observation",
        "id": "obs-42",
        "category": [{ "coding": [{ "display": "Laboratory" }] }],
        "code": { "text": "Hemoglobin" },
        "valueQuantity": { "value": 11, "unit": "g/dL" },
        "interpretation": [{ "text": "Low" }],
        "issued": "2024-05-30T08:00:00Z"
    })]);

    let lab = &record.lab_vitals[0];
    assert_eq!(lab.name, "Hemoglobin");
    assert_eq!(lab.unit_display_name, "Hemoglobin");
    assert_eq!(lab.value, "11");
    assert_eq!(lab.unit.name, "g/dL");
    assert_eq!(lab.entity_id, "obs-42");
    assert_eq!(lab.all_units.len(), 1);
    assert!(!lab.is_panel);

    let interpretation = lab.interpretation.as_ref().unwrap();
    assert_eq!(interpretation.value, "Low");
    assert_eq!(interpretation.name_list, vec!["Low".to_string()]);
}

#[test]
fn lab_orders_prefer_wrapped_concept_name() {
    let record = convert_fixed(vec![
        json!({
            "resourceType": "ServiceRequest",
            "category": [{ "coding": [{ "display": "Laboratory procedure" }] }],
            "code": { "concept": { "text": "Complete blood count" } }
        }),
        json!({
            "resourceType": "ServiceRequest",
            "category": [{ "coding": [{ "display": "Laboratory procedure" }] }],
            "code": { "coding": [{ "display": "Lipid panel" }] }
        }),
        json!({
            "resourceType": "ServiceRequest",
            "category": [{ "coding": [{ "display": "Imaging" }] }],
            "code": { "concept": { "text": "Chest X-ray" } }
        }),
    ]);

    let names: Vec<&str> = record.lab_tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Complete blood count", "Lipid panel"]);
    assert_eq!(record.lab_tests[0].kind, "Lab Tests");
    assert_eq!(record.lab_tests[1].track.index, 1);
}

#[test]
fn current_medication_statement_gets_default_dose_block() {
    let record = convert_fixed(vec![json!({
        "resourceType": "MedicationStatement",
        "medication": { "concept": { "text": "Metformin" } },
        "status": "active",
        "effectiveDateTime": "2024-03-03T10:00:00Z",
        "dateAsserted": "2024-05-30T08:00:00Z",
        "note": [{ "text": "500mg twice daily" }]
    })]);

    let meds = &record.medical_history.patient_history.current_medications;
    let med = &meds[0];
    assert_eq!(med.name, "Metformin");
    assert_eq!(med.status, "Active");
    assert_eq!(med.dosage_form, "tablet");
    assert_eq!(med.dose.custom, "1 tablet");
    assert_eq!(med.frequency.custom, "500mg twice daily");
    assert_eq!(med.frequency.kind, None);
    // 90 days before the pinned clock.
    assert_eq!(med.since.as_ref().unwrap().custom, "3 Months");
    assert_eq!(med.reported_at, "2024-05-30T08:00:00.000Z");
}

#[test]
fn family_history_capitalizes_relationship() {
    let record = convert_fixed(vec![json!({
        "resourceType": "FamilyMemberHistory",
        "status": "completed",
        "relationship": { "text": "mother" },
        "condition": [{ "code": { "text": "Breast cancer" } }],
        "date": "2024-01-01"
    })]);

    let family = &record.medical_history.patient_history.family_history;
    assert_eq!(family[0].name, "Breast cancer");
    assert_eq!(family[0].who, "Mother");
    assert_eq!(family[0].status, "Active");
}

#[test]
fn past_procedure_extracts_month_and_year() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Procedure",
        "status": "completed",
        "code": { "text": "Knee arthroscopy" },
        "performedPeriod": { "start": "2021-03-15T00:00:00Z" }
    })]);

    let past = &record.medical_history.patient_history.past_procedures;
    let on = past[0].on.as_ref().unwrap();
    assert_eq!(on.yyyy, "2021");
    assert_eq!(on.mm, "03");
}

#[test]
fn travel_history_notes_fall_back_to_value_string() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Observation",
        "code": { "text": "Recent trip" },
        "valueString": "Returned from Kenya last week"
    })]);

    let travel = &record.medical_history.patient_history.recent_travel_history;
    assert_eq!(travel[0].name, "Recent trip");
    assert_eq!(travel[0].notes, "Returned from Kenya last week");
    assert_eq!(travel[0].status, "");
}

#[test]
fn injections_default_missing_status_to_completed() {
    let record = convert_fixed(vec![
        json!({
            "resourceType": "MedicationAdministration",
            "medication": { "concept": { "text": "Insulin glargine" } },
            "status": "in-progress"
        }),
        json!({
            "resourceType": "MedicationAdministration",
            "medication": { "text": "Vitamin B12" }
        }),
    ]);

    assert_eq!(record.injections[0].name, "Insulin glargine");
    assert_eq!(record.injections[0].status, "in-progress");
    assert_eq!(record.injections[1].name, "Vitamin B12");
    assert_eq!(record.injections[1].status, "completed");
}

#[test]
fn followup_prefers_appointment_start() {
    let record = convert_fixed(vec![
        json!({ "resourceType": "Appointment", "start": "2024-06-15T09:00:00Z" }),
        json!({ "resourceType": "CarePlan", "period": { "end": "2024-07-01T00:00:00Z" } }),
    ]);

    assert_eq!(record.followup.date.as_deref(), Some("2024-06-15T09:00:00.000Z"));
    assert_eq!(record.followup.option_id.as_deref(), Some("MED_D"));
}

#[test]
fn followup_falls_back_to_care_plan_period_end() {
    let record = convert_fixed(vec![
        json!({ "resourceType": "Appointment" }),
        json!({ "resourceType": "CarePlan", "period": { "end": "2024-07-01T00:00:00Z" } }),
    ]);

    assert_eq!(record.followup.date.as_deref(), Some("2024-07-01T00:00:00.000Z"));
    assert_eq!(record.followup.option_id.as_deref(), Some("MED_D"));
}

#[test]
fn followup_is_empty_without_any_source() {
    let record = convert_fixed(vec![json!({ "resourceType": "CarePlan" })]);
    assert_eq!(record.followup.date, None);
    assert_eq!(record.followup.option_id, None);
}

#[test]
fn prescription_notes_decode_base64_attachment() {
    let record = convert_fixed(vec![json!({
        "resourceType": "DocumentReference",
        "content": [{ "attachment": { "data": "SGVsbG8=" } }]
    })]);

    assert_eq!(record.prescription_notes.parsed_text.as_deref(), Some("Hello"));
    assert_eq!(record.prescription_notes.text.as_deref(), Some("<p>Hello</p>"));
    assert!(record.prescription_notes.id.is_some());
}

#[test]
fn prescription_notes_fall_back_to_composition_section() {
    let record = convert_fixed(vec![json!({
        "resourceType": "Composition",
        "section": [
            { "title": "History", "text": { "div": "<div>ignored</div>" } },
            { "title": "Doctor Notes", "text": { "div": "<div><b>Rest</b> and hydrate</div>" } }
        ]
    })]);

    assert_eq!(
        record.prescription_notes.text.as_deref(),
        Some("<div><b>Rest</b> and hydrate</div>")
    );
    assert_eq!(
        record.prescription_notes.parsed_text.as_deref(),
        Some("Rest and hydrate")
    );
}

#[test]
fn document_reference_outranks_composition() {
    let record = convert_fixed(vec![
        json!({
            "resourceType": "Composition",
            "section": [{ "title": "Notes", "text": { "div": "<div>from composition</div>" } }]
        }),
        json!({
            "resourceType": "DocumentReference",
            "content": [{ "attachment": { "data": "ZnJvbSBkb2N1bWVudA==" } }]
        }),
    ]);

    assert_eq!(
        record.prescription_notes.parsed_text.as_deref(),
        Some("from document")
    );
}

#[test]
fn unknown_names_degrade_to_placeholders() {
    let record = convert_fixed(vec![
        json!({ "resourceType": "MedicationRequest" }),
        json!({ "resourceType": "MedicationAdministration" }),
        json!({
            "resourceType": "Observation",
            "category": [{ "coding": [{ "display": "Symptom" }] }]
        }),
        json!({ "resourceType": "AllergyIntolerance", "category": ["food"] }),
        json!({ "resourceType": "FamilyMemberHistory" }),
    ]);

    assert_eq!(record.medications[0].name, "Unknown Medication");
    assert_eq!(record.injections[0].name, "Unknown Injection");
    assert_eq!(record.symptoms[0].name, "Unknown Symptom");
    assert_eq!(
        record.medical_history.patient_history.food_other_allergy[0].name,
        "Unknown Allergy"
    );
    assert_eq!(
        record.medical_history.patient_history.family_history[0].name,
        "Unknown Condition"
    );
    assert_eq!(
        record.medical_history.patient_history.family_history[0].who,
        "Unknown"
    );
}
