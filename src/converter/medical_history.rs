use super::context::ConversionContext;
use super::helpers::{
    AllergyBucket, ConditionBucket, ObservationBucket, capitalize, classify_allergy,
    classify_condition, classify_observation, display_text, join_notes, medication_display,
    normalized_date, parsed_date, since,
};
use chrono::Datelike;

use crate::types::{
    AllergyItem, Bundle, ConditionHistoryItem, CurrentMedicationItem, DoseSpec, DrugAllergyItem,
    ExaminationItem, FamilyHistoryItem, FrequencySpec, LifestyleItem, MonthYear, PastProcedureItem,
    PatientHistory, Resource, TravelHistoryItem,
};

/// The structured patient-history groups. Vitals and examinations live
/// beside this block in the output and are extracted separately.
pub fn extract_patient_history(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> PatientHistory {
    PatientHistory {
        patient_medical_conditions: conditions(bundle, context),
        current_medications: current_medications(bundle, context),
        family_history: family_history(bundle, context),
        lifestyle_habits: lifestyle_habits(bundle, context),
        food_other_allergy: food_other_allergies(bundle, context),
        drug_allergy: drug_allergies(bundle, context),
        past_procedures: past_procedures(bundle, context),
        recent_travel_history: travel_history(bundle, context),
        other_medical_history: Vec::new(),
    }
}

/// Problem-list conditions, as opposed to the encounter diagnoses of the
/// diagnosis bucket.
fn conditions(bundle: &Bundle, context: &mut ConversionContext) -> Vec<ConditionHistoryItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Condition(condition)
                if classify_condition(condition) == Some(ConditionBucket::ProblemList) =>
            {
                Some(condition)
            }
            _ => None,
        })
        .map(|condition| ConditionHistoryItem {
            id: context.next_id("d"),
            name: condition
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown Condition")
                .to_string(),
            status: condition
                .clinical_status
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Active")
                .to_string(),
            reported_at: normalized_date(condition.recorded_date.as_deref(), context.now()),
            since: since(condition.onset_date_time.as_deref(), context.now()),
            notes: join_notes(&condition.note),
        })
        .collect()
}

/// Every MedicationStatement is a current medication; the EMR has no
/// structured dosage for reported medications, so the dose block carries
/// the fixed one-tablet default.
fn current_medications(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> Vec<CurrentMedicationItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::MedicationStatement(statement) => Some(statement),
            _ => None,
        })
        .map(|statement| {
            let name = medication_display(statement.medication.as_ref())
                .unwrap_or_else(|| "Unknown Medication".to_string());
            let notes = join_notes(&statement.note);

            CurrentMedicationItem {
                id: context.next_id("b"),
                name: name.clone(),
                status: capitalize(statement.status.as_deref().unwrap_or("Active")),
                generic_id: context.next_id("g"),
                generic_name: name,
                df_id: context.next_id("df"),
                reported_at: normalized_date(statement.date_asserted.as_deref(), context.now()),
                since: since(statement.effective_date_time.as_deref(), context.now()),
                dosage_form: "tablet".to_string(),
                dose: DoseSpec {
                    custom: "1 tablet".to_string(),
                    id: Some(context.next_id("du")),
                    value: "1".to_string(),
                    unit: "tablet".to_string(),
                },
                frequency: FrequencySpec {
                    kind: None,
                    custom: notes.clone().unwrap_or_else(|| "As directed".to_string()),
                },
                timing: String::new(),
                notes,
            }
        })
        .collect()
}

fn family_history(bundle: &Bundle, context: &mut ConversionContext) -> Vec<FamilyHistoryItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::FamilyMemberHistory(history) => Some(history),
            _ => None,
        })
        .map(|history| {
            let relationship = history
                .relationship
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown");

            FamilyHistoryItem {
                id: context.next_id("d"),
                name: history
                    .condition
                    .first()
                    .and_then(|c| c.code.as_ref())
                    .and_then(display_text)
                    .unwrap_or("Unknown Condition")
                    .to_string(),
                status: if history.status.as_deref() == Some("completed") {
                    "Active"
                } else {
                    "Unknown"
                }
                .to_string(),
                reported_at: normalized_date(history.date.as_deref(), context.now()),
                who: capitalize(relationship),
                notes: join_notes(&history.note),
            }
        })
        .collect()
}

fn lifestyle_habits(bundle: &Bundle, context: &mut ConversionContext) -> Vec<LifestyleItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Observation(obs)
                if classify_observation(obs) == Some(ObservationBucket::Lifestyle) =>
            {
                Some(obs)
            }
            _ => None,
        })
        .map(|obs| {
            let status = obs
                .value_string
                .clone()
                .unwrap_or_else(|| "Active".to_string());

            LifestyleItem {
                id: context.next_id("locale"),
                name: obs
                    .code
                    .as_ref()
                    .and_then(display_text)
                    .unwrap_or("Unknown Habit")
                    .to_string(),
                status: status.clone(),
                reported_at: normalized_date(obs.issued.as_deref(), context.now()),
                since: since(obs.effective_date_time.as_deref(), context.now()),
                frequency: FrequencySpec {
                    kind: None,
                    custom: status,
                },
                notes: join_notes(&obs.note),
            }
        })
        .collect()
}

fn food_other_allergies(bundle: &Bundle, context: &mut ConversionContext) -> Vec<AllergyItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::AllergyIntolerance(allergy)
                if classify_allergy(allergy) == Some(AllergyBucket::FoodOther) =>
            {
                Some(allergy)
            }
            _ => None,
        })
        .map(|allergy| AllergyItem {
            id: context.next_id("a"),
            name: allergy
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown Allergy")
                .to_string(),
            status: capitalize(
                allergy
                    .clinical_status
                    .as_ref()
                    .and_then(display_text)
                    .unwrap_or("Active"),
            ),
            reported_at: normalized_date(allergy.recorded_date.as_deref(), context.now()),
            since: since(allergy.onset_date_time.as_deref(), context.now()),
            notes: join_notes(&allergy.note),
        })
        .collect()
}

fn drug_allergies(bundle: &Bundle, context: &mut ConversionContext) -> Vec<DrugAllergyItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::AllergyIntolerance(allergy)
                if classify_allergy(allergy) == Some(AllergyBucket::Drug) =>
            {
                Some(allergy)
            }
            _ => None,
        })
        .map(|allergy| {
            let name = allergy
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown Drug")
                .to_string();

            DrugAllergyItem {
                id: context.next_id("b"),
                name: name.clone(),
                status: capitalize(
                    allergy
                        .clinical_status
                        .as_ref()
                        .and_then(display_text)
                        .unwrap_or("Active"),
                ),
                generic_id: context.next_id("g"),
                generic_name: name,
                reported_at: normalized_date(allergy.recorded_date.as_deref(), context.now()),
                since: since(allergy.onset_date_time.as_deref(), context.now()),
                notes: join_notes(&allergy.note),
            }
        })
        .collect()
}

fn past_procedures(bundle: &Bundle, context: &mut ConversionContext) -> Vec<PastProcedureItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Procedure(procedure)
                if procedure.status.as_deref() == Some("completed") =>
            {
                Some(procedure)
            }
            _ => None,
        })
        .map(|procedure| {
            let performed = procedure
                .performed_date_time
                .as_deref()
                .or_else(|| procedure.performed_period.as_ref()?.start.as_deref());

            let on = parsed_date(performed).map(|date| MonthYear {
                yyyy: date.year().to_string(),
                mm: format!("{:02}", date.month()),
            });

            PastProcedureItem {
                id: context.next_id("p"),
                name: procedure
                    .code
                    .as_ref()
                    .and_then(display_text)
                    .unwrap_or("Unknown Procedure")
                    .to_string(),
                status: "Active".to_string(),
                reported_at: normalized_date(
                    procedure.performed_date_time.as_deref(),
                    context.now(),
                ),
                on,
                notes: join_notes(&procedure.note),
            }
        })
        .collect()
}

fn travel_history(bundle: &Bundle, context: &mut ConversionContext) -> Vec<TravelHistoryItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Observation(obs)
                if classify_observation(obs) == Some(ObservationBucket::Travel) =>
            {
                Some(obs)
            }
            _ => None,
        })
        .map(|obs| TravelHistoryItem {
            id: context.next_id("locale-recentTravelHistory"),
            name: obs
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Travel History")
                .to_string(),
            notes: join_notes(&obs.note)
                .or_else(|| obs.value_string.clone())
                .unwrap_or_default(),
            status: String::new(),
            reported_at: normalized_date(obs.issued.as_deref(), context.now()),
        })
        .collect()
}

pub fn extract_examinations(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> Vec<ExaminationItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Observation(obs)
                if classify_observation(obs) == Some(ObservationBucket::Examination) =>
            {
                Some(obs)
            }
            _ => None,
        })
        .map(|obs| {
            let name = obs
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown Examination")
                .to_string();

            ExaminationItem {
                id: context.next_id("s"),
                common_name: name.clone(),
                name,
            }
        })
        .collect()
}
