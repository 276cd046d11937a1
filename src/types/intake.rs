use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// The complete clinical-intake record submitted to the EMR. Every key is
/// always present; buckets without matching input serialize as empty
/// collections, never as missing keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeRecord {
    #[serde(rename = "allVaccines")]
    pub all_vaccines: Vec<Value>,

    pub language: String,

    pub symptoms: Vec<SymptomItem>,
    pub diagnosis: Vec<DiagnosisItem>,
    pub medications: Vec<MedicationItem>,
    pub injections: Vec<InjectionItem>,

    #[serde(rename = "labTests")]
    pub lab_tests: Vec<LabTestItem>,

    pub followup: Followup,

    pub meta: RecordMeta,

    #[serde(rename = "prescriptionNotes")]
    pub prescription_notes: PrescriptionNotes,

    #[serde(rename = "medicalHistory")]
    pub medical_history: MedicalHistory,

    #[serde(rename = "labVitals")]
    pub lab_vitals: Vec<LabVitalItem>,

    #[serde(rename = "administeredVaccines")]
    pub administered_vaccines: Vec<Value>,

    pub procedures: Vec<ProcedureItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMeta {
    #[serde(rename = "autoCopyStatus")]
    pub auto_copy_status: String,
}

/// Origin metadata for downstream UI search ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub index: usize,
    pub source: String,
    pub label: String,
}

impl Track {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            source: "API_SEARCH".to_string(),
            label: "AS_SEARCH".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyGroup {
    pub name: String,
    pub selection: Vec<PropertySelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySelection {
    pub id: String,
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

pub type Properties = BTreeMap<String, PropertyGroup>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomItem {
    pub id: String,
    pub name: String,
    pub icd10_code: String,
    pub icd10_name: String,
    pub track: Track,
    pub properties: Properties,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisItem {
    pub id: String,
    pub name: String,
    pub icd10_code: String,
    pub icd10_name: String,
    pub track: Track,
    pub properties: Properties,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseSpec {
    pub custom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub value: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub custom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSpec {
    pub value: String,
    pub unit: String,
    pub custom: String,
}

/// Flattened per-medication summary the EMR prescription pad reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosageSummary {
    pub unit: String,
    pub unit_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,

    pub dosage: String,
    pub dosage_form: String,
    pub df_id: String,
    pub days: String,
    pub food: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationItem {
    pub id: String,
    pub name: String,
    pub dosage_form: String,
    pub df_id: String,
    pub dose: DoseSpec,
    pub generic_id: String,
    pub generic_name: String,
    pub frequency: FrequencySpec,
    pub timing: String,
    pub duration: DurationSpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    pub product_type: String,
    pub kind: String,
    pub track: Track,
    pub common_name: String,
    pub dosage: DosageSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjectionItem {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabTestItem {
    pub id: String,
    pub name: String,
    pub common_name: String,
    pub book: bool,
    pub metadata: Map<String, Value>,
    pub hxng_only: bool,
    pub kind: String,
    pub track: Track,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabUnit {
    pub name: String,
    pub id: String,
    pub ref_range: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub id: String,
    pub value: String,
    pub eka_id: String,
    pub name_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabVitalItem {
    pub id: String,
    pub name: String,

    // The consumer API key really is misspelled.
    #[serde(rename = "unit_dislay_name")]
    pub unit_display_name: String,

    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Interpretation>,

    pub date: String,
    pub remark: String,
    pub unit: LabUnit,
    pub all_units: Vec<LabUnit>,
    pub is_panel: bool,
    pub entity_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Followup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "optionId", skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrescriptionNotes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "parsedText", skip_serializing_if = "Option::is_none")]
    pub parsed_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalHistory {
    #[serde(rename = "patientHistory")]
    pub patient_history: PatientHistory,

    pub vitals: Vec<VitalItem>,
    pub examinations: Vec<ExaminationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientHistory {
    #[serde(rename = "patientMedicalConditions")]
    pub patient_medical_conditions: Vec<ConditionHistoryItem>,

    #[serde(rename = "currentMedications")]
    pub current_medications: Vec<CurrentMedicationItem>,

    #[serde(rename = "familyHistory")]
    pub family_history: Vec<FamilyHistoryItem>,

    #[serde(rename = "lifestyleHabits")]
    pub lifestyle_habits: Vec<LifestyleItem>,

    #[serde(rename = "foodOtherAllergy")]
    pub food_other_allergy: Vec<AllergyItem>,

    #[serde(rename = "drugAllergy")]
    pub drug_allergy: Vec<DrugAllergyItem>,

    #[serde(rename = "pastProcedures")]
    pub past_procedures: Vec<PastProcedureItem>,

    #[serde(rename = "recentTravelHistory")]
    pub recent_travel_history: Vec<TravelHistoryItem>,

    #[serde(rename = "otherMedicalHistory")]
    pub other_medical_history: Vec<Value>,
}

/// "3 Days" style duration-since-onset annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinceSpec {
    pub custom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionHistoryItem {
    pub id: String,
    pub name: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<SinceSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentMedicationItem {
    pub id: String,
    pub name: String,
    pub status: String,
    pub generic_id: String,
    pub generic_name: String,
    pub df_id: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<SinceSpec>,

    pub dosage_form: String,
    pub dose: DoseSpec,
    pub frequency: FrequencySpec,
    pub timing: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyHistoryItem {
    pub id: String,
    pub name: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    pub who: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifestyleItem {
    pub id: String,
    pub name: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<SinceSpec>,

    pub frequency: FrequencySpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergyItem {
    pub id: String,
    pub name: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<SinceSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugAllergyItem {
    pub id: String,
    pub name: String,
    pub status: String,
    pub generic_id: String,
    pub generic_name: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<SinceSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthYear {
    pub yyyy: String,
    pub mm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PastProcedureItem {
    pub id: String,
    pub name: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<MonthYear>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelHistoryItem {
    pub id: String,
    pub name: String,
    pub notes: String,
    pub status: String,

    #[serde(rename = "reportedAt")]
    pub reported_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalValue {
    pub qt: String,
    pub unit: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_id: Option<String>,

    pub safe: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalItem {
    pub name: String,
    pub dis_name: String,
    pub id: String,
    pub value: VitalValue,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExaminationItem {
    pub id: String,
    pub name: String,
    pub common_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureItem {
    pub id: String,
    pub name: String,
}
