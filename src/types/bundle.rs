use serde::Deserialize;
use serde_json::{Number, Value};

/// Top-level FHIR Bundle as emitted by the scribe. Only the fields the
/// conversion consumes are modeled; everything else is ignored on
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType", default)]
    pub resource_type: String,

    #[serde(default)]
    pub entry: Vec<Entry>,
}

impl Bundle {
    /// Iterates the typed resources of the bundle in entry order, skipping
    /// empty entries and entries whose body could not be read as its
    /// declared type.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().filter_map(|entry| match &entry.resource {
            Some(ResourceEnvelope::Known(resource)) => Some(resource),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub resource: Option<ResourceEnvelope>,
}

/// A bundle entry body. Records of a known type that fail typed
/// deserialization degrade to `Other` and are skipped, so one malformed
/// record never fails the whole conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceEnvelope {
    Known(Resource),
    Other(Value),
}

/// The resource types the conversion understands. Any other
/// `resourceType` tag lands in `Unknown` and passes through untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Condition(Condition),
    Observation(Observation),
    MedicationRequest(MedicationRequest),
    MedicationStatement(MedicationStatement),
    MedicationAdministration(MedicationAdministration),
    ServiceRequest(ServiceRequest),
    Procedure(Procedure),
    AllergyIntolerance(AllergyIntolerance),
    FamilyMemberHistory(FamilyMemberHistory),
    DocumentReference(DocumentReference),
    Composition(Composition),
    Encounter(Encounter),
    Appointment(Appointment),
    CarePlan(CarePlan),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeableConcept {
    pub text: Option<String>,
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Quantity {
    pub value: Option<Number>,
    pub unit: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// R5 medication reference: either an inline concept or bare text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MedicationField {
    pub concept: Option<CodeableConcept>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub category: Vec<CodeableConcept>,
    pub code: Option<CodeableConcept>,

    #[serde(rename = "clinicalStatus")]
    pub clinical_status: Option<CodeableConcept>,

    pub severity: Option<CodeableConcept>,

    #[serde(rename = "bodySite")]
    pub body_site: Vec<CodeableConcept>,

    pub note: Vec<Annotation>,

    #[serde(rename = "onsetDateTime")]
    pub onset_date_time: Option<String>,

    #[serde(rename = "recordedDate")]
    pub recorded_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Observation {
    pub id: Option<String>,
    pub category: Vec<CodeableConcept>,
    pub code: Option<CodeableConcept>,
    pub component: Vec<ObservationComponent>,

    #[serde(rename = "valueQuantity")]
    pub value_quantity: Option<Quantity>,

    #[serde(rename = "valueString")]
    pub value_string: Option<String>,

    pub interpretation: Vec<CodeableConcept>,
    pub note: Vec<Annotation>,

    #[serde(rename = "effectiveDateTime")]
    pub effective_date_time: Option<String>,

    pub issued: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObservationComponent {
    pub code: Option<CodeableConcept>,

    #[serde(rename = "valueCodeableConcept")]
    pub value_codeable_concept: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MedicationRequest {
    pub medication: Option<MedicationField>,

    #[serde(rename = "dosageInstruction")]
    pub dosage_instruction: Vec<Dosage>,

    #[serde(rename = "dispenseRequest")]
    pub dispense_request: Option<DispenseRequest>,

    pub note: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Dosage {
    pub text: Option<String>,

    #[serde(rename = "doseAndRate")]
    pub dose_and_rate: Vec<DoseAndRate>,

    pub timing: Option<Timing>,
    pub route: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DoseAndRate {
    #[serde(rename = "doseQuantity")]
    pub dose_quantity: Option<Quantity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub repeat: Option<TimingRepeat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimingRepeat {
    pub frequency: Option<u32>,
    pub period: Option<Number>,

    #[serde(rename = "periodUnit")]
    pub period_unit: Option<String>,

    pub when: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DispenseRequest {
    #[serde(rename = "expectedSupplyDuration")]
    pub expected_supply_duration: Option<Quantity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MedicationStatement {
    pub medication: Option<MedicationField>,
    pub status: Option<String>,
    pub note: Vec<Annotation>,

    #[serde(rename = "effectiveDateTime")]
    pub effective_date_time: Option<String>,

    #[serde(rename = "dateAsserted")]
    pub date_asserted: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MedicationAdministration {
    pub medication: Option<MedicationField>,
    pub status: Option<String>,
}

/// ServiceRequest.code appears both as an R5 CodeableReference (wrapping a
/// `concept`) and as a plain CodeableConcept; both shapes share this struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceCode {
    pub concept: Option<CodeableConcept>,
    pub text: Option<String>,
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRequest {
    pub category: Vec<CodeableConcept>,
    pub code: Option<ServiceCode>,
    pub note: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Procedure {
    pub code: Option<CodeableConcept>,
    pub status: Option<String>,
    pub note: Vec<Annotation>,

    #[serde(rename = "performedDateTime")]
    pub performed_date_time: Option<String>,

    #[serde(rename = "performedPeriod")]
    pub performed_period: Option<Period>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllergyIntolerance {
    /// Plain code strings in FHIR ("food", "medication", "environment", ...).
    pub category: Vec<String>,
    pub code: Option<CodeableConcept>,

    #[serde(rename = "clinicalStatus")]
    pub clinical_status: Option<CodeableConcept>,

    pub note: Vec<Annotation>,

    #[serde(rename = "onsetDateTime")]
    pub onset_date_time: Option<String>,

    #[serde(rename = "recordedDate")]
    pub recorded_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FamilyMemberHistory {
    pub relationship: Option<CodeableConcept>,
    pub condition: Vec<FamilyCondition>,
    pub status: Option<String>,
    pub note: Vec<Annotation>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FamilyCondition {
    pub code: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentReference {
    pub content: Vec<DocumentContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentContent {
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Attachment {
    /// Base64-encoded inline document body.
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Composition {
    pub section: Vec<CompositionSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompositionSection {
    pub title: Option<String>,
    pub text: Option<Narrative>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub div: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Encounter {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Appointment {
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CarePlan {
    pub period: Option<Period>,
}
