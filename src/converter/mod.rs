mod context;
mod diagnosis;
mod followup;
mod helpers;
mod injections;
mod lab_vitals;
mod medical_history;
mod medications;
mod prescription_notes;
mod procedures;
mod symptoms;
mod vitals;

pub use context::{ConversionContext, IdSource, RandomIds, SequentialIds};
pub use helpers::{
    AllergyBucket, ConditionBucket, ElapsedDuration, ObservationBucket, category_matches,
    classify_allergy, classify_condition, classify_observation, code_value, display_text,
    elapsed_since, join_notes, normalized_date, severity_label,
};

use serde_json::Value;
use tracing::debug;

use crate::error::{IntakeError, Result};
use crate::types::{Bundle, IntakeRecord, MedicalHistory, RecordMeta};

pub trait BundleConverter {
    fn convert(&self, bundle: &Bundle) -> Result<IntakeRecord>;
    fn convert_with_context(
        &self,
        bundle: &Bundle,
        context: &mut ConversionContext,
    ) -> Result<IntakeRecord>;
}

#[async_trait::async_trait]
pub trait AsyncBundleConverter {
    async fn convert_async(&self, bundle: &Bundle) -> Result<IntakeRecord>;
}

/// Converts one FHIR Bundle into the complete intake record. The
/// conversion is stateless: every call builds the whole record in one
/// bounded pass per bucket, and records that fail a bucket's inclusion
/// rule or carry malformed fields degrade locally instead of failing the
/// bundle.
#[derive(Debug, Clone, Default)]
pub struct IntakeConverter;

impl IntakeConverter {
    pub fn new() -> Self {
        Self
    }

    /// Structural check plus deserialization for callers holding raw JSON.
    /// The discriminant is checked on the raw value so a missing
    /// `resourceType` is reported as a structural rejection, not a serde
    /// error.
    pub fn convert_value(&self, value: &Value) -> Result<IntakeRecord> {
        match value.get("resourceType").and_then(Value::as_str) {
            Some("Bundle") => {}
            Some(other) => {
                return Err(IntakeError::invalid_bundle(format!(
                    "expected resourceType \"Bundle\", found \"{other}\""
                )));
            }
            None => {
                return Err(IntakeError::invalid_bundle(
                    "expected resourceType \"Bundle\", found none",
                ));
            }
        }

        let bundle: Bundle = serde_json::from_value(value.clone())?;
        self.convert(&bundle)
    }
}

impl BundleConverter for IntakeConverter {
    fn convert(&self, bundle: &Bundle) -> Result<IntakeRecord> {
        self.convert_with_context(bundle, &mut ConversionContext::new())
    }

    fn convert_with_context(
        &self,
        bundle: &Bundle,
        context: &mut ConversionContext,
    ) -> Result<IntakeRecord> {
        if bundle.resource_type != "Bundle" {
            return Err(IntakeError::invalid_bundle(format!(
                "expected resourceType \"Bundle\", found \"{}\"",
                bundle.resource_type
            )));
        }

        let record = IntakeRecord {
            all_vaccines: Vec::new(),
            language: "EN".to_string(),
            symptoms: symptoms::extract_symptoms(bundle, context),
            diagnosis: diagnosis::extract_diagnosis(bundle, context),
            medications: medications::extract_medications(bundle, context),
            injections: injections::extract_injections(bundle, context),
            lab_tests: lab_tests::extract_lab_tests(bundle, context),
            followup: followup::extract_followup(bundle, context.now()),
            meta: RecordMeta {
                auto_copy_status: "REQUIRED".to_string(),
            },
            prescription_notes: prescription_notes::extract_prescription_notes(bundle, context),
            medical_history: MedicalHistory {
                patient_history: medical_history::extract_patient_history(bundle, context),
                vitals: vitals::extract_vitals(bundle, context),
                examinations: medical_history::extract_examinations(bundle, context),
            },
            lab_vitals: lab_vitals::extract_lab_vitals(bundle, context),
            administered_vaccines: Vec::new(),
            procedures: procedures::extract_procedures(bundle, context),
        };

        debug!(
            entries = bundle.entry.len(),
            symptoms = record.symptoms.len(),
            diagnosis = record.diagnosis.len(),
            medications = record.medications.len(),
            lab_tests = record.lab_tests.len(),
            lab_vitals = record.lab_vitals.len(),
            "converted bundle to intake record"
        );

        Ok(record)
    }
}

#[async_trait::async_trait]
impl AsyncBundleConverter for IntakeConverter {
    /// Trivial async twin for task-based callers; identical semantics.
    async fn convert_async(&self, bundle: &Bundle) -> Result<IntakeRecord> {
        self.convert(bundle)
    }
}
