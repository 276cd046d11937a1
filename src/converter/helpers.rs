use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::types::{
    AllergyIntolerance, Annotation, CodeableConcept, Condition, MedicationField, Observation,
    SinceSpec,
};

/// Preferred human-readable text of a coded concept: free text first, then
/// the first coding's display. Callers supply the "Unknown ..." placeholder.
pub fn display_text(concept: &CodeableConcept) -> Option<&str> {
    concept
        .text
        .as_deref()
        .or_else(|| concept.coding.first().and_then(|c| c.display.as_deref()))
}

/// Code string from the coding matching `system`, or the first coding when
/// no system is given.
pub fn code_value<'a>(concept: &'a CodeableConcept, system: Option<&str>) -> Option<&'a str> {
    let coding = match system {
        Some(system) => concept
            .coding
            .iter()
            .find(|c| c.system.as_deref() == Some(system)),
        None => concept.coding.first(),
    };
    coding.and_then(|c| c.code.as_deref())
}

/// Case-insensitive containment test over every category's display text.
pub fn category_matches(categories: &[CodeableConcept], needle: &str) -> bool {
    categories.iter().any(|cat| {
        display_text(cat)
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

/// All note texts on a record joined with `"; "`.
pub fn join_notes(notes: &[Annotation]) -> Option<String> {
    let texts: Vec<&str> = notes.iter().filter_map(|n| n.text.as_deref()).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("; "))
    }
}

/// Medication name from an R5 medication field (inline concept or bare
/// text), whichever is populated.
pub fn medication_display(medication: Option<&MedicationField>) -> Option<String> {
    let medication = medication?;
    if let Some(concept) = &medication.concept {
        if let Some(name) = display_text(concept) {
            return Some(name.to_string());
        }
    }
    medication.text.clone()
}

fn parse_fhir_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    // Partial "YYYY-MM" dates collapse to the first of the month.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Canonical RFC3339 timestamp for a FHIR date/dateTime. Absent or
/// unparsable input falls back to the conversion timestamp, so a missing
/// date is indistinguishable from "now" in the output; callers that need
/// the distinction check the raw field first.
pub fn normalized_date(raw: Option<&str>, now: DateTime<Utc>) -> String {
    raw.and_then(parse_fhir_date)
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Typed date for callers that need the calendar parts rather than the
/// canonical string.
pub fn parsed_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_fhir_date)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedDuration {
    pub value: String,
    pub unit: String,
}

/// Human-scale duration between a FHIR date and the conversion timestamp,
/// with the unit chosen by magnitude.
pub fn elapsed_since(raw: Option<&str>, now: DateTime<Utc>) -> Option<ElapsedDuration> {
    let onset = raw.and_then(parse_fhir_date)?;
    let diff = now.signed_duration_since(onset);
    let days = diff.num_days();

    let (value, unit) = if days < 1 {
        (diff.num_hours(), "Hours")
    } else if days < 30 {
        (days, "Days")
    } else if days < 365 {
        (days / 30, "Months")
    } else {
        (days / 365, "Years")
    };

    Some(ElapsedDuration {
        value: value.to_string(),
        unit: unit.to_string(),
    })
}

/// Duration-since-onset as the "3 Days" custom string the history buckets
/// carry.
pub fn since(raw: Option<&str>, now: DateTime<Utc>) -> Option<SinceSpec> {
    elapsed_since(raw, now).map(|d| SinceSpec {
        custom: format!("{} {}", d.value, d.unit),
    })
}

/// Coarse severity label from free text. Moderate is the default, including
/// when no text is present.
pub fn severity_label(concept: Option<&CodeableConcept>) -> &'static str {
    let Some(text) = concept.and_then(display_text) else {
        return "Moderate";
    };
    let text = text.to_lowercase();
    if text.contains("mild") || text.contains("low") {
        "Mild"
    } else if text.contains("severe") || text.contains("high") {
        "Severe"
    } else {
        "Moderate"
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Target bucket for an Observation. Membership is single-valued: the first
/// matching rule wins, so a record never lands in two buckets. Travel ranks
/// first because it is the only code-based rule (a social-history record
/// about a trip is travel history, not a lifestyle habit); the category
/// rules follow in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationBucket {
    Travel,
    Symptom,
    Vital,
    LabResult,
    Lifestyle,
    Examination,
}

pub fn classify_observation(obs: &Observation) -> Option<ObservationBucket> {
    let code_text = obs
        .code
        .as_ref()
        .and_then(display_text)
        .map(|t| t.to_lowercase())
        .unwrap_or_default();
    if code_text.contains("travel") || code_text.contains("trip") {
        return Some(ObservationBucket::Travel);
    }

    if category_matches(&obs.category, "symptom") {
        Some(ObservationBucket::Symptom)
    } else if category_matches(&obs.category, "vital") {
        Some(ObservationBucket::Vital)
    } else if category_matches(&obs.category, "laboratory") {
        Some(ObservationBucket::LabResult)
    } else if category_matches(&obs.category, "social") {
        Some(ObservationBucket::Lifestyle)
    } else if category_matches(&obs.category, "exam") {
        Some(ObservationBucket::Examination)
    } else {
        None
    }
}

/// Target bucket for a Condition. Problem-list wins over encounter
/// diagnosis; a condition without any category defaults to the encounter
/// diagnosis bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionBucket {
    ProblemList,
    Diagnosis,
}

pub fn classify_condition(condition: &Condition) -> Option<ConditionBucket> {
    if condition.category.is_empty() {
        return Some(ConditionBucket::Diagnosis);
    }

    let matches = |code_needle: &str, display_needle: &str| {
        condition.category.iter().any(|cat| {
            code_value(cat, None)
                .map(|code| code.contains(code_needle))
                .unwrap_or(false)
                || display_text(cat)
                    .map(|text| text.to_lowercase().contains(display_needle))
                    .unwrap_or(false)
        })
    };

    if matches("problem-list-item", "problem") {
        Some(ConditionBucket::ProblemList)
    } else if matches("encounter-diagnosis", "encounter") {
        Some(ConditionBucket::Diagnosis)
    } else {
        None
    }
}

/// Target bucket for an AllergyIntolerance. A medication category wins; a
/// record with no category at all defaults to food/other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergyBucket {
    Drug,
    FoodOther,
}

pub fn classify_allergy(allergy: &AllergyIntolerance) -> Option<AllergyBucket> {
    if allergy.category.iter().any(|c| c == "medication") {
        Some(AllergyBucket::Drug)
    } else if allergy.category.is_empty()
        || allergy
            .category
            .iter()
            .any(|c| c == "food" || c == "environment")
    {
        Some(AllergyBucket::FoodOther)
    } else {
        None
    }
}
