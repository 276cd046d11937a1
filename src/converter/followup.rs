use chrono::{DateTime, Utc};

use super::helpers::normalized_date;
use crate::types::{Bundle, Followup, Resource};

type Candidate = fn(&Bundle, DateTime<Utc>) -> Option<Followup>;

/// Follow-up date sources in precedence order; the first candidate that
/// yields a date wins, and the basis flag always defaults to "as per
/// medication duration" when a date was found.
const CANDIDATES: [Candidate; 2] = [from_appointment, from_care_plan];

pub fn extract_followup(bundle: &Bundle, now: DateTime<Utc>) -> Followup {
    CANDIDATES
        .iter()
        .find_map(|candidate| candidate(bundle, now))
        .unwrap_or_default()
}

fn from_appointment(bundle: &Bundle, now: DateTime<Utc>) -> Option<Followup> {
    let appointment = bundle.resources().find_map(|r| match r {
        Resource::Appointment(appointment) => Some(appointment),
        _ => None,
    })?;
    let start = appointment.start.as_deref()?;

    Some(Followup {
        date: Some(normalized_date(Some(start), now)),
        option_id: Some("MED_D".to_string()),
    })
}

fn from_care_plan(bundle: &Bundle, now: DateTime<Utc>) -> Option<Followup> {
    let care_plan = bundle.resources().find_map(|r| match r {
        Resource::CarePlan(care_plan) => Some(care_plan),
        _ => None,
    })?;
    let end = care_plan.period.as_ref()?.end.as_deref()?;

    Some(Followup {
        date: Some(normalized_date(Some(end), now)),
        option_id: Some("MED_D".to_string()),
    })
}
