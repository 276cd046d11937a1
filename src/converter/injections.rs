use super::context::ConversionContext;
use super::helpers::medication_display;
use crate::types::{Bundle, InjectionItem, Resource};

/// Every MedicationAdministration record becomes an injection entry.
pub fn extract_injections(bundle: &Bundle, context: &mut ConversionContext) -> Vec<InjectionItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::MedicationAdministration(administration) => Some(administration),
            _ => None,
        })
        .map(|administration| InjectionItem {
            id: context.next_id("inj"),
            name: medication_display(administration.medication.as_ref())
                .unwrap_or_else(|| "Unknown Injection".to_string()),
            status: administration
                .status
                .clone()
                .unwrap_or_else(|| "completed".to_string()),
        })
        .collect()
}
