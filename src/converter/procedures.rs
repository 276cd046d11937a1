use super::context::ConversionContext;
use super::helpers::display_text;
use crate::types::{Bundle, ProcedureItem, Resource};

/// Procedures that are not completed; completed procedures land in the
/// past-procedures history group instead.
pub fn extract_procedures(bundle: &Bundle, context: &mut ConversionContext) -> Vec<ProcedureItem> {
    bundle
        .resources()
        .filter_map(|r| match r {
            Resource::Procedure(procedure)
                if procedure.status.as_deref() != Some("completed") =>
            {
                Some(procedure)
            }
            _ => None,
        })
        .map(|procedure| ProcedureItem {
            id: context.next_id("p"),
            name: procedure
                .code
                .as_ref()
                .and_then(display_text)
                .unwrap_or("Unknown Procedure")
                .to_string(),
        })
        .collect()
}
