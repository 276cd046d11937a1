use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use tracing::warn;

use super::context::ConversionContext;
use crate::types::{Bundle, PrescriptionNotes, Resource};

type Candidate = fn(&Bundle, &mut ConversionContext) -> Option<PrescriptionNotes>;

/// Note sources in precedence order. First match wins; later candidates are
/// never consulted once one produced notes.
const CANDIDATES: [Candidate; 2] = [from_document_reference, from_composition];

pub fn extract_prescription_notes(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> PrescriptionNotes {
    CANDIDATES
        .iter()
        .find_map(|candidate| candidate(bundle, context))
        .unwrap_or_default()
}

/// First DocumentReference carrying inline base64 attachment data.
fn from_document_reference(
    bundle: &Bundle,
    context: &mut ConversionContext,
) -> Option<PrescriptionNotes> {
    for document in bundle.resources().filter_map(|r| match r {
        Resource::DocumentReference(document) => Some(document),
        _ => None,
    }) {
        let Some(data) = document
            .content
            .first()
            .and_then(|c| c.attachment.as_ref())
            .and_then(|a| a.data.as_deref())
        else {
            continue;
        };

        match BASE64.decode(data) {
            Ok(bytes) => {
                let decoded = String::from_utf8_lossy(&bytes).into_owned();
                return Some(PrescriptionNotes {
                    id: Some(context.next_id("locale")),
                    text: Some(format!("<p>{decoded}</p>")),
                    parsed_text: Some(decoded),
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping undecodable document attachment");
            }
        }
    }

    None
}

/// First Composition section whose title reads like notes or instructions.
fn from_composition(bundle: &Bundle, context: &mut ConversionContext) -> Option<PrescriptionNotes> {
    for composition in bundle.resources().filter_map(|r| match r {
        Resource::Composition(composition) => Some(composition),
        _ => None,
    }) {
        let section = composition.section.iter().find(|section| {
            let title = section.title.as_deref().unwrap_or("").to_lowercase();
            title.contains("note") || title.contains("instruction")
        });

        if let Some(div) = section
            .and_then(|s| s.text.as_ref())
            .and_then(|t| t.div.as_deref())
        {
            return Some(PrescriptionNotes {
                id: Some(context.next_id("locale")),
                text: Some(div.to_string()),
                parsed_text: Some(strip_html(div)),
            });
        }
    }

    None
}

fn strip_html(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    tag.replace_all(html, "").into_owned()
}
